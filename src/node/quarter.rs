use core::cell::OnceCell;

use alloc::vec::Vec;

use crate::{civil, error::Error, factory, node::Node, step, unit::Unit};

/// A calendar quarter: three consecutive months, indexed 1 to 4 within
/// a year.
///
/// # Example
///
/// ```
/// use gridtime::{node::Quarter, Unit};
///
/// let q = Quarter::new(2025, 3)?;
/// assert_eq!(q.first_month(), 7);
/// assert_eq!(q.count(Unit::Day)?, 92);
/// # Ok::<(), gridtime::Error>(())
/// ```
#[derive(Clone)]
pub struct Quarter {
    year: i16,
    quarter: i8,
    children: OnceCell<Vec<Node>>,
}

impl Quarter {
    /// Creates the given quarter of the given year.
    ///
    /// # Errors
    ///
    /// This returns an error when the year or quarter index is out of
    /// range. The quarter must be 1, 2, 3 or 4. The final quarter of
    /// the supported range is rejected as well, since its last hour
    /// would be anchored on an unrepresentable midnight.
    pub fn new(year: i16, quarter: i8) -> Result<Quarter, Error> {
        if !(civil::MIN_YEAR..=civil::MAX_YEAR).contains(&year) {
            return Err(Error::range(
                "year",
                year,
                civil::MIN_YEAR,
                civil::MAX_YEAR,
            ));
        }
        if !(1..=4).contains(&quarter) {
            return Err(Error::range("quarter", quarter, 1, 4));
        }
        // The midnight closing the quarter's last day must exist.
        let last_month = quarter * 3;
        civil::Date::new_unchecked(
            year,
            last_month,
            civil::days_in_month(year, last_month),
        )
        .checked_add_days(1)?;
        Ok(Quarter { year, quarter, children: OnceCell::new() })
    }

    /// Returns the year.
    pub fn year(&self) -> i16 {
        self.year
    }

    /// Returns the quarter index in the range `1..=4`.
    pub fn quarter(&self) -> i8 {
        self.quarter
    }

    /// Returns the first month of this quarter: 1, 4, 7 or 10.
    pub fn first_month(&self) -> i8 {
        1 + (self.quarter - 1) * 3
    }

    /// Returns this node's unit, [`Unit::Quarter`].
    pub fn unit(&self) -> Unit {
        Unit::Quarter
    }

    /// Returns this quarter's months in order, building them on first
    /// access.
    pub fn children(&self) -> &[Node] {
        self.children.get_or_init(|| {
            factory::quarter_months(self.year, self.quarter)
                .expect("quarter parameters were validated at construction")
                .into_iter()
                .map(Node::Month)
                .collect()
        })
    }

    /// Counts the nodes of the given unit beneath (and including) this
    /// quarter.
    ///
    /// # Errors
    ///
    /// This returns an error when the unit does not occur in a quarter's
    /// subtree.
    pub fn count(&self, unit: Unit) -> Result<usize, Error> {
        crate::node::count_beneath(Unit::Quarter, unit, || self.children())
    }

    /// Returns the quarter reached by moving `steps` quarters forward
    /// (positive) or backward (negative), crossing year boundaries as
    /// needed.
    ///
    /// # Errors
    ///
    /// This returns an error when the resulting year falls outside the
    /// supported range.
    pub fn shift(&self, steps: i64) -> Result<Quarter, Error> {
        step::shift_quarter(self, steps)
    }

    /// Returns the following quarter. Equivalent to `shift(1)`.
    pub fn next(&self) -> Result<Quarter, Error> {
        self.shift(1)
    }

    /// Returns the preceding quarter. Equivalent to `shift(-1)`.
    pub fn prev(&self) -> Result<Quarter, Error> {
        self.shift(-1)
    }
}

impl Eq for Quarter {}

impl PartialEq for Quarter {
    fn eq(&self, other: &Quarter) -> bool {
        (self.year, self.quarter) == (other.year, other.quarter)
    }
}

impl core::hash::Hash for Quarter {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        (self.year, self.quarter).hash(state);
    }
}

impl Ord for Quarter {
    fn cmp(&self, other: &Quarter) -> core::cmp::Ordering {
        (self.year, self.quarter).cmp(&(other.year, other.quarter))
    }
}

impl PartialOrd for Quarter {
    fn partial_cmp(&self, other: &Quarter) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl core::fmt::Display for Quarter {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{:04}-Q{}", self.year, self.quarter)
    }
}

impl core::fmt::Debug for Quarter {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "Quarter({:04}-Q{})", self.year, self.quarter)
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for Quarter {
    fn arbitrary(g: &mut quickcheck::Gen) -> Quarter {
        use quickcheck::Arbitrary;

        let date = crate::civil::Date::arbitrary(g);
        let quarter = 1 + (date.month() - 1) / 3;
        Quarter::new(date.year(), quarter).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn months() {
        let q = Quarter::new(2025, 3).unwrap();
        assert_eq!(q.first_month(), 7);
        assert_eq!(q.count(Unit::Month).unwrap(), 3);
    }

    #[test]
    fn day_counts() {
        assert_eq!(
            Quarter::new(2024, 1).unwrap().count(Unit::Day).unwrap(),
            91,
        );
        assert_eq!(
            Quarter::new(2025, 1).unwrap().count(Unit::Day).unwrap(),
            90,
        );
        assert_eq!(
            Quarter::new(2025, 3).unwrap().count(Unit::Day).unwrap(),
            92,
        );
    }

    #[test]
    fn hour_counts_across_transitions() {
        // Q1 contains the spring-forward hour, Q4 the fall-back hour.
        assert_eq!(
            Quarter::new(2025, 1).unwrap().count(Unit::Hour).unwrap(),
            90 * 24 - 1,
        );
        assert_eq!(
            Quarter::new(2025, 4).unwrap().count(Unit::Hour).unwrap(),
            92 * 24 + 1,
        );
    }

    #[test]
    fn index_out_of_range() {
        assert!(Quarter::new(2025, 0).unwrap_err().is_range());
        assert!(Quarter::new(2025, 5).unwrap_err().is_range());
        // The final quarter of the supported range ends on a midnight
        // that does not exist.
        assert!(Quarter::new(9999, 4).unwrap_err().is_range());
        assert!(Quarter::new(9999, 3).is_ok());
    }

    #[test]
    fn display() {
        assert_eq!(Quarter::new(2025, 2).unwrap().to_string(), "2025-Q2");
    }
}
