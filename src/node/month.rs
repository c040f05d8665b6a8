use core::cell::OnceCell;

use alloc::vec::Vec;

use crate::{
    civil::{self, days_in_month},
    error::Error,
    factory,
    node::Node,
    step,
    unit::Unit,
};

/// A calendar month.
///
/// A month's children are its days. Hour counts beneath a month reflect
/// the daylight saving transitions it contains, so October of any year
/// in range has one hour more than its day count times 24 suggests.
///
/// # Example
///
/// ```
/// use gridtime::{node::Month, Unit};
///
/// let m = Month::new(2025, 10)?;
/// assert_eq!(m.count(Unit::Day)?, 31);
/// assert_eq!(m.count(Unit::Hour)?, 745);
/// # Ok::<(), gridtime::Error>(())
/// ```
#[derive(Clone)]
pub struct Month {
    year: i16,
    month: i8,
    children: OnceCell<Vec<Node>>,
}

impl Month {
    /// Creates the given month of the given year.
    ///
    /// # Errors
    ///
    /// This returns an error when the year or month is out of range, or
    /// when the month is the very last supported one, whose final hour
    /// would be anchored on an unrepresentable midnight.
    pub fn new(year: i16, month: i8) -> Result<Month, Error> {
        if !(civil::MIN_YEAR..=civil::MAX_YEAR).contains(&year) {
            return Err(Error::range(
                "year",
                year,
                civil::MIN_YEAR,
                civil::MAX_YEAR,
            ));
        }
        if !(1..=12).contains(&month) {
            return Err(Error::range("month", month, 1, 12));
        }
        // The midnight closing the month's last day must exist.
        civil::Date::new_unchecked(year, month, days_in_month(year, month))
            .checked_add_days(1)?;
        Ok(Month { year, month, children: OnceCell::new() })
    }

    /// Returns the year.
    pub fn year(&self) -> i16 {
        self.year
    }

    /// Returns the month in the range `1..=12`.
    pub fn month(&self) -> i8 {
        self.month
    }

    /// Returns the number of days in this month.
    pub fn days(&self) -> i8 {
        days_in_month(self.year, self.month)
    }

    /// Returns this node's unit, [`Unit::Month`].
    pub fn unit(&self) -> Unit {
        Unit::Month
    }

    /// Returns this month's days in order, building them on first
    /// access.
    pub fn children(&self) -> &[Node] {
        self.children.get_or_init(|| {
            factory::month_days(self.year, self.month)
                .expect("month parameters were validated at construction")
                .into_iter()
                .map(Node::Day)
                .collect()
        })
    }

    /// Counts the nodes of the given unit beneath (and including) this
    /// month.
    ///
    /// # Errors
    ///
    /// This returns an error when the unit does not occur in a month's
    /// subtree.
    pub fn count(&self, unit: Unit) -> Result<usize, Error> {
        crate::node::count_beneath(Unit::Month, unit, || self.children())
    }

    /// Returns the month reached by moving `steps` months forward
    /// (positive) or backward (negative).
    ///
    /// # Errors
    ///
    /// This returns an error when the resulting month falls outside the
    /// supported year range.
    pub fn shift(&self, steps: i64) -> Result<Month, Error> {
        step::shift_month(self, steps)
    }

    /// Returns the following month. Equivalent to `shift(1)`.
    pub fn next(&self) -> Result<Month, Error> {
        self.shift(1)
    }

    /// Returns the preceding month. Equivalent to `shift(-1)`.
    pub fn prev(&self) -> Result<Month, Error> {
        self.shift(-1)
    }
}

impl Eq for Month {}

impl PartialEq for Month {
    fn eq(&self, other: &Month) -> bool {
        (self.year, self.month) == (other.year, other.month)
    }
}

impl core::hash::Hash for Month {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        (self.year, self.month).hash(state);
    }
}

impl Ord for Month {
    fn cmp(&self, other: &Month) -> core::cmp::Ordering {
        (self.year, self.month).cmp(&(other.year, other.month))
    }
}

impl PartialOrd for Month {
    fn partial_cmp(&self, other: &Month) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl core::fmt::Display for Month {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl core::fmt::Debug for Month {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "Month({:04}-{:02})", self.year, self.month)
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for Month {
    fn arbitrary(g: &mut quickcheck::Gen) -> Month {
        use quickcheck::Arbitrary;

        let date = crate::civil::Date::arbitrary(g);
        Month::new(date.year(), date.month()).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn day_counts() {
        assert_eq!(Month::new(2024, 2).unwrap().count(Unit::Day).unwrap(), 29);
        assert_eq!(Month::new(2025, 2).unwrap().count(Unit::Day).unwrap(), 28);
        assert_eq!(Month::new(2025, 7).unwrap().count(Unit::Day).unwrap(), 31);
        assert_eq!(Month::new(2025, 9).unwrap().count(Unit::Day).unwrap(), 30);
    }

    #[test]
    fn hour_counts_across_transitions() {
        // October contains the fall-back Sunday: one hour extra.
        assert_eq!(
            Month::new(2025, 10).unwrap().count(Unit::Hour).unwrap(),
            745,
        );
        // March contains the spring-forward Sunday: one hour short.
        assert_eq!(
            Month::new(2025, 3).unwrap().count(Unit::Hour).unwrap(),
            743,
        );
        // A month without a transition.
        assert_eq!(
            Month::new(2025, 7).unwrap().count(Unit::Hour).unwrap(),
            744,
        );
    }

    #[test]
    fn out_of_range() {
        assert!(Month::new(2025, 0).unwrap_err().is_range());
        assert!(Month::new(2025, 13).unwrap_err().is_range());
        assert!(Month::new(10_000, 1).unwrap_err().is_range());
        // The last supported month ends on a midnight that does not
        // exist, so it is rejected too.
        assert!(Month::new(9999, 12).unwrap_err().is_range());
        assert!(Month::new(9999, 11).is_ok());
    }

    #[test]
    fn display() {
        assert_eq!(Month::new(2025, 3).unwrap().to_string(), "2025-03");
    }
}
