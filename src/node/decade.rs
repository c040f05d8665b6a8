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

/// A month-decade: a ten-day (or remainder) subdivision of a calendar
/// month, indexed 1 to 3.
///
/// Decades 1 and 2 cover days 1-10 and 11-20; decade 3 runs from day 21
/// through the last day of the month, absorbing the remainder.
///
/// # Example
///
/// ```
/// use gridtime::{node::Decade, Unit};
///
/// let d = Decade::new(2025, 2, 3)?;
/// assert_eq!((d.start_day(), d.end_day()), (21, 28));
/// assert_eq!(d.count(Unit::Day)?, 8);
/// # Ok::<(), gridtime::Error>(())
/// ```
#[derive(Clone)]
pub struct Decade {
    year: i16,
    month: i8,
    index: i8,
    children: OnceCell<Vec<Node>>,
}

impl Decade {
    /// Creates the decade of the given month with the given index.
    ///
    /// # Errors
    ///
    /// This returns an error when the year, month or index is out of
    /// range. The index must be 1, 2 or 3. The final decade of the
    /// supported range is rejected as well, since its last hour would
    /// be anchored on an unrepresentable midnight.
    pub fn new(year: i16, month: i8, index: i8) -> Result<Decade, Error> {
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
        if !(1..=3).contains(&index) {
            return Err(Error::range("decade index", index, 1, 3));
        }
        // The midnight closing the decade's last day must exist.
        let end_day =
            if index < 3 { index * 10 } else { days_in_month(year, month) };
        civil::Date::new_unchecked(year, month, end_day)
            .checked_add_days(1)?;
        Ok(Decade { year, month, index, children: OnceCell::new() })
    }

    /// Returns the year.
    pub fn year(&self) -> i16 {
        self.year
    }

    /// Returns the month in the range `1..=12`.
    pub fn month(&self) -> i8 {
        self.month
    }

    /// Returns the decade index in the range `1..=3`.
    pub fn index(&self) -> i8 {
        self.index
    }

    /// Returns the first day of the month covered by this decade.
    pub fn start_day(&self) -> i8 {
        1 + (self.index - 1) * 10
    }

    /// Returns the last day of the month covered by this decade.
    pub fn end_day(&self) -> i8 {
        if self.index < 3 {
            self.start_day() + 9
        } else {
            days_in_month(self.year, self.month)
        }
    }

    /// Returns this node's unit, [`Unit::Decade`].
    pub fn unit(&self) -> Unit {
        Unit::Decade
    }

    /// Returns this decade's days in order, building them on first
    /// access.
    pub fn children(&self) -> &[Node] {
        self.children.get_or_init(|| {
            factory::decade_days(self.year, self.month, self.index)
                .expect("decade parameters were validated at construction")
                .into_iter()
                .map(Node::Day)
                .collect()
        })
    }

    /// Counts the nodes of the given unit beneath (and including) this
    /// decade.
    ///
    /// # Errors
    ///
    /// This returns an error when the unit does not occur in a decade's
    /// subtree.
    pub fn count(&self, unit: Unit) -> Result<usize, Error> {
        crate::node::count_beneath(Unit::Decade, unit, || self.children())
    }

    /// Returns the decade reached by moving `steps` decades forward
    /// (positive) or backward (negative). Steps of one move
    /// 1 → 2 → 3 → (next month, decade 1) and so on.
    ///
    /// # Errors
    ///
    /// This returns an error when the resulting month falls outside the
    /// supported year range.
    pub fn shift(&self, steps: i64) -> Result<Decade, Error> {
        step::shift_decade(self, steps)
    }

    /// Returns the following decade. Equivalent to `shift(1)`.
    pub fn next(&self) -> Result<Decade, Error> {
        self.shift(1)
    }

    /// Returns the preceding decade. Equivalent to `shift(-1)`.
    pub fn prev(&self) -> Result<Decade, Error> {
        self.shift(-1)
    }
}

impl Eq for Decade {}

impl PartialEq for Decade {
    fn eq(&self, other: &Decade) -> bool {
        (self.year, self.month, self.index)
            == (other.year, other.month, other.index)
    }
}

impl core::hash::Hash for Decade {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        (self.year, self.month, self.index).hash(state);
    }
}

impl Ord for Decade {
    fn cmp(&self, other: &Decade) -> core::cmp::Ordering {
        (self.year, self.month, self.index)
            .cmp(&(other.year, other.month, other.index))
    }
}

impl PartialOrd for Decade {
    fn partial_cmp(&self, other: &Decade) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl core::fmt::Display for Decade {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "{:04}-{:02} D{} ({:02}-{:02})",
            self.year,
            self.month,
            self.index,
            self.start_day(),
            self.end_day(),
        )
    }
}

impl core::fmt::Debug for Decade {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "Decade({:04}-{:02} D{})", self.year, self.month, self.index)
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for Decade {
    fn arbitrary(g: &mut quickcheck::Gen) -> Decade {
        use quickcheck::Arbitrary;

        let date = crate::civil::Date::arbitrary(g);
        let index = 1 + i8::arbitrary(g).rem_euclid(3);
        Decade::new(date.year(), date.month(), index).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn spans() {
        let d = Decade::new(2025, 7, 1).unwrap();
        assert_eq!((d.start_day(), d.end_day()), (1, 10));
        let d = Decade::new(2025, 7, 2).unwrap();
        assert_eq!((d.start_day(), d.end_day()), (11, 20));
        // The third decade absorbs the remainder of the month.
        let d = Decade::new(2025, 7, 3).unwrap();
        assert_eq!((d.start_day(), d.end_day()), (21, 31));
        let d = Decade::new(2024, 2, 3).unwrap();
        assert_eq!((d.start_day(), d.end_day()), (21, 29));
    }

    #[test]
    fn day_counts() {
        assert_eq!(
            Decade::new(2025, 7, 2).unwrap().count(Unit::Day).unwrap(),
            10,
        );
        assert_eq!(
            Decade::new(2025, 7, 3).unwrap().count(Unit::Day).unwrap(),
            11,
        );
        assert_eq!(
            Decade::new(2023, 2, 3).unwrap().count(Unit::Day).unwrap(),
            8,
        );
    }

    #[test]
    fn index_out_of_range() {
        assert!(Decade::new(2025, 7, 0).unwrap_err().is_range());
        assert!(Decade::new(2025, 7, 4).unwrap_err().is_range());
        assert!(Decade::new(2025, 13, 1).unwrap_err().is_range());
        // The final decade of the supported range ends on a midnight
        // that does not exist.
        assert!(Decade::new(9999, 12, 3).unwrap_err().is_range());
        assert!(Decade::new(9999, 12, 2).is_ok());
    }

    #[test]
    fn display() {
        assert_eq!(
            Decade::new(2025, 7, 2).unwrap().to_string(),
            "2025-07 D2 (11-20)",
        );
    }
}
