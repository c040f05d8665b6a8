use core::cell::OnceCell;

use alloc::vec::Vec;

use crate::{
    civil::{self, is_leap_year},
    error::Error,
    factory,
    node::Node,
    step,
    unit::Unit,
};

/// A calendar year.
///
/// A year's children are its four quarters. Because every year in the
/// supported range contains exactly one spring-forward and one
/// fall-back transition, hour counts beneath a year equal its day
/// count times 24.
///
/// # Example
///
/// ```
/// use gridtime::{node::Year, Unit};
///
/// let y = Year::new(2024)?;
/// assert_eq!(y.count(Unit::Day)?, 366);
/// assert_eq!(y.count(Unit::Hour)?, 8784);
/// # Ok::<(), gridtime::Error>(())
/// ```
#[derive(Clone)]
pub struct Year {
    year: i16,
    children: OnceCell<Vec<Node>>,
}

impl Year {
    /// Creates the given year.
    ///
    /// # Errors
    ///
    /// This returns an error when the year is out of range. The final
    /// supported year is rejected as well, since its last hour would be
    /// anchored on an unrepresentable midnight.
    pub fn new(year: i16) -> Result<Year, Error> {
        if !(civil::MIN_YEAR..=civil::MAX_YEAR).contains(&year) {
            return Err(Error::range(
                "year",
                year,
                civil::MIN_YEAR,
                civil::MAX_YEAR,
            ));
        }
        // The midnight closing December 31 must exist.
        civil::Date::new_unchecked(year, 12, 31).checked_add_days(1)?;
        Ok(Year { year, children: OnceCell::new() })
    }

    /// Returns the year number.
    pub fn year(&self) -> i16 {
        self.year
    }

    /// Returns whether this is a leap year.
    pub fn is_leap(&self) -> bool {
        is_leap_year(self.year)
    }

    /// Returns this node's unit, [`Unit::Year`].
    pub fn unit(&self) -> Unit {
        Unit::Year
    }

    /// Returns this year's four quarters in order, building them on
    /// first access.
    pub fn children(&self) -> &[Node] {
        self.children.get_or_init(|| {
            factory::year_quarters(self.year)
                .expect("year was validated at construction")
                .into_iter()
                .map(Node::Quarter)
                .collect()
        })
    }

    /// Counts the nodes of the given unit beneath (and including) this
    /// year.
    ///
    /// # Errors
    ///
    /// This returns an error when the unit does not occur in a year's
    /// subtree. Weeks, decades and seasons do not: they are alternate
    /// groupings, not links in the year's chain of children.
    pub fn count(&self, unit: Unit) -> Result<usize, Error> {
        crate::node::count_beneath(Unit::Year, unit, || self.children())
    }

    /// Returns the year reached by moving `steps` years forward
    /// (positive) or backward (negative).
    ///
    /// # Errors
    ///
    /// This returns an error when the resulting year falls outside the
    /// supported range.
    pub fn shift(&self, steps: i64) -> Result<Year, Error> {
        step::shift_year(self, steps)
    }

    /// Returns the following year. Equivalent to `shift(1)`.
    pub fn next(&self) -> Result<Year, Error> {
        self.shift(1)
    }

    /// Returns the preceding year. Equivalent to `shift(-1)`.
    pub fn prev(&self) -> Result<Year, Error> {
        self.shift(-1)
    }
}

impl Eq for Year {}

impl PartialEq for Year {
    fn eq(&self, other: &Year) -> bool {
        self.year == other.year
    }
}

impl core::hash::Hash for Year {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.year.hash(state);
    }
}

impl Ord for Year {
    fn cmp(&self, other: &Year) -> core::cmp::Ordering {
        self.year.cmp(&other.year)
    }
}

impl PartialOrd for Year {
    fn partial_cmp(&self, other: &Year) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl core::fmt::Display for Year {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{:04}", self.year)
    }
}

impl core::fmt::Debug for Year {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "Year({:04})", self.year)
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for Year {
    fn arbitrary(g: &mut quickcheck::Gen) -> Year {
        use quickcheck::Arbitrary;

        Year::new(crate::civil::Date::arbitrary(g).year()).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn counts() {
        let y = Year::new(2024).unwrap();
        assert_eq!(y.count(Unit::Quarter).unwrap(), 4);
        assert_eq!(y.count(Unit::Month).unwrap(), 12);
        assert_eq!(y.count(Unit::Day).unwrap(), 366);
        assert_eq!(y.count(Unit::Hour).unwrap(), 8784);

        let y = Year::new(2025).unwrap();
        assert_eq!(y.count(Unit::Day).unwrap(), 365);
        assert_eq!(y.count(Unit::Hour).unwrap(), 8760);
    }

    #[test]
    fn alternate_groupings_unreachable() {
        let y = Year::new(2025).unwrap();
        assert!(y.count(Unit::Week).unwrap_err().is_unreachable_unit());
        assert!(y.count(Unit::Decade).unwrap_err().is_unreachable_unit());
        assert!(y.count(Unit::Season).unwrap_err().is_unreachable_unit());
    }

    #[test]
    fn out_of_range() {
        assert!(Year::new(10_000).unwrap_err().is_range());
        assert!(Year::new(-10_000).unwrap_err().is_range());
        // The final supported year ends on a midnight that does not
        // exist, so it cannot carry a full subtree.
        assert!(Year::new(9999).unwrap_err().is_range());
        assert!(Year::new(9998).is_ok());
    }

    #[test]
    fn display() {
        assert_eq!(Year::new(476).unwrap().to_string(), "0476");
    }
}
