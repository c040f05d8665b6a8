use core::cell::OnceCell;

use alloc::vec::Vec;

use crate::{
    civil::{self, weeks_in_iso_year, Date},
    error::Error,
    factory,
    node::Node,
    step,
    unit::Unit,
};

/// An ISO 8601 week: seven days running Monday through Sunday.
///
/// Weeks are numbered within an ISO week year, which deviates from the
/// calendar year around January 1st. A week belongs to the year that
/// contains its Thursday, so an ISO year has either 52 or 53 weeks.
///
/// # Example
///
/// ```
/// use gridtime::{node::Week, Unit};
///
/// let w = Week::new(2025, 1)?;
/// // Week 1 of 2025 starts in calendar year 2024.
/// assert_eq!(w.start().to_string(), "2024-12-30");
/// assert_eq!(w.count(Unit::Day)?, 7);
/// # Ok::<(), gridtime::Error>(())
/// ```
#[derive(Clone)]
pub struct Week {
    iso_year: i16,
    iso_week: i8,
    start: Date,
    children: OnceCell<Vec<Node>>,
}

impl Week {
    /// Creates the given week of the given ISO week year.
    ///
    /// # Errors
    ///
    /// This returns an error when the year is out of range, when the
    /// week number exceeds the number of weeks in that ISO year, or
    /// when any day of the week falls outside the supported date
    /// range.
    pub fn new(iso_year: i16, iso_week: i8) -> Result<Week, Error> {
        if !(civil::MIN_YEAR..=civil::MAX_YEAR).contains(&iso_year) {
            return Err(Error::range(
                "ISO week year",
                iso_year,
                civil::MIN_YEAR,
                civil::MAX_YEAR,
            ));
        }
        let weeks = weeks_in_iso_year(iso_year);
        if !(1..=weeks).contains(&iso_week) {
            return Err(Error::range("ISO week", iso_week, 1, weeks));
        }
        let start = civil::date_from_iso_week(iso_year, iso_week, 0)?;
        // The whole week must be representable, not just its Monday,
        // and so must the midnight closing its Sunday.
        civil::date_from_iso_week(iso_year, iso_week, 6)?
            .checked_add_days(1)?;
        Ok(Week { iso_year, iso_week, start, children: OnceCell::new() })
    }

    /// Returns the ISO week year.
    pub fn iso_year(&self) -> i16 {
        self.iso_year
    }

    /// Returns the week number in the range `1..=53`.
    pub fn iso_week(&self) -> i8 {
        self.iso_week
    }

    /// Returns the Monday this week starts on.
    pub fn start(&self) -> Date {
        self.start
    }

    /// Returns this node's unit, [`Unit::Week`].
    pub fn unit(&self) -> Unit {
        Unit::Week
    }

    /// Returns this week's seven days, Monday first, building them on
    /// first access.
    pub fn children(&self) -> &[Node] {
        self.children.get_or_init(|| {
            factory::week_days(self.start)
                .expect("week span was validated at construction")
                .into_iter()
                .map(Node::Day)
                .collect()
        })
    }

    /// Counts the nodes of the given unit beneath (and including) this
    /// week.
    ///
    /// # Errors
    ///
    /// This returns an error when the unit does not occur in a week's
    /// subtree.
    pub fn count(&self, unit: Unit) -> Result<usize, Error> {
        crate::node::count_beneath(Unit::Week, unit, || self.children())
    }

    /// Returns the week reached by moving `steps` weeks forward
    /// (positive) or backward (negative), renumbering across ISO year
    /// boundaries.
    ///
    /// # Errors
    ///
    /// This returns an error when the resulting week falls outside the
    /// supported date range.
    pub fn shift(&self, steps: i64) -> Result<Week, Error> {
        step::shift_week(self, steps)
    }

    /// Returns the following week. Equivalent to `shift(1)`.
    pub fn next(&self) -> Result<Week, Error> {
        self.shift(1)
    }

    /// Returns the preceding week. Equivalent to `shift(-1)`.
    pub fn prev(&self) -> Result<Week, Error> {
        self.shift(-1)
    }
}

impl Eq for Week {}

impl PartialEq for Week {
    fn eq(&self, other: &Week) -> bool {
        (self.iso_year, self.iso_week) == (other.iso_year, other.iso_week)
    }
}

impl core::hash::Hash for Week {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        (self.iso_year, self.iso_week).hash(state);
    }
}

impl Ord for Week {
    fn cmp(&self, other: &Week) -> core::cmp::Ordering {
        (self.iso_year, self.iso_week).cmp(&(other.iso_year, other.iso_week))
    }
}

impl PartialOrd for Week {
    fn partial_cmp(&self, other: &Week) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl core::fmt::Display for Week {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{:04}-W{:02}", self.iso_year, self.iso_week)
    }
}

impl core::fmt::Debug for Week {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "Week({:04}-W{:02})", self.iso_year, self.iso_week)
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for Week {
    fn arbitrary(g: &mut quickcheck::Gen) -> Week {
        use quickcheck::Arbitrary;

        let date = crate::civil::Date::arbitrary(g);
        let (iso_year, iso_week) = date.iso_week_date();
        Week::new(iso_year, iso_week).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn starts_on_monday() {
        let w = Week::new(2025, 20).unwrap();
        assert_eq!(w.start().to_string(), "2025-05-12");
        let days = w.children();
        assert_eq!(days.len(), 7);
        assert_eq!(days[0].to_string(), "2025-05-12");
        assert_eq!(days[6].to_string(), "2025-05-18");
    }

    #[test]
    fn week_one_can_start_in_previous_year() {
        let w = Week::new(2025, 1).unwrap();
        assert_eq!(w.start().to_string(), "2024-12-30");
    }

    #[test]
    fn long_and_short_years() {
        assert!(Week::new(2020, 53).is_ok());
        assert!(Week::new(2021, 53).unwrap_err().is_range());
        assert!(Week::new(2026, 53).is_ok());
    }

    #[test]
    fn hour_count_over_fall_back() {
        // ISO week 43 of 2025 contains Sunday October 26th.
        let w = Week::new(2025, 43).unwrap();
        assert_eq!(w.count(Unit::Hour).unwrap(), 169);
        assert_eq!(Week::new(2025, 20).unwrap().count(Unit::Hour).unwrap(), 168);
    }

    #[test]
    fn display() {
        assert_eq!(Week::new(2025, 7).unwrap().to_string(), "2025-W07");
    }
}
