use core::cell::OnceCell;

use alloc::vec::Vec;

use crate::{
    civil::Date,
    error::Error,
    factory,
    node::Node,
    step,
    unit::Unit,
};

/// A calendar day, composed of its hours.
///
/// Daylight saving time changes a day's length. The day of the
/// spring-forward transition has 23 hours, the day of the fall-back
/// transition has 25 (the duplicated hour appears twice among its
/// children, once per occurrence), and every other day has 24.
///
/// # Example
///
/// ```
/// use gridtime::{civil::Date, node::Day, Unit};
///
/// assert_eq!(Day::new(Date::constant(2025, 3, 30))?.count(Unit::Hour)?, 23);
/// assert_eq!(Day::new(Date::constant(2025, 7, 23))?.count(Unit::Hour)?, 24);
/// assert_eq!(Day::new(Date::constant(2025, 10, 26))?.count(Unit::Hour)?, 25);
/// # Ok::<(), gridtime::Error>(())
/// ```
#[derive(Clone)]
pub struct Day {
    date: Date,
    children: OnceCell<Vec<Node>>,
}

impl Day {
    /// Creates the day for the given calendar date.
    ///
    /// # Errors
    ///
    /// A day's last hour is anchored on the midnight that follows it, so
    /// this returns an error for the very last supported date, whose
    /// following midnight is out of range.
    pub fn new(date: Date) -> Result<Day, Error> {
        date.checked_add_days(1)?;
        Ok(Day { date, children: OnceCell::new() })
    }

    /// Returns this day's calendar date.
    pub fn date(&self) -> Date {
        self.date
    }

    /// Returns this node's unit, [`Unit::Day`].
    pub fn unit(&self) -> Unit {
        Unit::Day
    }

    /// Returns this day's hours in order, building them on first access.
    ///
    /// The hour deleted by the spring-forward transition is skipped; the
    /// hour duplicated by the fall-back transition appears twice, first
    /// occurrence before second.
    pub fn children(&self) -> &[Node] {
        self.children.get_or_init(|| {
            factory::hours(self.date)
                .expect("hour boundaries were validated at construction")
                .into_iter()
                .map(Node::Hour)
                .collect()
        })
    }

    /// Counts the nodes of the given unit beneath (and including) this
    /// day.
    ///
    /// # Errors
    ///
    /// This returns an error when the unit does not occur in a day's
    /// subtree.
    pub fn count(&self, unit: Unit) -> Result<usize, Error> {
        crate::node::count_beneath(Unit::Day, unit, || self.children())
    }

    /// Returns the day reached by moving `steps` days forward (positive)
    /// or backward (negative).
    ///
    /// This is pure calendar-date arithmetic; only the hour count varies
    /// from day to day.
    ///
    /// # Errors
    ///
    /// This returns an error when the resulting date falls outside the
    /// supported range.
    pub fn shift(&self, steps: i64) -> Result<Day, Error> {
        step::shift_day(self, steps)
    }

    /// Returns the following day. Equivalent to `shift(1)`.
    pub fn next(&self) -> Result<Day, Error> {
        self.shift(1)
    }

    /// Returns the preceding day. Equivalent to `shift(-1)`.
    pub fn prev(&self) -> Result<Day, Error> {
        self.shift(-1)
    }
}

impl Eq for Day {}

impl PartialEq for Day {
    fn eq(&self, other: &Day) -> bool {
        self.date == other.date
    }
}

impl core::hash::Hash for Day {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.date.hash(state);
    }
}

impl Ord for Day {
    fn cmp(&self, other: &Day) -> core::cmp::Ordering {
        self.date.cmp(&other.date)
    }
}

impl PartialOrd for Day {
    fn partial_cmp(&self, other: &Day) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl core::fmt::Display for Day {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{}", self.date)
    }
}

impl core::fmt::Debug for Day {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "Day({})", self.date)
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for Day {
    fn arbitrary(g: &mut quickcheck::Gen) -> Day {
        use quickcheck::Arbitrary;

        Day::new(Date::arbitrary(g)).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(year: i16, month: i8, day: i8) -> Day {
        Day::new(Date::constant(year, month, day)).unwrap()
    }

    #[test]
    fn hour_counts_around_transitions() {
        assert_eq!(day(2025, 3, 30).count(Unit::Hour).unwrap(), 23);
        assert_eq!(day(2025, 10, 26).count(Unit::Hour).unwrap(), 25);
        assert_eq!(day(2025, 10, 27).count(Unit::Hour).unwrap(), 24);
    }

    #[test]
    fn quarter_counts_around_transitions() {
        assert_eq!(day(2025, 10, 26).count(Unit::QuarterHour).unwrap(), 100);
        assert_eq!(day(2025, 3, 30).count(Unit::QuarterHour).unwrap(), 92);
    }

    #[test]
    fn last_supported_date_has_no_day() {
        // The hour ending at the following midnight is not
        // representable, so construction fails instead of the day
        // blowing up when its children are built.
        let err = Day::new(Date::constant(9999, 12, 31)).unwrap_err();
        assert!(err.is_range(), "{err}");
        assert_eq!(day(9999, 12, 30).count(Unit::Hour).unwrap(), 24);
    }

    #[test]
    fn duplicated_hour_appears_twice() {
        let day = day(2025, 10, 26);
        let backward: Vec<&Node> = day
            .children()
            .iter()
            .filter(|node| {
                let Node::Hour(h) = node else { return false };
                h.is_duplicated()
            })
            .collect();
        assert_eq!(backward.len(), 2);
    }

    #[test]
    fn unreachable_unit() {
        let err = day(2025, 5, 12).count(Unit::Quarter).unwrap_err();
        assert!(err.is_unreachable_unit(), "{err}");
    }
}
