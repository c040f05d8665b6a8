use core::cell::OnceCell;

use alloc::vec::Vec;

use crate::{
    civil::DateTime,
    error::Error,
    factory, rules, step,
    node::Node,
    unit::Unit,
};

/// An hour of the calendar, composed of four quarter-hours.
///
/// An `Hour` is anchored on its *end* instant; its start is always one
/// hour earlier. The daylight saving time rules are evaluated on the
/// local wall-clock start. Within the fall-back transition the hour
/// `[02:00, 03:00)` occurs twice, and the two occurrences compare
/// unequal and order first-before-second.
///
/// The four quarter-hour children carry the hour's own occurrence flag,
/// so the children of either occurrence contiguously cover its span.
#[derive(Clone)]
pub struct Hour {
    start: DateTime,
    end: DateTime,
    duplicated: bool,
    backward: bool,
    children: OnceCell<Vec<Node>>,
}

impl Hour {
    /// Creates the hour ending at the given instant.
    ///
    /// If the hour is duplicated by the fall-back transition, this
    /// returns the first occurrence; use [`Hour::second`] for the second
    /// one.
    ///
    /// # Errors
    ///
    /// This returns an error when the hour's start falls inside the
    /// spring-forward gap, or when the start would fall outside the
    /// supported range.
    ///
    /// # Example
    ///
    /// ```
    /// use gridtime::{civil::DateTime, node::Hour};
    ///
    /// let h = Hour::new(DateTime::constant(2025, 3, 30, 2, 0))?;
    /// assert_eq!(h.start(), DateTime::constant(2025, 3, 30, 1, 0));
    ///
    /// // The hour ending at 03:00 would start inside the gap.
    /// assert!(Hour::new(DateTime::constant(2025, 3, 30, 3, 0)).is_err());
    /// # Ok::<(), gridtime::Error>(())
    /// ```
    pub fn new(end: DateTime) -> Result<Hour, Error> {
        Hour::with_backward(end, false)
    }

    /// Creates the second occurrence of a duplicated hour.
    ///
    /// # Errors
    ///
    /// In addition to the cases rejected by [`Hour::new`], this returns
    /// an error when the hour is not actually duplicated.
    pub fn second(end: DateTime) -> Result<Hour, Error> {
        Hour::with_backward(end, true)
    }

    /// Creates the hour ending at the given instant, as the first
    /// (`backward == false`) or second (`backward == true`) occurrence.
    pub fn with_backward(end: DateTime, backward: bool) -> Result<Hour, Error> {
        let start = end.checked_add_minutes(-60)?;
        if rules::is_missing_hour(start) {
            return Err(Error::invalid_instant("hour", start));
        }
        let duplicated = rules::is_duplicated_hour(start);
        if backward && !duplicated {
            return Err(Error::invalid_backward("hour", start));
        }
        Ok(Hour { start, end, duplicated, backward, children: OnceCell::new() })
    }

    /// Returns the start instant, always one hour before the end.
    pub fn start(&self) -> DateTime {
        self.start
    }

    /// Returns the end instant, this hour's anchor.
    pub fn end(&self) -> DateTime {
        self.end
    }

    /// Returns true when this hour is duplicated by the fall-back
    /// transition.
    pub fn is_duplicated(&self) -> bool {
        self.duplicated
    }

    /// Returns true when this is the second occurrence of a duplicated
    /// hour.
    pub fn is_backward(&self) -> bool {
        self.backward
    }

    /// Returns this node's unit, [`Unit::Hour`].
    pub fn unit(&self) -> Unit {
        Unit::Hour
    }

    /// Returns this hour's four quarter-hours, building them on first
    /// access.
    pub fn children(&self) -> &[Node] {
        self.children.get_or_init(|| {
            factory::quarter_hours(self)
                .into_iter()
                .map(Node::QuarterHour)
                .collect()
        })
    }

    /// Counts the nodes of the given unit beneath (and including) this
    /// hour.
    ///
    /// # Errors
    ///
    /// This returns an error when the unit does not occur in an hour's
    /// subtree.
    pub fn count(&self, unit: Unit) -> Result<usize, Error> {
        crate::node::count_beneath(Unit::Hour, unit, || self.children())
    }

    /// Returns the hour reached by moving `steps` hours forward
    /// (positive) or backward (negative), threading through duplicated
    /// and missing instants.
    ///
    /// # Errors
    ///
    /// This returns an error when an intermediate or resulting instant
    /// falls outside the supported range.
    pub fn shift(&self, steps: i64) -> Result<Hour, Error> {
        step::shift_hour(self, steps)
    }

    /// Returns the following hour. Equivalent to `shift(1)`.
    pub fn next(&self) -> Result<Hour, Error> {
        self.shift(1)
    }

    /// Returns the preceding hour. Equivalent to `shift(-1)`.
    pub fn prev(&self) -> Result<Hour, Error> {
        self.shift(-1)
    }
}

impl Eq for Hour {}

impl PartialEq for Hour {
    fn eq(&self, other: &Hour) -> bool {
        self.start == other.start
            && self.end == other.end
            && self.backward == other.backward
    }
}

impl core::hash::Hash for Hour {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.start.hash(state);
        self.end.hash(state);
        self.backward.hash(state);
    }
}

impl Ord for Hour {
    fn cmp(&self, other: &Hour) -> core::cmp::Ordering {
        (self.start, self.backward).cmp(&(other.start, other.backward))
    }
}

impl PartialOrd for Hour {
    fn partial_cmp(&self, other: &Hour) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl core::fmt::Display for Hour {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "{} {:02}:{:02}-{:02}:{:02}",
            self.start.date(),
            self.start.hour(),
            self.start.minute(),
            self.end.hour(),
            self.end.minute(),
        )?;
        if self.duplicated {
            write!(f, " [{}]", if self.backward { "↓2nd" } else { "↑1st" })?;
        }
        Ok(())
    }
}

impl core::fmt::Debug for Hour {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "Hour({self})")
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for Hour {
    fn arbitrary(g: &mut quickcheck::Gen) -> Hour {
        use quickcheck::Arbitrary;

        use crate::civil::Date;

        let date = Date::arbitrary(g);
        let mut hour = i8::arbitrary(g).rem_euclid(24);
        let mut end = DateTime::new(date, hour, 0).unwrap();
        if rules::is_missing_hour(end.checked_add_minutes(-60).unwrap()) {
            hour = 12;
            end = DateTime::new(date, hour, 0).unwrap();
        }
        let start = end.checked_add_minutes(-60).unwrap();
        let backward = rules::is_duplicated_hour(start) && bool::arbitrary(g);
        Hour::with_backward(end, backward).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn end_is_the_anchor() {
        let h = Hour::new(DateTime::constant(2025, 7, 23, 1, 0)).unwrap();
        assert_eq!(h.start(), DateTime::constant(2025, 7, 23, 0, 0));
        assert_eq!(h.end(), DateTime::constant(2025, 7, 23, 1, 0));
    }

    #[test]
    fn midnight_end_crosses_the_date() {
        let h = Hour::new(DateTime::constant(2025, 1, 1, 0, 0)).unwrap();
        assert_eq!(h.start(), DateTime::constant(2024, 12, 31, 23, 0));
    }

    #[test]
    fn duplicated_hour_flags() {
        let end = DateTime::constant(2025, 10, 26, 3, 0);
        let first = Hour::new(end).unwrap();
        let second = Hour::second(end).unwrap();
        assert!(first.is_duplicated() && !first.is_backward());
        assert!(second.is_duplicated() && second.is_backward());
        assert_ne!(first, second);
        assert!(first < second);
    }

    #[test]
    fn missing_hour_rejected() {
        let err =
            Hour::new(DateTime::constant(2025, 3, 30, 3, 0)).unwrap_err();
        assert!(err.is_invalid_instant(), "{err}");
    }

    #[test]
    fn backward_needs_duplication() {
        let err =
            Hour::second(DateTime::constant(2025, 10, 26, 4, 0)).unwrap_err();
        assert!(err.is_invalid_backward(), "{err}");
    }

    #[test]
    fn children_are_four_quarters_carrying_the_occurrence() {
        let second = Hour::second(DateTime::constant(2025, 10, 26, 3, 0))
            .unwrap();
        let children = second.children();
        assert_eq!(children.len(), 4);
        for child in children {
            let Node::QuarterHour(q) = child else {
                panic!("hour child is not a quarter-hour: {child:?}")
            };
            assert!(q.is_duplicated() && q.is_backward());
        }
        assert_eq!(second.count(Unit::QuarterHour).unwrap(), 4);
    }

    #[test]
    fn display() {
        let h = Hour::new(DateTime::constant(2025, 10, 26, 3, 0)).unwrap();
        assert_eq!(h.to_string(), "2025-10-26 02:00-03:00 [↑1st]");
        let h = Hour::new(DateTime::constant(2025, 7, 23, 1, 0)).unwrap();
        assert_eq!(h.to_string(), "2025-07-23 00:00-01:00");
    }
}
