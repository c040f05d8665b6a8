use crate::{
    civil::DateTime,
    error::Error,
    rules,
    step,
    unit::Unit,
};

/// A quarter of an hour, the leaf unit of the calendar tree.
///
/// A `QuarterHour` is anchored on its start instant; its end is always
/// fifteen minutes later. Within the hour duplicated by the fall-back
/// transition, every quarter-hour occurs twice: the two occurrences are
/// distinguished by the backward flag, compare unequal and order
/// first-before-second.
///
/// # Example
///
/// ```
/// use gridtime::{civil::DateTime, node::QuarterHour};
///
/// let q = QuarterHour::new(DateTime::constant(2025, 10, 26, 2, 0))?;
/// assert!(q.is_duplicated());
/// assert!(!q.is_backward());
/// assert_eq!(q.next()?, QuarterHour::second(q.start())?);
/// # Ok::<(), gridtime::Error>(())
/// ```
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct QuarterHour {
    start: DateTime,
    end: DateTime,
    duplicated: bool,
    backward: bool,
}

impl QuarterHour {
    /// Creates the quarter-hour starting at the given instant.
    ///
    /// If the instant is duplicated by the fall-back transition, this
    /// returns the first occurrence; use [`QuarterHour::second`] for the
    /// second one.
    ///
    /// # Errors
    ///
    /// This returns an error when the instant falls inside the
    /// spring-forward gap (such an instant has zero occurrences), or when
    /// the quarter-hour's end would fall outside the supported range.
    pub fn new(start: DateTime) -> Result<QuarterHour, Error> {
        QuarterHour::with_backward(start, false)
    }

    /// Creates the second occurrence of a duplicated quarter-hour.
    ///
    /// # Errors
    ///
    /// In addition to the cases rejected by [`QuarterHour::new`], this
    /// returns an error when the instant is not actually duplicated.
    pub fn second(start: DateTime) -> Result<QuarterHour, Error> {
        QuarterHour::with_backward(start, true)
    }

    /// Creates the quarter-hour starting at the given instant, as the
    /// first (`backward == false`) or second (`backward == true`)
    /// occurrence.
    pub fn with_backward(
        start: DateTime,
        backward: bool,
    ) -> Result<QuarterHour, Error> {
        if rules::is_missing_quarter(start) {
            return Err(Error::invalid_instant("quarter-hour", start));
        }
        let duplicated = rules::is_duplicated_quarter(start);
        if backward && !duplicated {
            return Err(Error::invalid_backward("quarter-hour", start));
        }
        let end = start.checked_add_minutes(15)?;
        Ok(QuarterHour { start, end, duplicated, backward })
    }

    /// Returns the start instant.
    pub fn start(&self) -> DateTime {
        self.start
    }

    /// Returns the end instant, always fifteen minutes past the start.
    pub fn end(&self) -> DateTime {
        self.end
    }

    /// Returns true when this quarter-hour falls inside the hour
    /// duplicated by the fall-back transition.
    pub fn is_duplicated(&self) -> bool {
        self.duplicated
    }

    /// Returns true when this is the second occurrence of a duplicated
    /// quarter-hour.
    pub fn is_backward(&self) -> bool {
        self.backward
    }

    /// Returns this node's unit, [`Unit::QuarterHour`].
    pub fn unit(&self) -> Unit {
        Unit::QuarterHour
    }

    /// Returns the quarter-hour reached by moving `steps` quarter-hours
    /// forward (positive) or backward (negative), threading through
    /// duplicated and missing instants.
    ///
    /// # Errors
    ///
    /// This returns an error when an intermediate or resulting instant
    /// falls outside the supported range.
    ///
    /// # Example
    ///
    /// ```
    /// use gridtime::{civil::DateTime, node::QuarterHour};
    ///
    /// // The quarter before the spring-forward gap steps straight over it.
    /// let q = QuarterHour::new(DateTime::constant(2025, 3, 30, 1, 45))?;
    /// assert_eq!(q.next()?.start(), DateTime::constant(2025, 3, 30, 3, 0));
    /// # Ok::<(), gridtime::Error>(())
    /// ```
    pub fn shift(&self, steps: i64) -> Result<QuarterHour, Error> {
        step::shift_quarter_hour(self, steps)
    }

    /// Returns the following quarter-hour. Equivalent to `shift(1)`.
    pub fn next(&self) -> Result<QuarterHour, Error> {
        self.shift(1)
    }

    /// Returns the preceding quarter-hour. Equivalent to `shift(-1)`.
    pub fn prev(&self) -> Result<QuarterHour, Error> {
        self.shift(-1)
    }
}

impl core::fmt::Display for QuarterHour {
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

impl core::fmt::Debug for QuarterHour {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "QuarterHour({self})")
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for QuarterHour {
    fn arbitrary(g: &mut quickcheck::Gen) -> QuarterHour {
        use quickcheck::Arbitrary;

        use crate::civil::Date;

        let date = Date::arbitrary(g);
        let mut hour = i8::arbitrary(g).rem_euclid(24);
        let minute = *g.choose(&[0, 15, 30, 45]).unwrap();
        let mut start = DateTime::new(date, hour, minute).unwrap();
        if rules::is_missing_quarter(start) {
            hour = 12;
            start = DateTime::new(date, hour, minute).unwrap();
        }
        let backward =
            rules::is_duplicated_quarter(start) && bool::arbitrary(g);
        QuarterHour::with_backward(start, backward).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn valid_quarter() {
        let start = DateTime::constant(2025, 3, 30, 1, 0);
        let q = QuarterHour::new(start).unwrap();
        assert_eq!(q.start(), start);
        assert_eq!(q.end(), DateTime::constant(2025, 3, 30, 1, 15));
        assert!(!q.is_duplicated());
    }

    #[test]
    fn missing_quarter_rejected() {
        for minute in [0, 15, 30, 45] {
            let start = DateTime::new(
                crate::civil::Date::constant(2025, 3, 30),
                2,
                minute,
            )
            .unwrap();
            let err = QuarterHour::new(start).unwrap_err();
            assert!(err.is_invalid_instant(), "{err}");
        }
    }

    #[test]
    fn backward_needs_duplication() {
        let start = DateTime::constant(2025, 10, 26, 3, 0);
        let err = QuarterHour::second(start).unwrap_err();
        assert!(err.is_invalid_backward(), "{err}");
    }

    #[test]
    fn occurrences_compare_unequal_and_ordered() {
        let start = DateTime::constant(2025, 10, 26, 2, 0);
        let first = QuarterHour::new(start).unwrap();
        let second = QuarterHour::second(start).unwrap();
        assert_ne!(first, second);
        assert!(first < second);
        assert_eq!(first.start(), second.start());
        assert_eq!(first.end(), second.end());
    }

    #[test]
    fn display() {
        let q =
            QuarterHour::new(DateTime::constant(2025, 10, 26, 2, 0)).unwrap();
        assert_eq!(q.to_string(), "2025-10-26 02:00-02:15 [↑1st]");
        let q = QuarterHour::second(DateTime::constant(2025, 10, 26, 2, 45))
            .unwrap();
        assert_eq!(q.to_string(), "2025-10-26 02:45-03:00 [↓2nd]");
        let q = QuarterHour::new(DateTime::constant(2025, 7, 1, 9, 30)).unwrap();
        assert_eq!(q.to_string(), "2025-07-01 09:30-09:45");
    }
}
