use alloc::string::String;

use crate::{civil::DateTime, unit::Unit};

/// An error that can occur in this crate.
///
/// The most common sources of errors are:
///
/// * Constructing a unit whose anchor falls inside the daylight saving
/// time gap. (The local hour `[02:00, 03:00)` on the last Sunday of March
/// does not exist.)
/// * Requesting the "second occurrence" of an instant that isn't
/// duplicated.
/// * Out of range parameters, like a quarter of `5` or a month-decade
/// index of `4`.
/// * Traversal requests for a unit that does not occur beneath the
/// current node, e.g., asking a `Day` for quarters.
///
/// # Design
///
/// This crate follows the "One True God Error Type Pattern," where one
/// error type exists for a variety of different operations. Finer grained
/// error types compose poorly, and every error here is a synchronous
/// validation failure surfaced at the offending call, so one type with a
/// few `is_*` predicates is enough.
#[derive(Clone, Debug)]
pub struct Error {
    kind: ErrorKind,
}

#[derive(Clone, Debug)]
enum ErrorKind {
    InvalidInstant { start: DateTime, what: &'static str },
    InvalidBackward { start: DateTime, what: &'static str },
    Range { what: &'static str, given: i64, min: i64, max: i64 },
    UnknownUnit { given: String },
    UnreachableUnit { root: Unit, target: Unit },
    Unsupported { unit: Unit },
}

impl Error {
    /// Returns true when this error came from anchoring a unit inside the
    /// daylight saving time gap.
    ///
    /// # Example
    ///
    /// ```
    /// use gridtime::{civil::DateTime, node::Hour};
    ///
    /// // 02:00-03:00 on the last Sunday of March doesn't exist.
    /// let err = Hour::new(DateTime::constant(2025, 3, 30, 3, 0)).unwrap_err();
    /// assert!(err.is_invalid_instant());
    /// ```
    pub fn is_invalid_instant(&self) -> bool {
        matches!(self.kind, ErrorKind::InvalidInstant { .. })
    }

    /// Returns true when this error came from requesting the second
    /// occurrence of an instant that is not duplicated.
    pub fn is_invalid_backward(&self) -> bool {
        matches!(self.kind, ErrorKind::InvalidBackward { .. })
    }

    /// Returns true when this error originated as a result of a value
    /// being out of its allowed range.
    ///
    /// # Example
    ///
    /// ```
    /// use gridtime::node::Quarter;
    ///
    /// assert!(Quarter::new(2024, 5).unwrap_err().is_range());
    /// ```
    pub fn is_range(&self) -> bool {
        matches!(self.kind, ErrorKind::Range { .. })
    }

    /// Returns true when this error came from parsing an unknown unit key.
    pub fn is_unknown_unit(&self) -> bool {
        matches!(self.kind, ErrorKind::UnknownUnit { .. })
    }

    /// Returns true when this error came from a traversal request for a
    /// unit that never occurs beneath the current node's type.
    pub fn is_unreachable_unit(&self) -> bool {
        matches!(self.kind, ErrorKind::UnreachableUnit { .. })
    }

    /// Returns true when this error came from calling `shift` on a unit
    /// type with no registered stepping function.
    pub fn is_unsupported(&self) -> bool {
        matches!(self.kind, ErrorKind::Unsupported { .. })
    }
}

impl Error {
    /// Creates a new error for an anchor that falls inside the DST gap.
    /// The `what` label names the unit being constructed (e.g., `"hour"`).
    #[inline(never)]
    #[cold]
    pub(crate) fn invalid_instant(what: &'static str, start: DateTime) -> Error {
        Error { kind: ErrorKind::InvalidInstant { start, what } }
    }

    /// Creates a new error for a backward flag on an instant that is not
    /// duplicated.
    #[inline(never)]
    #[cold]
    pub(crate) fn invalid_backward(what: &'static str, start: DateTime) -> Error {
        Error { kind: ErrorKind::InvalidBackward { start, what } }
    }

    /// Creates a new error indicating that a `given` value is out of the
    /// specified `min..=max` range. The given `what` label is used in the
    /// error message as a human readable description of what exactly is
    /// out of range. (e.g., `"quarter"`.)
    #[inline(never)]
    #[cold]
    pub(crate) fn range(
        what: &'static str,
        given: impl Into<i64>,
        min: impl Into<i64>,
        max: impl Into<i64>,
    ) -> Error {
        let (given, min, max) = (given.into(), min.into(), max.into());
        Error { kind: ErrorKind::Range { what, given, min, max } }
    }

    #[inline(never)]
    #[cold]
    pub(crate) fn unknown_unit(given: &str) -> Error {
        Error { kind: ErrorKind::UnknownUnit { given: String::from(given) } }
    }

    #[inline(never)]
    #[cold]
    pub(crate) fn unreachable_unit(root: Unit, target: Unit) -> Error {
        Error { kind: ErrorKind::UnreachableUnit { root, target } }
    }

    #[inline(never)]
    #[cold]
    pub(crate) fn unsupported(unit: Unit) -> Error {
        Error { kind: ErrorKind::Unsupported { unit } }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::ErrorKind::*;

        match self.kind {
            InvalidInstant { start, what } => write!(
                f,
                "cannot create {what} anchored at {start}: \
                 the instant falls in the daylight saving time gap \
                 and does not occur on the calendar",
            ),
            InvalidBackward { start, what } => write!(
                f,
                "{what} starting at {start} is not duplicated, \
                 so its second (backward) occurrence does not exist",
            ),
            Range { what, given, min, max } => write!(
                f,
                "parameter '{what}' with value {given} \
                 is not in the required range of {min}..={max}",
            ),
            UnknownUnit { ref given } => {
                write!(f, "unknown unit '{given}' (valid units are: ")?;
                for (i, unit) in Unit::ALL.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", unit.label())?;
                }
                write!(f, ")")
            }
            UnreachableUnit { root, target } => write!(
                f,
                "unit '{target}' does not occur in the tree rooted at \
                 a node of unit '{root}'",
                target = target.label(),
                root = root.label(),
            ),
            Unsupported { unit } => write!(
                f,
                "no stepping function is registered for unit '{unit}'",
                unit = unit.label(),
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn unknown_unit_lists_all_keys() {
        let err = Error::unknown_unit("fortnights");
        let msg = err.to_string();
        assert!(msg.contains("fortnights"), "{msg}");
        for unit in Unit::ALL {
            assert!(msg.contains(unit.label()), "{msg}");
        }
    }

    #[test]
    fn range_message() {
        let err = Error::range("quarter", 5, 1, 4);
        assert_eq!(
            err.to_string(),
            "parameter 'quarter' with value 5 \
             is not in the required range of 1..=4",
        );
        assert!(err.is_range());
    }
}
