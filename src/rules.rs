/*!
The daylight saving time transition rules.

The rules are fixed and deterministic: clocks spring forward on the last
Sunday of March at 02:00 local wall-clock time (deleting the hour
`[02:00, 03:00)` from the calendar) and fall back on the last Sunday of
October at 02:00 (making that hour occur twice). No time zone database is
consulted.

All predicates are pure functions over a local [`DateTime`]. They are
evaluated on every leaf and composite construction, and by every child
factory.
*/

use crate::civil::{days_in_month, Date, DateTime, Weekday};

/// Returns true if and only if `start` falls inside the hour deleted by
/// the spring-forward transition.
///
/// That is the hour `[02:00, 03:00)` on the last Sunday of March. The
/// minute is deliberately ignored, so all four quarter-hours within the
/// transition hour count as missing too.
///
/// # Example
///
/// ```
/// use gridtime::{civil::DateTime, rules};
///
/// assert!(rules::is_missing_hour(DateTime::constant(2025, 3, 30, 2, 0)));
/// assert!(!rules::is_missing_hour(DateTime::constant(2025, 3, 30, 3, 0)));
/// assert!(!rules::is_missing_hour(DateTime::constant(2025, 3, 23, 2, 0)));
/// ```
pub fn is_missing_hour(start: DateTime) -> bool {
    is_transition_hour(start, 3)
}

/// Returns true if and only if `start` is a quarter-hour boundary inside
/// the spring-forward gap.
///
/// Quarter-hour granularity inherits the hour rule: the entire
/// `[02:00, 03:00)` block is missing.
pub fn is_missing_quarter(start: DateTime) -> bool {
    is_missing_hour(start)
}

/// Returns true if and only if `start` falls inside the hour duplicated
/// by the fall-back transition.
///
/// That is the hour `[02:00, 03:00)` on the last Sunday of October,
/// which occurs twice.
///
/// # Example
///
/// ```
/// use gridtime::{civil::DateTime, rules};
///
/// assert!(rules::is_duplicated_hour(DateTime::constant(2025, 10, 26, 2, 0)));
/// assert!(!rules::is_duplicated_hour(DateTime::constant(2025, 10, 27, 2, 0)));
/// ```
pub fn is_duplicated_hour(start: DateTime) -> bool {
    is_transition_hour(start, 10)
}

/// Returns true if and only if `start` is a quarter-hour boundary inside
/// the duplicated hour.
pub fn is_duplicated_quarter(start: DateTime) -> bool {
    is_duplicated_hour(start)
}

/// Returns true when `start` falls in hour 02 of the last Sunday of
/// `month` in its year.
fn is_transition_hour(start: DateTime, month: i8) -> bool {
    let date = start.date();
    if date.month() != month || start.hour() != 2 {
        return false;
    }
    if date.weekday() != Weekday::Sunday {
        return false;
    }
    date.day() == last_sunday(date.year(), month)
}

/// Returns the day of the month of the last Sunday in the given month.
///
/// Computed by scanning the final seven days of the month for a Sunday.
pub(crate) fn last_sunday(year: i16, month: i8) -> i8 {
    let last = days_in_month(year, month);
    for day in (last - 6..=last).rev() {
        if Date::new_unchecked(year, month, day).weekday() == Weekday::Sunday {
            return day;
        }
    }
    unreachable!("every span of 7 days contains a Sunday")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_sundays() {
        // Actual EU transition dates.
        assert_eq!(last_sunday(2021, 3), 28);
        assert_eq!(last_sunday(2021, 10), 31);
        assert_eq!(last_sunday(2024, 3), 31);
        assert_eq!(last_sunday(2024, 10), 27);
        assert_eq!(last_sunday(2025, 3), 30);
        assert_eq!(last_sunday(2025, 10), 26);
        assert_eq!(last_sunday(2026, 3), 29);
        assert_eq!(last_sunday(2026, 10), 25);
    }

    #[test]
    fn missing_hour() {
        assert!(is_missing_hour(DateTime::constant(2025, 3, 30, 2, 0)));
        // Quarter boundaries within the gap are missing as well.
        assert!(is_missing_quarter(DateTime::constant(2025, 3, 30, 2, 15)));
        assert!(is_missing_quarter(DateTime::constant(2025, 3, 30, 2, 45)));
        // Around the gap.
        assert!(!is_missing_hour(DateTime::constant(2025, 3, 30, 1, 0)));
        assert!(!is_missing_hour(DateTime::constant(2025, 3, 30, 3, 0)));
        // Not the last Sunday.
        assert!(!is_missing_hour(DateTime::constant(2025, 3, 23, 2, 0)));
        // October's transition duplicates, it doesn't delete.
        assert!(!is_missing_hour(DateTime::constant(2025, 10, 26, 2, 0)));
    }

    #[test]
    fn duplicated_hour() {
        assert!(is_duplicated_hour(DateTime::constant(2025, 10, 26, 2, 0)));
        assert!(is_duplicated_quarter(DateTime::constant(2025, 10, 26, 2, 30)));
        assert!(!is_duplicated_quarter(DateTime::constant(2025, 10, 26, 3, 0)));
        assert!(!is_duplicated_hour(DateTime::constant(2025, 10, 27, 2, 0)));
        assert!(!is_duplicated_hour(DateTime::constant(2025, 3, 30, 2, 0)));
    }
}
