/*!
Child factories for the composite calendar nodes.

Each function here builds the complete, chronologically ordered child
list of one composite unit. The node types call these lazily from their
`children` methods and cache the result, but the factories are also
useful directly when only the concrete children are wanted, without
wrapping them in [`Node`](crate::Node) values.

The hour factory is where the daylight saving rules shape the tree:
the hour deleted by the spring-forward transition is skipped and the
hour duplicated by the fall-back transition is emitted twice, so a day
has 23, 24 or 25 hour children.
*/

use alloc::vec::Vec;

use crate::{
    civil::{days_in_month, Date, DateTime},
    error::Error,
    node::{Day, Hour, Month, Quarter, QuarterHour, SeasonKind},
};

/// Returns the four quarter-hours of the given hour.
///
/// The quarter-hours inherit the hour's occurrence: both copies of the
/// duplicated hour get four children of their own, each carrying the
/// parent's backward flag, so either copy's children contiguously cover
/// its span.
pub fn quarter_hours(hour: &Hour) -> Vec<QuarterHour> {
    let mut children = Vec::with_capacity(4);
    for i in 0..4 {
        let start = hour
            .start()
            .checked_add_minutes(i * 15)
            .expect("quarter-hour boundaries of a valid hour are in range");
        let qh = QuarterHour::with_backward(start, hour.is_backward())
            .expect("quarter-hours of a valid hour are valid");
        children.push(qh);
    }
    children
}

/// Returns the hours of the given date, in chronological order.
///
/// Hours are anchored on their ends, so the list runs from the hour
/// ending at 01:00 to the hour ending at midnight of the next day. On
/// a spring-forward date the deleted hour is absent (23 hours); on a
/// fall-back date the duplicated hour appears twice, first occurrence
/// first (25 hours).
///
/// # Errors
///
/// This returns an error when an hour boundary falls outside the
/// supported range, which only happens on the last supported date.
pub fn hours(date: Date) -> Result<Vec<Hour>, Error> {
    let midnight = DateTime::new(date, 0, 0)?;
    let mut children = Vec::with_capacity(24);
    for i in 1..=24 {
        let end = midnight.checked_add_minutes(i * 60)?;
        let start = end.checked_add_minutes(-60)?;
        if crate::rules::is_missing_hour(start) {
            trace!("omitting missing hour starting at {start}");
            continue;
        }
        children.push(Hour::new(end)?);
        if crate::rules::is_duplicated_hour(start) {
            trace!("duplicating hour starting at {start}");
            children.push(Hour::second(end)?);
        }
    }
    Ok(children)
}

/// Returns the days of the given month, in order.
///
/// # Errors
///
/// This returns an error when the year or month is out of range, or
/// when the month runs into the very last supported date.
pub fn month_days(year: i16, month: i8) -> Result<Vec<Day>, Error> {
    // Validates the year and month.
    Date::new(year, month, 1)?;
    (1..=days_in_month(year, month))
        .map(|day| Day::new(Date::new_unchecked(year, month, day)))
        .collect()
}

/// Returns the days of the given decade of a month. Decades 1 and 2
/// cover days 1-10 and 11-20; decade 3 runs to the end of the month.
///
/// # Errors
///
/// This returns an error when the year, month or decade index is out of
/// range, or when the decade runs into the very last supported date.
pub fn decade_days(
    year: i16,
    month: i8,
    index: i8,
) -> Result<Vec<Day>, Error> {
    if !(1..=3).contains(&index) {
        return Err(Error::range("decade index", index, 1, 3));
    }
    Date::new(year, month, 1)?;
    let start = 1 + (index - 1) * 10;
    let end =
        if index < 3 { start + 9 } else { days_in_month(year, month) };
    (start..=end)
        .map(|day| Day::new(Date::new_unchecked(year, month, day)))
        .collect()
}

/// Returns the seven days of the week starting on the given Monday.
///
/// # Errors
///
/// This returns an error when any of the days falls outside the
/// supported range.
pub fn week_days(monday: Date) -> Result<Vec<Day>, Error> {
    let mut days = Vec::with_capacity(7);
    for i in 0..7 {
        days.push(Day::new(monday.checked_add_days(i)?)?);
    }
    Ok(days)
}

/// Returns the three months of the given quarter.
///
/// # Errors
///
/// This returns an error when the year or quarter index is out of
/// range.
pub fn quarter_months(year: i16, quarter: i8) -> Result<Vec<Month>, Error> {
    if !(1..=4).contains(&quarter) {
        return Err(Error::range("quarter", quarter, 1, 4));
    }
    let first = 1 + (quarter - 1) * 3;
    (first..first + 3).map(|month| Month::new(year, month)).collect()
}

/// Returns the four quarters of the given year.
///
/// # Errors
///
/// This returns an error when the year is out of range.
pub fn year_quarters(year: i16) -> Result<Vec<Quarter>, Error> {
    (1..=4).map(|quarter| Quarter::new(year, quarter)).collect()
}

/// Returns the two quarters of the given season. A summer's quarters
/// both belong to its year; a winter's second quarter belongs to the
/// following year.
///
/// # Errors
///
/// This returns an error when the year is out of range, including when
/// a winter season would extend past the supported maximum year.
pub fn season_quarters(
    year: i16,
    kind: SeasonKind,
) -> Result<Vec<Quarter>, Error> {
    match kind {
        SeasonKind::Summer => {
            Ok(alloc::vec![Quarter::new(year, 2)?, Quarter::new(year, 3)?])
        }
        SeasonKind::Winter => {
            let next = year
                .checked_add(1)
                .ok_or_else(|| Error::range("year", year, -9999, 9998))?;
            Ok(alloc::vec![Quarter::new(year, 4)?, Quarter::new(next, 1)?])
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn hours_on_ordinary_day() {
        let got = hours(Date::constant(2025, 7, 1)).unwrap();
        assert_eq!(got.len(), 24);
        assert_eq!(got[0].to_string(), "2025-07-01 00:00-01:00");
        assert_eq!(got[23].to_string(), "2025-07-01 23:00-00:00");
    }

    #[test]
    fn hours_on_spring_forward_day() {
        let got = hours(Date::constant(2025, 3, 30)).unwrap();
        assert_eq!(got.len(), 23);
        // 01:00-02:00 is followed directly by 03:00-04:00.
        assert_eq!(got[1].to_string(), "2025-03-30 01:00-02:00");
        assert_eq!(got[2].to_string(), "2025-03-30 03:00-04:00");
    }

    #[test]
    fn hours_on_fall_back_day() {
        let got = hours(Date::constant(2025, 10, 26)).unwrap();
        assert_eq!(got.len(), 25);
        assert_eq!(got[2].to_string(), "2025-10-26 02:00-03:00 [↑1st]");
        assert_eq!(got[3].to_string(), "2025-10-26 02:00-03:00 [↓2nd]");
        assert_eq!(got[4].to_string(), "2025-10-26 03:00-04:00");
    }

    #[test]
    fn quarter_hours_follow_occurrence() {
        let second =
            Hour::second(DateTime::constant(2025, 10, 26, 3, 0)).unwrap();
        let got = quarter_hours(&second);
        assert_eq!(got.len(), 4);
        assert!(got.iter().all(|qh| qh.is_backward()));
        assert_eq!(got[0].to_string(), "2025-10-26 02:00-02:15 [↓2nd]");
        assert_eq!(got[3].to_string(), "2025-10-26 02:45-03:00 [↓2nd]");
    }

    #[test]
    fn days_of_february() {
        assert_eq!(month_days(2024, 2).unwrap().len(), 29);
        assert_eq!(month_days(2025, 2).unwrap().len(), 28);
    }

    #[test]
    fn days_at_the_end_of_the_range() {
        // The last supported date has no representable closing
        // midnight, so spans including it cannot be built.
        assert!(month_days(9999, 12).unwrap_err().is_range());
        assert!(decade_days(9999, 12, 3).unwrap_err().is_range());
        assert_eq!(month_days(9999, 11).unwrap().len(), 30);
    }

    #[test]
    fn decade_days_cover_the_month() {
        let total: usize = (1..=3)
            .map(|i| decade_days(2025, 2, i).unwrap().len())
            .sum();
        assert_eq!(total, 28);
        assert_eq!(decade_days(2025, 2, 3).unwrap().len(), 8);
        assert!(decade_days(2025, 2, 4).unwrap_err().is_range());
    }

    #[test]
    fn week_days_run_monday_to_sunday() {
        let days = week_days(Date::constant(2025, 5, 12)).unwrap();
        assert_eq!(days.len(), 7);
        assert_eq!(days[6].to_string(), "2025-05-18");
    }

    #[test]
    fn winter_quarters_cross_years() {
        let quarters = season_quarters(2024, SeasonKind::Winter).unwrap();
        assert_eq!(quarters[0].to_string(), "2024-Q4");
        assert_eq!(quarters[1].to_string(), "2025-Q1");
        assert!(season_quarters(9999, SeasonKind::Winter)
            .unwrap_err()
            .is_range());
    }
}
