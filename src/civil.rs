/*!
A plain-integer civil date and time kernel.

This is the smallest slice of Gregorian calendar machinery the unit tree
needs: a [`Date`], a minute-precision [`DateTime`], weekdays and ISO week
conversions. Values are "civil" in the sense that they carry no time zone
or offset; the daylight saving time rules in [`crate::rules`] are defined
directly on local wall-clock values, so nothing here ever consults a time
zone database.

All arithmetic goes through days-since-the-Unix-epoch (for dates) or
minutes-since-the-Unix-epoch (for datetimes), which keeps carrying across
day, month and year boundaries out of the unit code entirely.
*/

use crate::error::Error;

/// The minimum supported year.
pub(crate) const MIN_YEAR: i16 = -9999;

/// The maximum supported year.
pub(crate) const MAX_YEAR: i16 = 9999;

const MIN_EPOCH_DAY: i64 = epoch_day_from_ymd(MIN_YEAR as i64, 1, 1);
const MAX_EPOCH_DAY: i64 = epoch_day_from_ymd(MAX_YEAR as i64, 12, 31);

/// A representation of a civil date in the Gregorian calendar.
///
/// A `Date` value corresponds to a triple of year, month and day, and is
/// guaranteed to be a valid Gregorian calendar date within the supported
/// year range `-9999..=9999`. For example, `2023-02-29` cannot be
/// represented.
///
/// Dates are ordered chronologically and can be used as keys in sets and
/// maps.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Date {
    year: i16,
    month: i8,
    day: i8,
}

impl Date {
    /// The minimum representable date.
    pub const MIN: Date = Date::constant(MIN_YEAR, 1, 1);

    /// The maximum representable date.
    pub const MAX: Date = Date::constant(MAX_YEAR, 12, 31);

    /// Creates a new `Date` value from its component year, month and day
    /// values.
    ///
    /// # Errors
    ///
    /// This returns an error when the given year-month-day does not
    /// correspond to a valid date: the year must be in `-9999..=9999`,
    /// the month in `1..=12` and the day at most the number of days in
    /// the corresponding month.
    ///
    /// # Example
    ///
    /// ```
    /// use gridtime::civil::Date;
    ///
    /// let d = Date::new(2024, 2, 29)?;
    /// assert_eq!(d.day(), 29);
    /// assert!(Date::new(2023, 2, 29).is_err());
    /// # Ok::<(), gridtime::Error>(())
    /// ```
    pub fn new(year: i16, month: i8, day: i8) -> Result<Date, Error> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(Error::range("year", year, MIN_YEAR, MAX_YEAR));
        }
        if !(1..=12).contains(&month) {
            return Err(Error::range("month", month, 1, 12));
        }
        let last = days_in_month(year, month);
        if !(1..=last).contains(&day) {
            return Err(Error::range("day", day, 1, last));
        }
        Ok(Date { year, month, day })
    }

    /// Creates a new `Date` value in a `const` context.
    ///
    /// # Panics
    ///
    /// This routine panics when [`Date::new`] would return an error.
    pub const fn constant(year: i16, month: i8, day: i8) -> Date {
        assert!(MIN_YEAR <= year && year <= MAX_YEAR, "invalid year");
        assert!(1 <= month && month <= 12, "invalid month");
        assert!(1 <= day && day <= days_in_month(year, month), "invalid day");
        Date { year, month, day }
    }

    /// A constructor for components already known to form a valid date.
    pub(crate) const fn new_unchecked(year: i16, month: i8, day: i8) -> Date {
        debug_assert!(1 <= month && month <= 12);
        debug_assert!(1 <= day && day <= days_in_month(year, month));
        Date { year, month, day }
    }

    /// Returns the year of this date in the range `-9999..=9999`.
    pub fn year(self) -> i16 {
        self.year
    }

    /// Returns the month of this date in the range `1..=12`.
    pub fn month(self) -> i8 {
        self.month
    }

    /// Returns the day of the month of this date.
    pub fn day(self) -> i8 {
        self.day
    }

    /// Returns the weekday of this date.
    ///
    /// # Example
    ///
    /// ```
    /// use gridtime::civil::{Date, Weekday};
    ///
    /// // The 2025 autumn transition date.
    /// assert_eq!(Date::constant(2025, 10, 26).weekday(), Weekday::Sunday);
    /// ```
    pub fn weekday(self) -> Weekday {
        weekday_from_epoch_day(self.to_epoch_day())
    }

    /// Converts this date to the number of days since the Unix epoch
    /// (`1970-01-01`).
    pub(crate) const fn to_epoch_day(self) -> i64 {
        epoch_day_from_ymd(self.year as i64, self.month as i64, self.day as i64)
    }

    /// Converts days since the Unix epoch to a date.
    ///
    /// # Errors
    ///
    /// This returns an error when the resulting date would fall outside
    /// the supported year range.
    pub(crate) fn from_epoch_day(epoch_day: i64) -> Result<Date, Error> {
        if !(MIN_EPOCH_DAY..=MAX_EPOCH_DAY).contains(&epoch_day) {
            return Err(Error::range(
                "days since Unix epoch",
                epoch_day,
                MIN_EPOCH_DAY,
                MAX_EPOCH_DAY,
            ));
        }
        let (year, month, day) = ymd_from_epoch_day(epoch_day);
        Ok(Date::new_unchecked(year, month, day))
    }

    /// Returns the date `days` days after (or, for negative values,
    /// before) this one.
    ///
    /// # Errors
    ///
    /// This returns an error when the result would fall outside the
    /// supported year range.
    pub fn checked_add_days(self, days: i64) -> Result<Date, Error> {
        Date::from_epoch_day(self.to_epoch_day() + days)
    }

    /// Returns the ISO 8601 week date `(iso_year, iso_week)` containing
    /// this date.
    ///
    /// The ISO year of a date near the civil year boundary may differ
    /// from its civil year.
    ///
    /// # Example
    ///
    /// ```
    /// use gridtime::civil::Date;
    ///
    /// // 2024-12-30 is a Monday, and belongs to week 1 of ISO year 2025.
    /// assert_eq!(Date::constant(2024, 12, 30).iso_week_date(), (2025, 1));
    /// ```
    pub fn iso_week_date(self) -> (i16, i8) {
        let epoch_day = self.to_epoch_day();
        // A week's ISO year is the Gregorian year in which the Thursday
        // of that week falls, so the year of a date near the boundary can
        // be off by one in either direction.
        let mut iso_year = i64::from(self.year);
        if epoch_day < iso_week_start(iso_year) {
            iso_year -= 1;
        } else if epoch_day >= iso_week_start(iso_year + 1) {
            iso_year += 1;
        }
        let week = (epoch_day - iso_week_start(iso_year)) / 7 + 1;
        (iso_year as i16, week as i8)
    }
}

impl core::fmt::Display for Date {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl core::fmt::Debug for Date {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Display::fmt(self, f)
    }
}

/// A weekday.
///
/// Ordering and numbering follow ISO 8601: the week starts on Monday.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Weekday {
    Monday = 0,
    Tuesday = 1,
    Wednesday = 2,
    Thursday = 3,
    Friday = 4,
    Saturday = 5,
    Sunday = 6,
}

impl Weekday {
    /// Returns this weekday's offset from Monday in the range `0..=6`.
    pub fn to_monday_zero_offset(self) -> i8 {
        self as i8
    }

    fn from_monday_zero_offset(offset: i64) -> Weekday {
        match offset {
            0 => Weekday::Monday,
            1 => Weekday::Tuesday,
            2 => Weekday::Wednesday,
            3 => Weekday::Thursday,
            4 => Weekday::Friday,
            5 => Weekday::Saturday,
            6 => Weekday::Sunday,
            _ => unreachable!("weekday offset {offset} out of range"),
        }
    }
}

/// A civil datetime at minute precision.
///
/// This is the finest-grained anchor the unit tree needs: quarter-hours
/// start on 15 minute boundaries and nothing in this crate subdivides
/// them further.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct DateTime {
    date: Date,
    hour: i8,
    minute: i8,
}

impl DateTime {
    /// The minimum representable datetime.
    pub const MIN: DateTime = DateTime { date: Date::MIN, hour: 0, minute: 0 };

    /// The maximum representable datetime.
    pub const MAX: DateTime =
        DateTime { date: Date::MAX, hour: 23, minute: 59 };

    /// Creates a new `DateTime` from a date and a wall-clock hour and
    /// minute.
    ///
    /// # Errors
    ///
    /// This returns an error when the hour is not in `0..=23` or the
    /// minute is not in `0..=59`.
    pub fn new(date: Date, hour: i8, minute: i8) -> Result<DateTime, Error> {
        if !(0..=23).contains(&hour) {
            return Err(Error::range("hour", hour, 0, 23));
        }
        if !(0..=59).contains(&minute) {
            return Err(Error::range("minute", minute, 0, 59));
        }
        Ok(DateTime { date, hour, minute })
    }

    /// Creates a new `DateTime` value in a `const` context.
    ///
    /// # Panics
    ///
    /// This routine panics when any component is out of range, just as
    /// [`Date::constant`] and [`DateTime::new`] would reject it.
    pub const fn constant(
        year: i16,
        month: i8,
        day: i8,
        hour: i8,
        minute: i8,
    ) -> DateTime {
        assert!(0 <= hour && hour <= 23, "invalid hour");
        assert!(0 <= minute && minute <= 59, "invalid minute");
        DateTime { date: Date::constant(year, month, day), hour, minute }
    }

    /// Returns the date component.
    pub fn date(self) -> Date {
        self.date
    }

    /// Returns the hour in the range `0..=23`.
    pub fn hour(self) -> i8 {
        self.hour
    }

    /// Returns the minute in the range `0..=59`.
    pub fn minute(self) -> i8 {
        self.minute
    }

    /// Converts this datetime to the number of minutes since the Unix
    /// epoch.
    pub(crate) fn to_epoch_minute(self) -> i64 {
        self.date.to_epoch_day() * MINUTES_PER_DAY
            + i64::from(self.hour) * 60
            + i64::from(self.minute)
    }

    /// Converts minutes since the Unix epoch back to a datetime.
    pub(crate) fn from_epoch_minute(minute: i64) -> Result<DateTime, Error> {
        let date = Date::from_epoch_day(minute.div_euclid(MINUTES_PER_DAY))?;
        let of_day = minute.rem_euclid(MINUTES_PER_DAY);
        Ok(DateTime {
            date,
            hour: (of_day / 60) as i8,
            minute: (of_day % 60) as i8,
        })
    }

    /// Returns the datetime `minutes` minutes after (or, for negative
    /// values, before) this one.
    ///
    /// # Errors
    ///
    /// This returns an error when the result would fall outside the
    /// supported range.
    pub fn checked_add_minutes(self, minutes: i64) -> Result<DateTime, Error> {
        DateTime::from_epoch_minute(self.to_epoch_minute() + minutes)
    }
}

impl core::fmt::Display for DateTime {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{} {:02}:{:02}", self.date, self.hour, self.minute)
    }
}

impl core::fmt::Debug for DateTime {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Display::fmt(self, f)
    }
}

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Returns true if and only if the given year is a leap year.
///
/// A leap year is a year with 366 days. Typical years have 365 days.
///
/// # Example
///
/// ```
/// use gridtime::civil::is_leap_year;
///
/// assert!(is_leap_year(2024));
/// assert!(!is_leap_year(2025));
/// assert!(!is_leap_year(1900));
/// assert!(is_leap_year(2000));
/// ```
pub const fn is_leap_year(year: i16) -> bool {
    // From: https://github.com/BurntSushi/jiff/pull/23
    let d = if year % 25 != 0 { 4 } else { 16 };
    (year % d) == 0
}

/// Return the number of days in the given month.
///
/// # Example
///
/// ```
/// use gridtime::civil::days_in_month;
///
/// assert_eq!(days_in_month(2024, 2), 29);
/// assert_eq!(days_in_month(2025, 2), 28);
/// assert_eq!(days_in_month(2025, 10), 31);
/// ```
pub const fn days_in_month(year: i16, month: i8) -> i8 {
    // From: https://github.com/BurntSushi/jiff/pull/23
    if month == 2 {
        if is_leap_year(year) {
            29
        } else {
            28
        }
    } else {
        30 | (month ^ month >> 3)
    }
}

/// Converts a Gregorian date to days since the Unix epoch.
///
/// This is Neri-Schneider. There's no branching or divisions.
///
/// Ref: <https://github.com/cassioneri/eaf/blob/684d3cc32d14eee371d0abe4f683d6d6a49ed5c1/algorithms/neri_schneider.hpp#L83>
#[allow(non_upper_case_globals, non_snake_case)] // to mimic source
const fn epoch_day_from_ymd(year: i64, month: i64, day: i64) -> i64 {
    const s: u32 = 82;
    const K: u32 = 719468 + 146097 * s;
    const L: u32 = 400 * s;

    let year = year as u32;
    let month = month as u32;
    let day = day as u32;

    let J = month <= 2;
    let Y = year.wrapping_add(L).wrapping_sub(J as u32);
    let M = if J { month + 12 } else { month };
    let D = day - 1;
    let C = Y / 100;

    let y_star = 1461 * Y / 4 - C + C / 4;
    let m_star = (979 * M - 2919) / 32;
    let N = y_star + m_star + D;

    let N_U = N.wrapping_sub(K);
    N_U as i32 as i64
}

/// Converts days since the Unix epoch to a Gregorian date.
///
/// This is Neri-Schneider. There's no branching or divisions.
///
/// Ref: <https://github.com/cassioneri/eaf/blob/684d3cc32d14eee371d0abe4f683d6d6a49ed5c1/algorithms/neri_schneider.hpp#L40C3-L40C34>
#[allow(non_upper_case_globals, non_snake_case)] // to mimic source
const fn ymd_from_epoch_day(epoch_day: i64) -> (i16, i8, i8) {
    const s: u32 = 82;
    const K: u32 = 719468 + 146097 * s;
    const L: u32 = 400 * s;

    let N_U = epoch_day as u32;
    let N = N_U.wrapping_add(K);

    let N_1 = 4 * N + 3;
    let C = N_1 / 146097;
    let N_C = (N_1 % 146097) / 4;

    let N_2 = 4 * N_C + 3;
    let P_2 = 2939745 * (N_2 as u64);
    let Z = (P_2 / 4294967296) as u32;
    let N_Y = (P_2 % 4294967296) as u32 / 2939745 / 4;
    let Y = 100 * C + Z;

    let N_3 = 2141 * N_Y + 197913;
    let M = N_3 / 65536;
    let D = (N_3 % 65536) / 2141;

    let J = N_Y >= 306;
    let year = Y.wrapping_sub(L).wrapping_add(J as u32) as i16;
    let month = (if J { M - 12 } else { M }) as i8;
    let day = (D + 1) as i8;
    (year, month, day)
}

/// Returns the weekday for the given number of days since the Unix epoch.
///
/// Based on Hinnant's approach, using ISO weekday numbering. This works
/// by using the knowledge that 1970-01-01 was a Thursday.
///
/// Ref: <http://howardhinnant.github.io/date_algorithms.html>
fn weekday_from_epoch_day(epoch_day: i64) -> Weekday {
    Weekday::from_monday_zero_offset((epoch_day + 3).rem_euclid(7))
}

/// Returns the Unix epoch day corresponding to the Monday of the first
/// week of the ISO 8601 week year given.
///
/// A week's year always corresponds to the Gregorian year in which the
/// Thursday of that week falls. Therefore, Jan 4 is *always* in the
/// first week of any ISO week year.
///
/// Ref: <http://howardhinnant.github.io/date_algorithms.html>
///
/// The year is taken as an `i64` so that callers may ask about the year
/// following `MAX_YEAR` (needed to count the weeks of `MAX_YEAR` itself).
pub(crate) fn iso_week_start(iso_year: i64) -> i64 {
    let jan4 = epoch_day_from_ymd(iso_year, 1, 4);
    let weekday = weekday_from_epoch_day(jan4);
    jan4 - i64::from(weekday.to_monday_zero_offset())
}

/// Returns the number of ISO 8601 weeks (52 or 53) in the given week
/// year.
pub(crate) fn weeks_in_iso_year(iso_year: i16) -> i8 {
    let iso_year = i64::from(iso_year);
    ((iso_week_start(iso_year + 1) - iso_week_start(iso_year)) / 7) as i8
}

/// Returns the date of the given weekday offset (0 = Monday) within the
/// given ISO week.
pub(crate) fn date_from_iso_week(
    iso_year: i16,
    iso_week: i8,
    weekday_offset: i8,
) -> Result<Date, Error> {
    let epoch_day = iso_week_start(i64::from(iso_year))
        + i64::from(iso_week - 1) * 7
        + i64::from(weekday_offset);
    Date::from_epoch_day(epoch_day)
}

#[cfg(test)]
impl quickcheck::Arbitrary for Date {
    fn arbitrary(g: &mut quickcheck::Gen) -> Date {
        use quickcheck::Arbitrary;

        // A few centuries around the present is plenty of variety for
        // the properties tested with these.
        let year = 1800 + i16::arbitrary(g).rem_euclid(400);
        let month = 1 + i8::arbitrary(g).rem_euclid(12);
        let day = 1 + i8::arbitrary(g).rem_euclid(days_in_month(year, month));
        Date::new_unchecked(year, month, day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_epoch_day_date() {
        for year in MIN_YEAR..=MAX_YEAR {
            for month in 1..=12 {
                for day in 1..=days_in_month(year, month) {
                    let date = Date::new_unchecked(year, month, day);
                    let epoch_day = date.to_epoch_day();
                    let roundtrip = Date::from_epoch_day(epoch_day).unwrap();
                    assert_eq!(date, roundtrip);
                }
            }
        }
    }

    #[test]
    fn epoch_day_anchors() {
        assert_eq!(Date::constant(1970, 1, 1).to_epoch_day(), 0);
        assert_eq!(Date::constant(1969, 12, 31).to_epoch_day(), -1);
        assert_eq!(Date::constant(1970, 1, 2).to_epoch_day(), 1);
    }

    #[test]
    fn leap_year() {
        assert!(!is_leap_year(1900));
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(2001));
        assert!(!is_leap_year(2002));
        assert!(!is_leap_year(2003));
        assert!(is_leap_year(2004));
    }

    #[test]
    fn number_of_days_in_month() {
        let expected =
            [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
        for (i, &days) in expected.iter().enumerate() {
            assert_eq!(days_in_month(2025, (i + 1) as i8), days);
        }
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
    }

    #[test]
    fn weekdays() {
        // 1970-01-01 was a Thursday.
        assert_eq!(Date::constant(1970, 1, 1).weekday(), Weekday::Thursday);
        assert_eq!(Date::constant(2025, 3, 30).weekday(), Weekday::Sunday);
        assert_eq!(Date::constant(2025, 10, 26).weekday(), Weekday::Sunday);
        assert_eq!(Date::constant(2024, 12, 30).weekday(), Weekday::Monday);
    }

    #[test]
    fn iso_week_date_boundaries() {
        // 2024-12-30 (Monday) opens week 1 of ISO year 2025.
        assert_eq!(Date::constant(2024, 12, 30).iso_week_date(), (2025, 1));
        // 2021-01-03 (Sunday) still belongs to week 53 of ISO year 2020.
        assert_eq!(Date::constant(2021, 1, 3).iso_week_date(), (2020, 53));
        assert_eq!(Date::constant(2021, 1, 4).iso_week_date(), (2021, 1));
        assert_eq!(Date::constant(2025, 5, 14).iso_week_date(), (2025, 20));
    }

    #[test]
    fn iso_week_roundtrip() {
        for year in 1990..=2050 {
            for month in 1..=12 {
                for day in 1..=days_in_month(year, month) {
                    let date = Date::new_unchecked(year, month, day);
                    let (iso_year, iso_week) = date.iso_week_date();
                    let offset = date.weekday().to_monday_zero_offset();
                    let got =
                        date_from_iso_week(iso_year, iso_week, offset).unwrap();
                    assert_eq!(date, got, "for ISO {iso_year}-W{iso_week}");
                }
            }
        }
    }

    #[test]
    fn weeks_per_iso_year() {
        assert_eq!(weeks_in_iso_year(2020), 53);
        assert_eq!(weeks_in_iso_year(2021), 52);
        assert_eq!(weeks_in_iso_year(2024), 52);
        assert_eq!(weeks_in_iso_year(2026), 53);
    }

    #[test]
    fn datetime_minute_arithmetic() {
        let dt = DateTime::constant(2025, 1, 1, 0, 0);
        let prev = dt.checked_add_minutes(-15).unwrap();
        assert_eq!(prev, DateTime::constant(2024, 12, 31, 23, 45));
        assert_eq!(prev.checked_add_minutes(15).unwrap(), dt);
    }

    #[test]
    fn out_of_range() {
        assert!(Date::new(10_000, 1, 1).is_err());
        assert!(Date::new(2025, 13, 1).is_err());
        assert!(Date::new(2025, 11, 31).is_err());
        assert!(DateTime::new(Date::MAX, 24, 0).is_err());
        assert!(DateTime::MAX.checked_add_minutes(1).is_err());
        assert!(DateTime::MIN.checked_add_minutes(-1).is_err());
    }
}
