/*!
The per-unit stepping functions behind [`Node::shift`].

The registry in [`crate::unit`] points each unit at one of the
`Node`-typed dispatchers below, which unwrap the concrete node and call
the typed `shift_*` routine. The concrete node types call the typed
routines directly.

Coarse units step by plain index arithmetic: a month, quarter, season
or decade has an obvious position on an infinite number line, and
`div_euclid`/`rem_euclid` decode the destination. Hours and
quarter-hours cannot be indexed that way, because the daylight saving
transitions delete and duplicate wall-clock instants. Those two walk
one occurrence at a time, skipping the spring-forward gap and threading
through both copies of the fall-back hour.
*/

use crate::{
    civil::{DateTime, MAX_YEAR, MIN_YEAR},
    error::Error,
    node::{
        Day, Decade, Hour, Month, Node, Quarter, QuarterHour, Season,
        SeasonKind, Week, Year,
    },
    rules,
};

pub(crate) fn quarter_hour(node: &Node, steps: i64) -> Result<Node, Error> {
    match *node {
        Node::QuarterHour(ref n) => {
            shift_quarter_hour(n, steps).map(Node::QuarterHour)
        }
        _ => unreachable!("quarter-hour step dispatched to {node:?}"),
    }
}

pub(crate) fn hour(node: &Node, steps: i64) -> Result<Node, Error> {
    match *node {
        Node::Hour(ref n) => shift_hour(n, steps).map(Node::Hour),
        _ => unreachable!("hour step dispatched to {node:?}"),
    }
}

pub(crate) fn day(node: &Node, steps: i64) -> Result<Node, Error> {
    match *node {
        Node::Day(ref n) => shift_day(n, steps).map(Node::Day),
        _ => unreachable!("day step dispatched to {node:?}"),
    }
}

pub(crate) fn week(node: &Node, steps: i64) -> Result<Node, Error> {
    match *node {
        Node::Week(ref n) => shift_week(n, steps).map(Node::Week),
        _ => unreachable!("week step dispatched to {node:?}"),
    }
}

pub(crate) fn decade(node: &Node, steps: i64) -> Result<Node, Error> {
    match *node {
        Node::Decade(ref n) => shift_decade(n, steps).map(Node::Decade),
        _ => unreachable!("decade step dispatched to {node:?}"),
    }
}

pub(crate) fn month(node: &Node, steps: i64) -> Result<Node, Error> {
    match *node {
        Node::Month(ref n) => shift_month(n, steps).map(Node::Month),
        _ => unreachable!("month step dispatched to {node:?}"),
    }
}

pub(crate) fn quarter(node: &Node, steps: i64) -> Result<Node, Error> {
    match *node {
        Node::Quarter(ref n) => shift_quarter(n, steps).map(Node::Quarter),
        _ => unreachable!("quarter step dispatched to {node:?}"),
    }
}

pub(crate) fn season(node: &Node, steps: i64) -> Result<Node, Error> {
    match *node {
        Node::Season(ref n) => shift_season(n, steps).map(Node::Season),
        _ => unreachable!("season step dispatched to {node:?}"),
    }
}

pub(crate) fn year(node: &Node, steps: i64) -> Result<Node, Error> {
    match *node {
        Node::Year(ref n) => shift_year(n, steps).map(Node::Year),
        _ => unreachable!("year step dispatched to {node:?}"),
    }
}

pub(crate) fn shift_quarter_hour(
    qh: &QuarterHour,
    steps: i64,
) -> Result<QuarterHour, Error> {
    if steps == 0 {
        return Ok(*qh);
    }
    check_projection(qh.start(), 15, steps)?;
    let direction = steps.signum();
    let mut current = *qh;
    for _ in 0..steps.unsigned_abs() {
        current = quarter_hour_once(current, direction)?;
    }
    Ok(current)
}

/// Moves one quarter-hour occurrence forward or backward.
fn quarter_hour_once(
    current: QuarterHour,
    direction: i64,
) -> Result<QuarterHour, Error> {
    // Within the fall-back hour, the first copy steps forward onto the
    // second copy of the same instant, and vice versa backward.
    if direction > 0 && current.is_duplicated() && !current.is_backward() {
        return QuarterHour::second(current.start());
    }
    if direction < 0 && current.is_duplicated() && current.is_backward() {
        return QuarterHour::new(current.start());
    }
    let mut start = current.start().checked_add_minutes(15 * direction)?;
    while rules::is_missing_quarter(start) {
        trace!("stepping over missing quarter-hour at {start}");
        start = start.checked_add_minutes(15 * direction)?;
    }
    // Entering a duplicated instant forward lands on its first copy;
    // entering it backward lands on its second.
    let backward = direction < 0 && rules::is_duplicated_quarter(start);
    QuarterHour::with_backward(start, backward)
}

pub(crate) fn shift_hour(hour: &Hour, steps: i64) -> Result<Hour, Error> {
    if steps == 0 {
        return Ok(hour.clone());
    }
    check_projection(hour.end(), 60, steps)?;
    let direction = steps.signum();
    let mut current = hour.clone();
    for _ in 0..steps.unsigned_abs() {
        current = hour_once(&current, direction)?;
    }
    Ok(current)
}

/// Moves one hour occurrence forward or backward.
fn hour_once(current: &Hour, direction: i64) -> Result<Hour, Error> {
    if direction > 0 && current.is_duplicated() && !current.is_backward() {
        return Hour::second(current.end());
    }
    if direction < 0 && current.is_duplicated() && current.is_backward() {
        return Hour::new(current.end());
    }
    let mut end = current.end().checked_add_minutes(60 * direction)?;
    loop {
        let start = end.checked_add_minutes(-60)?;
        if rules::is_missing_hour(start) {
            trace!("stepping over missing hour at {start}");
            end = end.checked_add_minutes(60 * direction)?;
            continue;
        }
        let backward = direction < 0 && rules::is_duplicated_hour(start);
        return Hour::with_backward(end, backward);
    }
}

pub(crate) fn shift_day(day: &Day, steps: i64) -> Result<Day, Error> {
    Day::new(day.date().checked_add_days(clamp_days(steps))?)
}

pub(crate) fn shift_week(week: &Week, steps: i64) -> Result<Week, Error> {
    if steps == 0 {
        return Ok(week.clone());
    }
    let days = clamp_days(steps.saturating_mul(7));
    let monday = week.start().checked_add_days(days)?;
    let (iso_year, iso_week) = monday.iso_week_date();
    Week::new(iso_year, iso_week)
}

pub(crate) fn shift_decade(
    decade: &Decade,
    steps: i64,
) -> Result<Decade, Error> {
    if steps == 0 {
        return Ok(decade.clone());
    }
    // Three decades per month, twelve months per year.
    let index = (i64::from(decade.year()) * 12
        + i64::from(decade.month() - 1))
        * 3
        + i64::from(decade.index() - 1);
    let index = index.saturating_add(steps);
    let (month_index, decade0) = (index.div_euclid(3), index.rem_euclid(3));
    let (year, month0) = (month_index.div_euclid(12), month_index.rem_euclid(12));
    Decade::new(in_year_range(year)?, month0 as i8 + 1, decade0 as i8 + 1)
}

pub(crate) fn shift_month(month: &Month, steps: i64) -> Result<Month, Error> {
    if steps == 0 {
        return Ok(month.clone());
    }
    let index = i64::from(month.year()) * 12 + i64::from(month.month() - 1);
    let index = index.saturating_add(steps);
    let (year, month0) = (index.div_euclid(12), index.rem_euclid(12));
    Month::new(in_year_range(year)?, month0 as i8 + 1)
}

pub(crate) fn shift_quarter(
    quarter: &Quarter,
    steps: i64,
) -> Result<Quarter, Error> {
    if steps == 0 {
        return Ok(quarter.clone());
    }
    let index =
        i64::from(quarter.year()) * 4 + i64::from(quarter.quarter() - 1);
    let index = index.saturating_add(steps);
    let (year, quarter0) = (index.div_euclid(4), index.rem_euclid(4));
    Quarter::new(in_year_range(year)?, quarter0 as i8 + 1)
}

pub(crate) fn shift_season(
    season: &Season,
    steps: i64,
) -> Result<Season, Error> {
    if steps == 0 {
        return Ok(season.clone());
    }
    // Two seasons per year, summer first.
    let index = i64::from(season.year()) * 2
        + match season.kind() {
            SeasonKind::Summer => 0,
            SeasonKind::Winter => 1,
        };
    let index = index.saturating_add(steps);
    let (year, half) = (index.div_euclid(2), index.rem_euclid(2));
    let kind =
        if half == 0 { SeasonKind::Summer } else { SeasonKind::Winter };
    Season::new(in_year_range(year)?, kind)
}

pub(crate) fn shift_year(year: &Year, steps: i64) -> Result<Year, Error> {
    if steps == 0 {
        return Ok(year.clone());
    }
    let got = i64::from(year.year()).saturating_add(steps);
    Year::new(in_year_range(got)?)
}

fn in_year_range(year: i64) -> Result<i16, Error> {
    if !(i64::from(MIN_YEAR)..=i64::from(MAX_YEAR)).contains(&year) {
        return Err(Error::range("year", year, MIN_YEAR, MAX_YEAR));
    }
    Ok(year as i16)
}

/// The supported range spans fewer than eight million days, so clamping
/// a day delta this way changes nothing but keeps the epoch arithmetic
/// from overflowing.
fn clamp_days(days: i64) -> i64 {
    days.clamp(-8_000_000, 8_000_000)
}

/// Rejects hour and quarter-hour shifts whose destination cannot be in
/// range before entering the occurrence walk.
///
/// The gap and the duplicated hour alternate and cancel, so the true
/// landing instant never drifts more than a day from the naive
/// projection.
fn check_projection(
    anchor: DateTime,
    minutes_per_step: i64,
    steps: i64,
) -> Result<(), Error> {
    let naive = anchor
        .to_epoch_minute()
        .saturating_add(steps.saturating_mul(minutes_per_step));
    let slack = naive.signum() * 24 * 60;
    DateTime::from_epoch_minute(naive.saturating_sub(slack))?;
    Ok(())
}
