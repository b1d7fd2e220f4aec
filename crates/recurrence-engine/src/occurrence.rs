//! Next-occurrence calculation -- finds the first due date of a recurring task
//! strictly after a reference day.
//!
//! Each rule kind runs a bounded forward search whose cap comes from
//! [`SearchLimits`]. Weekly and monthly scans begin at the later of the start date
//! and the reference day, since nothing on or before the reference qualifies.

use crate::calendar::{days_in_month, CalendarDate, MAX_YEAR};
use crate::error::{RecurrenceError, Result};
use crate::limits::SearchLimits;
use crate::rule::{parse_rule, RecurrenceRule};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Compute the first occurrence of `rule` strictly after `reference`.
///
/// # Arguments
/// - `start` -- the task's stored date; every rule kind is anchored to it
/// - `rule` -- a parsed repeat rule
/// - `reference` -- usually today; the result is always later than this day
/// - `limits` -- iteration caps for the forward search
///
/// # Errors
/// Returns `RecurrenceError::ComputationBoundExceeded` if a yearly or daily rule
/// needs more steps than allowed, or date arithmetic runs past 9999-12-31.
/// Returns `RecurrenceError::NotFound` if a weekly or monthly scan exhausts its cap.
pub fn next_occurrence(
    start: CalendarDate,
    rule: &RecurrenceRule,
    reference: CalendarDate,
    limits: &SearchLimits,
) -> Result<CalendarDate> {
    let next = match rule {
        RecurrenceRule::Yearly => next_yearly(start, reference, limits.yearly_max_advances),
        RecurrenceRule::Daily { interval } => {
            next_daily(start, *interval, reference, limits.daily_max_steps)
        }
        RecurrenceRule::Weekly { weekdays } => {
            next_weekly(start, weekdays, reference, limits.weekly_max_days)
        }
        RecurrenceRule::Monthly { days, months } => next_monthly(
            start,
            days,
            months.as_ref(),
            reference,
            limits.monthly_max_months,
        ),
    };

    match &next {
        Ok(date) => debug!(%start, %reference, %rule, next = %date, "computed next occurrence"),
        Err(e) => warn!(%start, %reference, %rule, error = %e, "next occurrence search failed"),
    }
    next
}

/// String-level contract: `YYYYMMDD` dates in, `YYYYMMDD` out, default limits.
///
/// # Errors
/// Returns `RecurrenceError::InvalidDateFormat` if either date is malformed, plus
/// any error from [`next_occurrence`].
pub fn next_date(start: &str, rule: &RecurrenceRule, reference: &str) -> Result<String> {
    let start = CalendarDate::parse(start)?;
    let reference = CalendarDate::parse(reference)?;
    next_occurrence(start, rule, reference, &SearchLimits::default()).map(|d| d.to_string())
}

/// Full pipeline from raw strings: validate the start date, parse the rule, then
/// compute the next date after `reference`.
///
/// # Errors
/// The start date is checked first, so a bad date wins over a bad rule.
pub fn next_date_from_text(start: &str, rule_text: &str, reference: &str) -> Result<String> {
    let start = CalendarDate::parse(start)?;
    let rule = parse_rule(rule_text)?;
    let reference = CalendarDate::parse(reference)?;
    next_occurrence(start, &rule, reference, &SearchLimits::default()).map(|d| d.to_string())
}

fn next_yearly(
    start: CalendarDate,
    reference: CalendarDate,
    max_advances: u32,
) -> Result<CalendarDate> {
    for years in 1..=max_advances {
        let candidate = start.add_years(years).ok_or_else(past_calendar_end)?;
        if candidate > reference {
            return Ok(candidate);
        }
    }
    Err(RecurrenceError::ComputationBoundExceeded(format!(
        "no yearly date after {} within {} years of {}",
        reference, max_advances, start
    )))
}

fn next_daily(
    start: CalendarDate,
    interval: u32,
    reference: CalendarDate,
    max_steps: u64,
) -> Result<CalendarDate> {
    if interval == 0 {
        return Err(RecurrenceError::ComputationBoundExceeded(
            "a zero-day interval never advances".to_string(),
        ));
    }
    let interval = u64::from(interval);

    // Smallest k >= 1 with start + k * interval > reference.
    let gap = start.days_until(&reference);
    let steps = if gap < 0 {
        1
    } else {
        gap.unsigned_abs() / interval + 1
    };

    if steps > max_steps {
        return Err(RecurrenceError::ComputationBoundExceeded(format!(
            "{} steps of {} days needed to pass {}, limit is {}",
            steps, interval, reference, max_steps
        )));
    }
    start
        .add_days(steps * interval)
        .ok_or_else(past_calendar_end)
}

fn next_weekly(
    start: CalendarDate,
    weekdays: &BTreeSet<u32>,
    reference: CalendarDate,
    max_days: u32,
) -> Result<CalendarDate> {
    let mut day = start.max(reference.succ().ok_or_else(past_calendar_end)?);

    for _ in 0..max_days {
        if weekdays.contains(&day.weekday()) {
            return Ok(day);
        }
        day = day.succ().ok_or_else(past_calendar_end)?;
    }
    Err(RecurrenceError::NotFound(format!(
        "no matching weekday after {} within {} days",
        reference, max_days
    )))
}

fn next_monthly(
    start: CalendarDate,
    days: &BTreeSet<i32>,
    months: Option<&BTreeSet<u32>>,
    reference: CalendarDate,
    max_months: u32,
) -> Result<CalendarDate> {
    let first = start.max(reference);
    let (mut year, mut month) = (first.year(), first.month());

    for _ in 0..max_months {
        if months.is_none_or(|m| m.contains(&month)) {
            let found = month_candidates(year, month, days)
                .into_iter()
                .find(|candidate| *candidate > reference);
            if let Some(date) = found {
                return Ok(date);
            }
        }
        (year, month) = following_month(year, month).ok_or_else(past_calendar_end)?;
    }
    Err(RecurrenceError::NotFound(format!(
        "no matching day after {} within {} months",
        reference, max_months
    )))
}

/// Concrete dates for the configured day values in one month, ascending and
/// de-duplicated.
fn month_candidates(year: i32, month: u32, days: &BTreeSet<i32>) -> Vec<CalendarDate> {
    let last = days_in_month(year, month);
    let resolved: BTreeSet<u32> = days.iter().map(|&d| resolve_day(d, last)).collect();
    resolved
        .into_iter()
        .filter_map(|d| CalendarDate::from_ymd(year, month, d))
        .collect()
}

/// Map a configured day value onto `1..=last`. Negative values count back from
/// the end (`-1` is `last`); anything outside the month is clamped.
fn resolve_day(day: i32, last: u32) -> u32 {
    let last = i64::from(last);
    let day = i64::from(day);
    let resolved = if day < 0 { last + day + 1 } else { day };
    resolved.clamp(1, last) as u32
}

fn following_month(year: i32, month: u32) -> Option<(i32, u32)> {
    match month {
        12 if year < MAX_YEAR => Some((year + 1, 1)),
        12 => None,
        _ => Some((year, month + 1)),
    }
}

fn past_calendar_end() -> RecurrenceError {
    RecurrenceError::ComputationBoundExceeded("date arithmetic went past 9999-12-31".to_string())
}
