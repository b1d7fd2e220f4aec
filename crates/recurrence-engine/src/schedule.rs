//! Task-date decisions made at the storage boundary.
//!
//! These helpers hold the date rules that a task store applies when a task
//! is created, edited, completed or searched. They only orchestrate
//! [`crate::rule`] and [`crate::occurrence`], and they do no I/O. The caller persists
//! whatever they return.

use crate::calendar::CalendarDate;
use crate::error::Result;
use crate::limits::SearchLimits;
use crate::occurrence::next_occurrence;
use crate::rule::parse_rule;
use tracing::debug;

/// What to do with a task once it is marked done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Recurring task: store this as its new date.
    Reschedule(CalendarDate),
    /// One-off task: delete the record.
    Remove,
}

/// Date to store when a task is created or edited.
///
/// - Missing or empty `date` means `today`.
/// - Without a repeat rule, a date in the past is moved up to `today`.
/// - With a repeat rule, a date in the past is advanced to the next occurrence
///   after `today`. A date of today or later is kept, but the rule is still
///   parsed so a bad rule is rejected on save.
///
/// # Errors
/// Returns `RecurrenceError::InvalidDateFormat` for a malformed date, and any rule
/// or search error for a malformed repeat rule.
pub fn resolve_task_date(
    date: Option<&str>,
    repeat: Option<&str>,
    today: CalendarDate,
    limits: &SearchLimits,
) -> Result<CalendarDate> {
    let date = match non_blank(date) {
        Some(raw) => CalendarDate::parse(raw)?,
        None => today,
    };

    let Some(repeat) = non_blank(repeat) else {
        return Ok(date.max(today));
    };

    let rule = parse_rule(repeat)?;
    if date >= today {
        return Ok(date);
    }
    let next = next_occurrence(date, &rule, today, limits)?;
    debug!(%date, %today, %next, "advanced past-due recurring task");
    Ok(next)
}

/// Outcome of marking a task done on `today`.
///
/// # Errors
/// Returns `RecurrenceError::InvalidDateFormat` for a malformed stored date, and
/// any rule or search error for a malformed repeat rule.
pub fn complete_task(
    date: &str,
    repeat: Option<&str>,
    today: CalendarDate,
    limits: &SearchLimits,
) -> Result<Completion> {
    let date = CalendarDate::parse(date)?;
    match non_blank(repeat) {
        None => Ok(Completion::Remove),
        Some(repeat) => {
            let rule = parse_rule(repeat)?;
            next_occurrence(date, &rule, today, limits).map(Completion::Reschedule)
        }
    }
}

/// A task-list search box value, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchTerm {
    /// Nothing typed: list everything.
    All,
    /// A `DD.MM.YYYY` date: match tasks due that day.
    Date(CalendarDate),
    /// Free text: match title or comment.
    Text(String),
}

impl SearchTerm {
    pub fn classify(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::All;
        }
        match CalendarDate::parse_dotted(trimmed) {
            Ok(date) => Self::Date(date),
            Err(_) => Self::Text(trimmed.to_string()),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
