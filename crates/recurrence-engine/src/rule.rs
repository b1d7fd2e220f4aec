//! Repeat-rule parsing -- converts rule strings like `"d 7"` or `"m -1 2,8"` into
//! a typed [`RecurrenceRule`].
//!
//! Grammar (whitespace-separated tokens, comma-separated lists):
//!
//! | Text               | Rule                                             |
//! |--------------------|--------------------------------------------------|
//! | `y`                | every year on the start date's month/day         |
//! | `d N`              | every N days, 1 ≤ N ≤ 400                        |
//! | `w 1,3,5`          | on ISO weekdays (Monday = 1 … Sunday = 7)         |
//! | `m 1,15,-1 [1,6]`  | on days of the month, optionally only some months |
//!
//! Negative monthly days count back from the end of the month: `-1` is the last
//! day, `-2` the one before it.

use crate::error::{RecurrenceError, Result};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Largest interval accepted by a daily rule.
pub const MAX_DAILY_INTERVAL: u32 = 400;

/// Largest absolute day value accepted by a monthly rule.
pub const MAX_MONTH_DAY: i32 = 31;

/// A parsed repeat rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RecurrenceRule {
    Yearly,
    Daily {
        interval: u32,
    },
    Weekly {
        /// ISO weekday numbers, never empty.
        weekdays: BTreeSet<u32>,
    },
    Monthly {
        /// Ascending, never empty, zero excluded.
        days: BTreeSet<i32>,
        /// `None` means every month.
        months: Option<BTreeSet<u32>>,
    },
}

impl RecurrenceRule {
    /// Short name of the rule kind, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Yearly => "yearly",
            Self::Daily { .. } => "daily",
            Self::Weekly { .. } => "weekly",
            Self::Monthly { .. } => "monthly",
        }
    }
}

/// Parse a repeat-rule string.
///
/// # Errors
/// Returns `RecurrenceError::UnsupportedRule` if the string is empty or starts with
/// an unknown kind. Returns `RecurrenceError::InvalidRuleArguments` if the kind is
/// known but its arguments are missing, surplus, or out of range.
pub fn parse_rule(text: &str) -> Result<RecurrenceRule> {
    let mut tokens = text.split_whitespace();
    let Some(kind) = tokens.next() else {
        return Err(RecurrenceError::UnsupportedRule(
            "empty repeat rule".to_string(),
        ));
    };
    let args: Vec<&str> = tokens.collect();

    match kind {
        "y" => parse_yearly(&args),
        "d" => parse_daily(&args),
        "w" => parse_weekly(&args),
        "m" => parse_monthly(&args),
        other => Err(RecurrenceError::UnsupportedRule(format!(
            "unknown rule kind '{}' (expected y, d, w or m)",
            other
        ))),
    }
}

fn parse_yearly(args: &[&str]) -> Result<RecurrenceRule> {
    if !args.is_empty() {
        return Err(invalid(format!(
            "yearly rule takes no arguments, got '{}'",
            args.join(" ")
        )));
    }
    Ok(RecurrenceRule::Yearly)
}

fn parse_daily(args: &[&str]) -> Result<RecurrenceRule> {
    let [raw] = args else {
        return Err(invalid("daily rule expects exactly one interval, e.g. 'd 7'"));
    };
    let interval = raw
        .parse::<u32>()
        .ok()
        .filter(|n| (1..=MAX_DAILY_INTERVAL).contains(n))
        .ok_or_else(|| {
            invalid(format!(
                "daily interval '{}' must be an integer from 1 to {}",
                raw, MAX_DAILY_INTERVAL
            ))
        })?;
    Ok(RecurrenceRule::Daily { interval })
}

fn parse_weekly(args: &[&str]) -> Result<RecurrenceRule> {
    let [list] = args else {
        return Err(invalid("weekly rule expects one weekday list, e.g. 'w 1,3,5'"));
    };
    let weekdays: BTreeSet<u32> = parse_list(list, "weekday", |n| (1..=7).contains(&n))?
        .into_iter()
        .map(|n| n.unsigned_abs())
        .collect();
    Ok(RecurrenceRule::Weekly { weekdays })
}

fn parse_monthly(args: &[&str]) -> Result<RecurrenceRule> {
    let (day_list, month_list) = match args {
        [days] => (*days, None),
        [days, months] => (*days, Some(*months)),
        _ => {
            return Err(invalid(
                "monthly rule expects a day list and an optional month list, e.g. 'm 1,-1 6'",
            ))
        }
    };

    let days: BTreeSet<i32> = parse_list(day_list, "day", |n| {
        n != 0 && (-MAX_MONTH_DAY..=MAX_MONTH_DAY).contains(&n)
    })?
    .into_iter()
    .collect();

    let months: Option<BTreeSet<u32>> = month_list
        .map(|list| {
            parse_list(list, "month", |n| (1..=12).contains(&n))
                .map(|values| values.into_iter().map(|n| n.unsigned_abs()).collect())
        })
        .transpose()?;

    Ok(RecurrenceRule::Monthly { days, months })
}

/// Split a comma-separated integer list, rejecting empty items and values that
/// fail `valid`.
fn parse_list(list: &str, what: &str, valid: impl Fn(i32) -> bool) -> Result<Vec<i32>> {
    list.split(',')
        .map(|item| {
            item.parse::<i32>()
                .ok()
                .filter(|n| valid(*n))
                .ok_or_else(|| invalid(format!("invalid {} value '{}'", what, item)))
        })
        .collect()
}

fn invalid(reason: impl Into<String>) -> RecurrenceError {
    RecurrenceError::InvalidRuleArguments(reason.into())
}

fn join<T: fmt::Display>(values: impl IntoIterator<Item = T>) -> String {
    values
        .into_iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Renders the canonical rule text, which parses back to an equal rule.
impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yearly => f.write_str("y"),
            Self::Daily { interval } => write!(f, "d {}", interval),
            Self::Weekly { weekdays } => write!(f, "w {}", join(weekdays)),
            Self::Monthly { days, months } => {
                write!(f, "m {}", join(days))?;
                if let Some(months) = months {
                    write!(f, " {}", join(months))?;
                }
                Ok(())
            }
        }
    }
}

impl FromStr for RecurrenceRule {
    type Err = RecurrenceError;

    fn from_str(s: &str) -> Result<Self> {
        parse_rule(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_rejects_empty_items() {
        assert!(parse_list("1,,3", "weekday", |_| true).is_err());
        assert!(parse_list("", "weekday", |_| true).is_err());
    }

    #[test]
    fn list_keeps_input_order() {
        assert_eq!(parse_list("5,-1,2", "day", |_| true).unwrap(), vec![5, -1, 2]);
    }
}
