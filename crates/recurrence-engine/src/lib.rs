//! # recurrence-engine
//!
//! Deterministic next-due-date calculation for recurring tasks.
//!
//! A task stores a `YYYYMMDD` date and an optional repeat rule such as `"d 7"`,
//! `"w 1,3,5"`, `"m -1"` or `"y"`. When the task is created, edited or completed,
//! the engine computes the first occurrence strictly after a reference day. Every
//! search is bounded by [`SearchLimits`], so a malformed rule fails instead of
//! looping.
//!
//! ## Quick start
//!
//! ```rust
//! use recurrence_engine::{next_date, parse_rule};
//!
//! let rule = parse_rule("d 5").unwrap();
//! assert_eq!(next_date("20240301", &rule, "20240310").unwrap(), "20240311");
//! ```
//!
//! ## Modules
//!
//! - [`calendar`] -- `YYYYMMDD` dates, leap years, days-in-month, weekdays
//! - [`rule`] -- repeat-rule string → [`RecurrenceRule`]
//! - [`occurrence`] -- bounded search for the next occurrence
//! - [`limits`] -- named iteration caps for each search
//! - [`schedule`] -- create/edit/complete/search date decisions for a task store
//! - [`error`] -- Error types

pub mod calendar;
pub mod error;
pub mod limits;
pub mod occurrence;
pub mod rule;
pub mod schedule;

pub use calendar::CalendarDate;
pub use error::RecurrenceError;
pub use limits::SearchLimits;
pub use occurrence::{next_date, next_date_from_text, next_occurrence};
pub use rule::{parse_rule, RecurrenceRule};
pub use schedule::{complete_task, resolve_task_date, Completion, SearchTerm};
