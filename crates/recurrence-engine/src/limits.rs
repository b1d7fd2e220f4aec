//! Iteration caps for the bounded forward searches in [`crate::occurrence`].
//!
//! Every search loop takes its cap from a [`SearchLimits`] value instead of an
//! inline constant. A cap that is hit is reported as an error, never retried.

use crate::error::{RecurrenceError, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_YEARLY_MAX_ADVANCES: u32 = 1000;
pub const DEFAULT_DAILY_MAX_STEPS: u64 = 100_000;
pub const DEFAULT_WEEKLY_MAX_DAYS: u32 = 400;
pub const DEFAULT_MONTHLY_MAX_MONTHS: u32 = 36;

/// Per-rule-kind iteration caps.
///
/// Deserializes from partial JSON; missing fields keep their defaults:
///
/// ```rust
/// use recurrence_engine::SearchLimits;
///
/// let limits = SearchLimits::from_json(r#"{"weekly_max_days": 14}"#).unwrap();
/// assert_eq!(limits.weekly_max_days, 14);
/// assert_eq!(limits.monthly_max_months, 36);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchLimits {
    /// Yearly: maximum one-year advances from the start date.
    pub yearly_max_advances: u32,
    /// Daily: maximum interval steps from the start date.
    pub daily_max_steps: u64,
    /// Weekly: maximum days scanned.
    pub weekly_max_days: u32,
    /// Monthly: maximum months scanned.
    pub monthly_max_months: u32,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            yearly_max_advances: DEFAULT_YEARLY_MAX_ADVANCES,
            daily_max_steps: DEFAULT_DAILY_MAX_STEPS,
            weekly_max_days: DEFAULT_WEEKLY_MAX_DAYS,
            monthly_max_months: DEFAULT_MONTHLY_MAX_MONTHS,
        }
    }
}

impl SearchLimits {
    /// Load limits from a JSON object.
    ///
    /// # Errors
    /// Returns `RecurrenceError::InvalidConfig` on malformed JSON, unknown keys,
    /// or a zero cap (which would make every search fail).
    pub fn from_json(json: &str) -> Result<Self> {
        let limits: Self = serde_json::from_str(json)
            .map_err(|e| RecurrenceError::InvalidConfig(e.to_string()))?;
        limits.validate()?;
        Ok(limits)
    }

    fn validate(&self) -> Result<()> {
        let caps = [
            ("yearly_max_advances", u64::from(self.yearly_max_advances)),
            ("daily_max_steps", self.daily_max_steps),
            ("weekly_max_days", u64::from(self.weekly_max_days)),
            ("monthly_max_months", u64::from(self.monthly_max_months)),
        ];
        match caps.iter().find(|(_, cap)| *cap == 0) {
            Some((name, _)) => Err(RecurrenceError::InvalidConfig(format!(
                "{} must be at least 1",
                name
            ))),
            None => Ok(()),
        }
    }
}
