//! Relative link lifetime supplied at creation time.

use chrono::{DateTime, Duration, Months, Utc};

/// Unit of an [`Expiry`]. Unknown unit names fall back to days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryUnit {
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
}

impl ExpiryUnit {
    pub fn parse(unit: &str) -> Self {
        match unit.trim().to_ascii_lowercase().as_str() {
            "minutes" => Self::Minutes,
            "hours" => Self::Hours,
            "weeks" => Self::Weeks,
            "months" => Self::Months,
            _ => Self::Days,
        }
    }
}

/// A lifetime such as "3 days", counted from the moment of creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expiry {
    pub value: i64,
    pub unit: ExpiryUnit,
}

impl Expiry {
    pub fn new(value: i64, unit: ExpiryUnit) -> Self {
        Self { value, unit }
    }

    /// Absolute expiry instant for a link created at `now`.
    ///
    /// Non-positive values and overflowing lifetimes mean "never expires".
    pub fn deadline_from(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if self.value <= 0 {
            return None;
        }

        let delta = match self.unit {
            ExpiryUnit::Months => {
                let months = u32::try_from(self.value).ok()?;
                return now.checked_add_months(Months::new(months));
            }
            ExpiryUnit::Minutes => Duration::try_minutes(self.value)?,
            ExpiryUnit::Hours => Duration::try_hours(self.value)?,
            ExpiryUnit::Days => Duration::try_days(self.value)?,
            ExpiryUnit::Weeks => Duration::try_weeks(self.value)?,
        };

        now.checked_add_signed(delta)
    }
}
