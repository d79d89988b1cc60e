//! Token lifetime values in the `<integer><unit>` grammar (`15m`, `2h`).
//!
//! Parsing happens while configuration is deserialized, so a bad value is
//! reported once at startup instead of on every request.

use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Longest lifetime accepted from configuration: ten years.
pub const MAX_TTL_SECONDS: i64 = 10 * 365 * 24 * 3600;

/// Unit suffix accepted by [`TokenTtl`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtlUnit {
    /// `m`
    Minutes,
    /// `h`
    Hours,
}

impl TtlUnit {
    fn suffix(&self) -> char {
        match self {
            Self::Minutes => 'm',
            Self::Hours => 'h',
        }
    }

    fn seconds(&self) -> i64 {
        match self {
            Self::Minutes => 60,
            Self::Hours => 3600,
        }
    }
}

/// A validated token lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TokenTtl {
    amount: u32,
    unit: TtlUnit,
}

impl TokenTtl {
    /// Builds a lifetime of `amount` minutes.
    pub fn minutes(amount: u32) -> Self {
        Self {
            amount,
            unit: TtlUnit::Minutes,
        }
    }

    /// Builds a lifetime of `amount` hours.
    pub fn hours(amount: u32) -> Self {
        Self {
            amount,
            unit: TtlUnit::Hours,
        }
    }

    /// Total lifetime in seconds.
    pub fn as_secs(&self) -> i64 {
        i64::from(self.amount) * self.unit.seconds()
    }

    /// Lifetime as a chrono duration, suitable for `now + ttl`.
    pub fn as_duration(&self) -> Duration {
        Duration::seconds(self.as_secs())
    }
}

impl FromStr for TokenTtl {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unit = match s.chars().last() {
            Some('m') => TtlUnit::Minutes,
            Some('h') => TtlUnit::Hours,
            Some(other) => {
                return Err(AppError::configuration(format!(
                    "Unsupported duration unit '{other}' in '{s}' (expected 'm' or 'h')"
                )));
            }
            None => return Err(AppError::configuration("Duration must not be empty")),
        };

        let digits = &s[..s.len() - 1];
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(AppError::configuration(format!(
                "Invalid duration '{s}' (expected <integer><m|h>)"
            )));
        }

        let amount: u32 = digits.parse().map_err(|_| {
            AppError::configuration(format!("Duration amount out of range in '{s}'"))
        })?;

        if amount == 0 {
            return Err(AppError::configuration(format!(
                "Duration '{s}' must be greater than zero"
            )));
        }

        let ttl = Self { amount, unit };
        if ttl.as_secs() > MAX_TTL_SECONDS {
            return Err(AppError::configuration(format!(
                "Duration '{s}' exceeds the maximum of {}h",
                MAX_TTL_SECONDS / 3600
            )));
        }

        Ok(ttl)
    }
}

impl TryFrom<String> for TokenTtl {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TokenTtl> for String {
    fn from(ttl: TokenTtl) -> Self {
        ttl.to_string()
    }
}

impl fmt::Display for TokenTtl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.unit.suffix())
    }
}
