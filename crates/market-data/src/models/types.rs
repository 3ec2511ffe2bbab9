use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bar size for price history.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryInterval {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl HistoryInterval {
    /// Interval code understood by the Yahoo chart API.
    pub fn yahoo_code(&self) -> &'static str {
        match self {
            Self::Daily => "1d",
            Self::Weekly => "1wk",
            Self::Monthly => "1mo",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl fmt::Display for HistoryInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when an interval string is neither a name nor a Yahoo code.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown interval: {0}")]
pub struct UnknownInterval(pub String);

impl FromStr for HistoryInterval {
    type Err = UnknownInterval;

    /// Accepts `daily`/`weekly`/`monthly` or the codes `1d`/`1wk`/`1mo`, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" | "1d" => Ok(Self::Daily),
            "weekly" | "1wk" => Ok(Self::Weekly),
            "monthly" | "1mo" => Ok(Self::Monthly),
            _ => Err(UnknownInterval(s.to_string())),
        }
    }
}
