use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Retrospective period used to filter which records are fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeWindow {
    #[default]
    #[serde(rename = "monthly")]
    Monthly,
    #[serde(rename = "3months")]
    ThreeMonths,
    #[serde(rename = "6months", alias = "6month")]
    SixMonths,
    #[serde(rename = "yearly")]
    Yearly,
    #[serde(rename = "lifetime")]
    Lifetime,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown time window: {0}")]
pub struct UnknownWindow(pub String);

impl TimeWindow {
    pub const ALL: [TimeWindow; 5] = [
        TimeWindow::Monthly,
        TimeWindow::ThreeMonths,
        TimeWindow::SixMonths,
        TimeWindow::Yearly,
        TimeWindow::Lifetime,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::ThreeMonths => "3months",
            Self::SixMonths => "6months",
            Self::Yearly => "yearly",
            Self::Lifetime => "lifetime",
        }
    }

    /// Number of calendar months covered, `None` for an unbounded window.
    pub fn months(&self) -> Option<u32> {
        match self {
            Self::Monthly => Some(1),
            Self::ThreeMonths => Some(3),
            Self::SixMonths => Some(6),
            Self::Yearly => Some(12),
            Self::Lifetime => None,
        }
    }

    /// Earliest instant a record may carry to fall inside this window.
    ///
    /// Month arithmetic clamps to the last valid day (Mar 31 minus one
    /// month is Feb 28/29).
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.months()
            .and_then(|months| now.checked_sub_months(Months::new(months)))
    }

    pub fn contains(&self, occurred_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self.cutoff(now) {
            Some(cutoff) => occurred_at >= cutoff,
            None => true,
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeWindow {
    type Err = UnknownWindow;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "monthly" => Ok(Self::Monthly),
            "3months" => Ok(Self::ThreeMonths),
            // Legacy selector value.
            "6months" | "6month" => Ok(Self::SixMonths),
            "yearly" => Ok(Self::Yearly),
            "lifetime" => Ok(Self::Lifetime),
            other => Err(UnknownWindow(other.to_string())),
        }
    }
}
