//! Tag ranking parameters.
//!
//! Callers hand in loosely typed values (they usually come straight from a
//! query string); validation turns them into a plan the query layer can run
//! without further checks. Validation happens before any query is built.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::days_before;
use crate::error::QueryError;

/// Longest accepted lookback window, in days (a little over a millennium).
pub const MAX_LOOKBACK_DAYS: i64 = 400_000;

/// How far back ranking looks for associated posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookback {
    /// No time restriction.
    AllTime,
    /// Posts created within the last `n` days.
    Days(u32),
}

impl Lookback {
    fn from_days(days_ago: i64) -> Result<Self, QueryError> {
        if days_ago < 0 {
            return Err(QueryError::invalid(
                "days_ago",
                "must be a non-negative integer",
            ));
        }
        if days_ago == 0 {
            return Ok(Self::AllTime);
        }
        if days_ago > MAX_LOOKBACK_DAYS {
            return Err(QueryError::invalid("days_ago", "is out of range"));
        }
        u32::try_from(days_ago)
            .map(Self::Days)
            .map_err(|_| QueryError::invalid("days_ago", "is out of range"))
    }

    /// Lower bound on post creation time, if the window is bounded.
    ///
    /// A window reaching past the earliest representable instant covers all time.
    pub fn since(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::AllTime => None,
            Self::Days(days) => days_before(now, i64::from(*days)),
        }
    }
}

fn validate_limit(limit: Option<i64>) -> Result<Option<u64>, QueryError> {
    match limit {
        None => Ok(None),
        Some(l) if l <= 0 => Err(QueryError::invalid(
            "limit",
            "must be a positive integer or absent",
        )),
        Some(l) => Ok(Some(l.unsigned_abs())),
    }
}

/// Parameters of the recent-usage tag ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecentTagsParams {
    pub days_ago: i64,
    pub limit: Option<i64>,
    /// Tag id removed from the result after filtering.
    pub exclude: Option<i32>,
}

impl Default for RecentTagsParams {
    fn default() -> Self {
        Self {
            days_ago: 30,
            limit: None,
            exclude: None,
        }
    }
}

/// Validated recent-usage ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecentTagsPlan {
    pub lookback: Lookback,
    pub limit: Option<u64>,
    pub exclude: Option<i32>,
}

impl RecentTagsParams {
    pub fn validate(&self) -> Result<RecentTagsPlan, QueryError> {
        Ok(RecentTagsPlan {
            lookback: Lookback::from_days(self.days_ago)?,
            limit: validate_limit(self.limit)?,
            exclude: self.exclude,
        })
    }
}

/// Parameters of the trend (usage frequency) tag ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendTagsParams {
    pub days_ago: i64,
    pub min_count: i64,
    pub limit: Option<i64>,
}

impl Default for TrendTagsParams {
    fn default() -> Self {
        Self {
            days_ago: 30,
            min_count: 5,
            limit: None,
        }
    }
}

/// Validated trend ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendTagsPlan {
    pub lookback: Lookback,
    pub min_count: i64,
    pub limit: Option<u64>,
}

impl TrendTagsParams {
    pub fn validate(&self) -> Result<TrendTagsPlan, QueryError> {
        let lookback = Lookback::from_days(self.days_ago)?;
        if self.min_count <= 0 {
            return Err(QueryError::invalid(
                "min_count",
                "must be a positive integer",
            ));
        }
        Ok(TrendTagsPlan {
            lookback,
            min_count: self.min_count,
            limit: validate_limit(self.limit)?,
        })
    }
}
