use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Closed calendar-date interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Closed-interval overlap; touching endpoints count.
    pub fn overlaps(&self, other: &DateRange) -> bool {
        !(self.end < other.start || other.end < self.start)
    }
}

/// Persisted plan as returned by the trip service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRecord {
    pub id: String,
    #[serde(rename = "type", default)]
    pub plan_type: Option<String>,
    pub title: String,
    /// Raw start time as stored; may carry an offset or be malformed
    pub start_time: String,
    #[serde(default)]
    pub end_time: Option<String>,
}

/// Read-only view of a trip used for overlap checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripSummary {
    pub id: String,
    pub owner_id: String,
    #[serde(default)]
    pub member_ids: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub plans: Vec<PlanRecord>,
}

impl TripSummary {
    pub fn range(&self) -> DateRange {
        DateRange::new(self.start_date, self.end_date)
    }

    /// Owned by, or shared with, the given user
    pub fn involves(&self, user_id: &str) -> bool {
        self.owner_id == user_id || self.member_ids.iter().any(|m| m == user_id)
    }
}
