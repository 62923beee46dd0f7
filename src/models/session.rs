use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Persisted summary of one finalized focus session.
///
/// Immutable once created; `id` is the deletion key. Serialized camelCase so
/// the on-disk payload matches the historical mobile app format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub id: String,
    pub category: String,
    pub target_duration_seconds: u32,
    pub actual_duration_seconds: u32,
    pub distractions: u32,
    pub completed_at: DateTime<Utc>,
}

/// What a finalized countdown hands to the session log, before the log
/// assigns identity and a completion timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub category: String,
    pub target_duration_seconds: u32,
    pub actual_duration_seconds: u32,
    pub distractions: u32,
}

impl SessionRecord {
    pub fn from_summary(summary: SessionSummary, completed_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            category: summary.category,
            target_duration_seconds: summary.target_duration_seconds,
            actual_duration_seconds: summary.actual_duration_seconds,
            distractions: summary.distractions,
            completed_at,
        }
    }
}
