use std::{fs, io::ErrorKind, path::PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::warn;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::models::SessionRecord;

use super::SessionStore;

/// Whole-list JSON file store.
///
/// The load path never fails: a missing file, an unreadable file, or an
/// unparseable payload all degrade to an empty history with a warning, and
/// legacy records with missing fields are repaired rather than rejected.
pub struct JsonSessionStore {
    path: PathBuf,
}

impl JsonSessionStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create store directory {}", parent.display())
            })?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl SessionStore for JsonSessionStore {
    fn load(&self) -> Result<Vec<SessionRecord>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                warn!(
                    "failed to read session history from {}: {err}; starting empty",
                    self.path.display()
                );
                return Ok(Vec::new());
            }
        };

        let entries: Vec<Value> = match serde_json::from_str(&contents) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(
                    "session history at {} is unparseable: {err}; starting empty",
                    self.path.display()
                );
                return Ok(Vec::new());
            }
        };

        let now = Utc::now();
        let records = entries
            .into_iter()
            .filter_map(|entry| decode_record(entry, now))
            .collect();
        Ok(records)
    }

    fn save(&self, records: &[SessionRecord]) -> Result<()> {
        let serialized = serde_json::to_string_pretty(records)?;
        fs::write(&self.path, serialized).with_context(|| {
            format!("failed to write session history to {}", self.path.display())
        })
    }
}

/// Raw mirror of a persisted record with every field optional. All legacy
/// payload tolerance lives here; nothing outside this decode step ever
/// sees raw JSON.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    target_duration_seconds: Option<u32>,
    #[serde(default)]
    actual_duration_seconds: Option<u32>,
    #[serde(default)]
    distractions: Option<u32>,
    #[serde(default)]
    completed_at: Option<String>,
}

fn decode_record(entry: Value, now: DateTime<Utc>) -> Option<SessionRecord> {
    let raw: RawRecord = match serde_json::from_value(entry) {
        Ok(raw) => raw,
        Err(err) => {
            warn!("dropping unreadable session record: {err}");
            return None;
        }
    };

    let completed_at = raw
        .completed_at
        .as_deref()
        .and_then(|value| DateTime::parse_from_rfc3339(value).ok())
        .map(|value| value.with_timezone(&Utc))
        .unwrap_or(now);

    Some(SessionRecord {
        id: raw
            .id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string()),
        category: raw.category.unwrap_or_default(),
        target_duration_seconds: raw.target_duration_seconds.unwrap_or(0),
        actual_duration_seconds: raw.actual_duration_seconds.unwrap_or(0),
        distractions: raw.distractions.unwrap_or(0),
        completed_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_fields_are_repaired() {
        let now = Utc::now();
        let record = decode_record(
            json!({
                "category": "Study",
                "actualDurationSeconds": 300
            }),
            now,
        )
        .unwrap();

        assert!(!record.id.is_empty());
        assert_eq!(record.category, "Study");
        assert_eq!(record.target_duration_seconds, 0);
        assert_eq!(record.actual_duration_seconds, 300);
        assert_eq!(record.distractions, 0);
        assert_eq!(record.completed_at, now);
    }

    #[test]
    fn invalid_timestamp_defaults_to_now() {
        let now = Utc::now();
        let record = decode_record(
            json!({
                "id": "abc",
                "category": "Work",
                "completedAt": "last tuesday"
            }),
            now,
        )
        .unwrap();
        assert_eq!(record.completed_at, now);
    }

    #[test]
    fn unshapeable_entry_is_dropped() {
        let now = Utc::now();
        assert!(decode_record(json!("just a string"), now).is_none());
        assert!(decode_record(json!({ "distractions": -4 }), now).is_none());
    }
}
