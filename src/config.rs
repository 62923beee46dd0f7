use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock, time::Duration};

/// Tuning knobs for the countdown and the duration stepper.
///
/// Production code uses `TimerConfig::default()`; tests shorten the
/// intervals to keep the async paths fast.
#[derive(Debug, Clone)]
pub struct TimerConfig {
    pub min_minutes: u32,
    pub max_minutes: u32,
    pub default_minutes: u32,
    /// Quick-select chips, in minutes.
    pub quick_presets: Vec<u32>,
    /// Step applied on each hold-repeat after the initial single step.
    pub hold_step_minutes: u32,
    pub hold_interval: Duration,
    pub tick_interval: Duration,
    /// Fixed category list; the first entry is the default selection.
    pub categories: Vec<String>,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            min_minutes: 1,
            max_minutes: 60,
            default_minutes: 25,
            quick_presets: vec![1, 10, 25],
            hold_step_minutes: 5,
            hold_interval: Duration::from_millis(220),
            tick_interval: Duration::from_secs(1),
            categories: ["Study", "Work", "Reading", "Chores", "Other"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl TimerConfig {
    pub fn clamp_minutes(&self, minutes: i64) -> u32 {
        minutes.clamp(self.min_minutes as i64, self.max_minutes as i64) as u32
    }

    pub fn default_category(&self) -> String {
        self.categories.first().cloned().unwrap_or_default()
    }

    pub fn is_category(&self, name: &str) -> bool {
        self.categories.iter().any(|c| c == name)
    }
}

/// User preferences persisted between launches.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPrefs {
    pub default_category: Option<String>,
    pub default_minutes: Option<u32>,
}

impl Default for UserPrefs {
    fn default() -> Self {
        Self {
            default_category: None,
            default_minutes: None,
        }
    }
}

pub struct ConfigStore {
    path: PathBuf,
    data: RwLock<UserPrefs>,
}

impl ConfigStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("failed to read preferences from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            UserPrefs::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn prefs(&self) -> UserPrefs {
        self.data.read().unwrap().clone()
    }

    pub fn update(&self, prefs: UserPrefs) -> Result<()> {
        {
            let mut guard = self.data.write().unwrap();
            *guard = prefs;
            self.persist(&guard)?;
        }
        Ok(())
    }

    fn persist(&self, data: &UserPrefs) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("failed to write preferences to {}", self.path.display()))
    }
}
