// Author: Dustin Pilgrim
// License: MIT

use std::path::PathBuf;

use eyre::{Result, eyre};

use crate::core::{
    activity::{default_activities, Activity, DEFAULT_TITLES},
    manager::{ManagerConfig, DEFAULT_ACCRUAL_THRESHOLD_MS},
};

pub const DEFAULT_TICK_INTERVAL_MS: u64 = 50;
pub const DEFAULT_SUSPEND_TIMEOUT_MS: u64 = 2000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayflowConfig {
    pub storage_enabled: bool,
    pub store_path: PathBuf,
    pub tick_interval_ms: u64,
    pub accrual_threshold_ms: u64,
    /// How long a final save may take before the daemon gives up on it.
    pub suspend_timeout_ms: u64,
    pub default_activities: Vec<String>,
}

impl Default for DayflowConfig {
    fn default() -> Self {
        Self {
            storage_enabled: true,
            store_path: default_store_path(),
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            accrual_threshold_ms: DEFAULT_ACCRUAL_THRESHOLD_MS,
            suspend_timeout_ms: DEFAULT_SUSPEND_TIMEOUT_MS,
            default_activities: DEFAULT_TITLES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl DayflowConfig {
    pub fn manager_config(&self) -> ManagerConfig {
        ManagerConfig {
            storage_enabled: self.storage_enabled,
            accrual_threshold_ms: self.accrual_threshold_ms,
        }
    }

    /// Seed used when the store has nothing yet.
    pub fn seed(&self) -> Vec<Activity> {
        default_activities(&self.default_activities)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 {
            return Err(eyre!("tick_interval_ms must be greater than 0"));
        }
        if self.suspend_timeout_ms == 0 {
            return Err(eyre!("suspend_timeout_ms must be greater than 0"));
        }
        if self.default_activities.iter().any(|t| t.trim().is_empty()) {
            return Err(eyre!("default_activities must not contain empty titles"));
        }
        Ok(())
    }
}

pub fn default_store_path() -> PathBuf {
    let mut path = dirs::data_dir().unwrap_or_else(std::env::temp_dir);
    path.push("dayflow");
    path.push("activities.json");
    path
}

/// `~/x` → `$HOME/x`; everything else untouched.
pub fn expand_home(raw: &str) -> PathBuf {
    let raw = raw.trim();
    if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(raw)
}
