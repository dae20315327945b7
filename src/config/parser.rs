// Author: Dustin Pilgrim
// License: MIT

use eyre::{Result, WrapErr, eyre};
use rune_cfg::RuneConfig;
use std::path::Path;

use crate::config::model::{expand_home, DayflowConfig};
use crate::ddebug;

/// Keys are accepted in snake_case and kebab-case.
fn alt_key(key: &str) -> String {
    key.replace('_', "-")
}

fn get_bool(config: &RuneConfig, key: &str) -> Option<bool> {
    config
        .get::<bool>(key)
        .or_else(|_| config.get::<bool>(&alt_key(key)))
        .ok()
}

fn get_u64(config: &RuneConfig, key: &str) -> Option<u64> {
    config
        .get::<u64>(key)
        .or_else(|_| config.get::<u64>(&alt_key(key)))
        .ok()
}

fn get_string(config: &RuneConfig, key: &str) -> Option<String> {
    config
        .get::<String>(key)
        .or_else(|_| config.get::<String>(&alt_key(key)))
        .ok()
}

/// Reads `dayflow.*` keys on top of the built-in defaults.
pub fn parse_dayflow_config(config: &RuneConfig) -> Result<DayflowConfig> {
    let defaults = DayflowConfig::default();

    let storage_enabled = get_bool(config, "dayflow.storage_enabled").unwrap_or(defaults.storage_enabled);

    let store_path = get_string(config, "dayflow.store_path")
        .filter(|s| !s.trim().is_empty())
        .map(|s| expand_home(&s))
        .unwrap_or(defaults.store_path);

    let tick_interval_ms = get_u64(config, "dayflow.tick_interval_ms").unwrap_or(defaults.tick_interval_ms);

    let accrual_threshold_ms =
        get_u64(config, "dayflow.accrual_threshold_ms").unwrap_or(defaults.accrual_threshold_ms);

    let suspend_timeout_ms =
        get_u64(config, "dayflow.suspend_timeout_ms").unwrap_or(defaults.suspend_timeout_ms);

    let default_activities: Vec<String> = config
        .get("dayflow.default_activities")
        .or_else(|_| config.get("dayflow.default-activities"))
        .unwrap_or_default();

    let default_activities = if default_activities.is_empty() {
        defaults.default_activities
    } else {
        default_activities
    };

    let cfg = DayflowConfig {
        storage_enabled,
        store_path,
        tick_interval_ms,
        accrual_threshold_ms,
        suspend_timeout_ms,
        default_activities,
    };

    cfg.validate()?;
    Ok(cfg)
}

pub fn parse_file(path: &Path) -> Result<DayflowConfig> {
    let config = RuneConfig::from_file(path)
        .map_err(|e| eyre!("failed to parse {}: {}", path.display(), e))?;

    let cfg = parse_dayflow_config(&config)
        .wrap_err_with(|| format!("invalid configuration in {}", path.display()))?;

    ddebug!("Config", "loaded config from {}", path.display());
    Ok(cfg)
}
