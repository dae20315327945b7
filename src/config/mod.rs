// Author: Dustin Pilgrim
// License: MIT

use std::path::{Path, PathBuf};

use eyre::Result;

pub mod model;
pub mod parser;

pub use model::DayflowConfig;

use crate::ddebug;

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub cfg: DayflowConfig,
    /// File the config came from; `None` means built-in defaults.
    pub path: Option<PathBuf>,
}

/// `~/.config/dayflow/dayflow.rune`
pub fn resolve_default_config_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("/etc"));
    path.push("dayflow");
    path.push("dayflow.rune");
    path
}

/// An explicit path must exist and parse. The default path is optional:
/// when it is missing the built-in defaults are used.
pub fn load(explicit: Option<&Path>) -> Result<LoadedConfig> {
    if let Some(path) = explicit {
        return Ok(LoadedConfig {
            cfg: parser::parse_file(path)?,
            path: Some(path.to_path_buf()),
        });
    }

    let path = resolve_default_config_path();
    if path.exists() {
        return Ok(LoadedConfig {
            cfg: parser::parse_file(&path)?,
            path: Some(path),
        });
    }

    ddebug!("Config", "no config at {}; using defaults", path.display());
    Ok(LoadedConfig {
        cfg: DayflowConfig::default(),
        path: None,
    })
}
