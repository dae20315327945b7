// Author: Dustin Pilgrim
// License: MIT

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::core::activity::Activity;
use crate::core::error::StoreError;
use crate::core::store::ActivityStore;

/// Stores the whole collection as one JSON array.
///
/// Writes go to a sibling temp file which is then renamed over the target,
/// so a crash mid-write leaves the previous contents intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "activities.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl ActivityStore for JsonFileStore {
    fn load(&self) -> Result<Option<Vec<Activity>>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if raw.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn save(&self, activities: &[Activity]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let body = serde_json::to_vec_pretty(activities)?;
        let tmp = self.tmp_path();

        {
            let mut f = fs::File::create(&tmp)?;
            f.write_all(&body)?;
            f.write_all(b"\n")?;
            f.sync_all()?;
        }

        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
