// Author: Dustin Pilgrim
// License: MIT

use serde::{Deserialize, Serialize};

/// Built-in seed titles used when nothing has been stored yet.
pub const DEFAULT_TITLES: &[&str] = &["Work", "Study", "Exercise", "Reading", "Rest"];

/// A named task that accumulates tracked time.
///
/// The serialized field names are part of the storage format and must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub title: String,

    /// Accumulated elapsed time in milliseconds.
    pub time: u64,

    #[serde(rename = "isActive")]
    pub is_active: bool,
}

impl Activity {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            time: 0,
            is_active: false,
        }
    }

    /// New inactive activity with a freshly generated id.
    pub fn with_title(title: impl Into<String>) -> Self {
        Self::new(uuid::Uuid::new_v4().to_string(), title)
    }
}

/// Editable fields for `update`. `id` and activation are not editable here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityPatch {
    pub title: Option<String>,
    pub time: Option<u64>,
}

impl ActivityPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            time: None,
        }
    }

    pub fn time(time: u64) -> Self {
        Self {
            title: None,
            time: Some(time),
        }
    }

    pub(crate) fn apply(&self, activity: &mut Activity) {
        if let Some(title) = &self.title {
            activity.title = title.clone();
        }
        if let Some(time) = self.time {
            activity.time = time;
        }
    }
}

/// The fixed seed collection: ids "1".."n", zero time, nothing active.
pub fn default_activities<S: AsRef<str>>(titles: &[S]) -> Vec<Activity> {
    titles
        .iter()
        .enumerate()
        .map(|(i, t)| Activity::new((i + 1).to_string(), t.as_ref()))
        .collect()
}
