// Author: Dustin Pilgrim
// License: MIT

use std::sync::Mutex;

use crate::core::activity::Activity;
use crate::core::error::StoreError;

/// Durable home of the activity collection.
///
/// `save` replaces whatever was stored before; there is no merging.
pub trait ActivityStore: Send + Sync {
    /// `Ok(None)` means nothing has been stored yet.
    fn load(&self) -> Result<Option<Vec<Activity>>, StoreError>;

    fn save(&self, activities: &[Activity]) -> Result<(), StoreError>;
}

/// In-process store. Backs `--ephemeral` runs and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    stored: Option<Vec<Activity>>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn with_activities(activities: Vec<Activity>) -> Self {
        Self {
            inner: Mutex::new(MemoryInner {
                stored: Some(activities),
                saves: 0,
            }),
        }
    }

    #[cfg(test)]
    pub fn stored(&self) -> Option<Vec<Activity>> {
        self.lock().stored.clone()
    }

    /// Number of `save` calls seen so far.
    #[cfg(test)]
    pub fn save_count(&self) -> usize {
        self.lock().saves
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl ActivityStore for MemoryStore {
    fn load(&self) -> Result<Option<Vec<Activity>>, StoreError> {
        Ok(self.lock().stored.clone())
    }

    fn save(&self, activities: &[Activity]) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.stored = Some(activities.to_vec());
        inner.saves += 1;
        Ok(())
    }
}
