// Author: Dustin Pilgrim
// License: MIT

use crate::core::activity::Activity;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Write the whole collection to the store.
    ///
    /// `forced` saves come from suspend handling: they ignore the storage
    /// setting and the daemon waits for them before going away.
    Persist {
        activities: Vec<Activity>,
        forced: bool,
    },

    /// Start sampling for the ticker generation `epoch`, replacing any running ticker.
    StartTicker {
        epoch: u64,
    },

    /// Stop sampling. No tick from an older epoch is honored afterwards.
    CancelTicker,

    /// Displayed elapsed time changed.
    ElapsedChanged {
        elapsed_ms: u64,
    },
}

impl Action {
    #[cfg(test)]
    pub fn is_persist(&self) -> bool {
        matches!(self, Action::Persist { .. })
    }
}
