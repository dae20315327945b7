// Author: Dustin Pilgrim
// License: MIT

use crate::core::activity::{Activity, ActivityPatch};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Periodic sample from the ticker that was started with `epoch`.
    Tick {
        now_ms: u64,
        epoch: u64,
    },

    SetActive {
        id: String,
        active: bool,
        now_ms: u64,
    },

    Create {
        activity: Activity,
        now_ms: u64,
    },

    Update {
        id: String,
        patch: ActivityPatch,
        now_ms: u64,
    },

    Delete {
        id: String,
        now_ms: u64,
    },

    /// The process may be suspended or terminated soon.
    Suspend {
        now_ms: u64,
    },
}

impl Event {
    pub fn is_tick(&self) -> bool {
        matches!(self, Event::Tick { .. })
    }
}
