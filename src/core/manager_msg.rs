// Author: Dustin Pilgrim
// License: MIT

use tokio::sync::oneshot;

use crate::core::{events::Event, info::SessionSnapshot};

/// A user command as it arrives from IPC: targets are ids or titles and are
/// resolved against the session by the daemon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Add { title: String },
    Start { target: String },
    /// `None` stops whatever is active.
    Stop { target: Option<String> },
    Rename { target: String, title: String },
    SetTime { target: String, time_ms: u64 },
    Remove { target: String },
}

pub type Reply = oneshot::Sender<Result<String, String>>;

#[derive(Debug)]
pub enum ManagerMsg {
    Event(Event),

    Command { cmd: SessionCommand, reply: Reply },

    GetInfo { reply: oneshot::Sender<SessionSnapshot> },

    /// Forced commit + save while staying up.
    Suspend { reply: Reply },

    StopDaemon { reply: Reply },
}
