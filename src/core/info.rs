// Author: Dustin Pilgrim
// License: MIT

use serde::Serialize;

use crate::core::{activity::Activity, session::Session, utils::format_elapsed};

/// Read-only view of the session handed to everything outside the manager.
///
/// - the JSON form is what `dayflow info --json` prints.
/// - `pretty_text` is the CLI-facing rendering.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub activities: Vec<Activity>,
    pub active_id: Option<String>,
    pub active_title: Option<String>,
    pub elapsed_ms: u64,
    pub storage_enabled: bool,

    #[serde(skip_serializing)]
    pub pretty_text: String,
}

impl SessionSnapshot {
    pub fn from_session(session: &Session, storage_enabled: bool) -> Self {
        let active = session.active();
        let elapsed_ms = session.displayed_ms();

        let mut text = String::new();
        match active {
            Some(a) => text.push_str(&format!("Tracking: {} ({})\n", a.title, format_elapsed(elapsed_ms))),
            None => text.push_str("Tracking: nothing\n"),
        }
        if !storage_enabled {
            text.push_str("Storage: disabled\n");
        }
        text.push('\n');
        text.push_str(&render_list(session.activities(), session.active_id(), elapsed_ms));

        Self {
            activities: session.activities().to_vec(),
            active_id: session.active_id().map(str::to_string),
            active_title: active.map(|a| a.title.clone()),
            elapsed_ms,
            storage_enabled,
            pretty_text: text,
        }
    }
}

/// Latest displayed time, published to watchers after each display update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElapsedUpdate {
    pub title: Option<String>,
    pub elapsed_ms: u64,
}

impl ElapsedUpdate {
    pub fn render(&self) -> String {
        match &self.title {
            Some(t) => format!("{t} {}", format_elapsed(self.elapsed_ms)),
            None => "idle".to_string(),
        }
    }
}

/// One line per activity, display order. The active line shows the live time.
pub fn render_list(activities: &[Activity], active_id: Option<&str>, elapsed_ms: u64) -> String {
    if activities.is_empty() {
        return "No activities\n".to_string();
    }

    let width = activities.iter().map(|a| a.title.chars().count()).max().unwrap_or(0);

    let mut out = String::new();
    for a in activities {
        let is_active = active_id == Some(a.id.as_str());
        let shown = if is_active { elapsed_ms.max(a.time) } else { a.time };
        let marker = if is_active { '*' } else { ' ' };
        out.push_str(&format!(
            "{marker} {:<width$}  {}  [{}]\n",
            a.title,
            format_elapsed(shown),
            a.id,
            width = width
        ));
    }
    out
}
