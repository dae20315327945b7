// Author: Dustin Pilgrim
// License: MIT

use crate::core::{
    activity::{Activity, ActivityPatch},
    events::Event,
    manager_msg::SessionCommand,
    utils::{format_elapsed, now_ms},
};

use super::Daemon;

impl Daemon {
    /// Resolves ids/titles, turns the command into an event and runs it.
    pub(super) async fn handle_command(&mut self, cmd: SessionCommand) -> Result<String, String> {
        let now_ms = now_ms();

        let (event, message) = match cmd {
            SessionCommand::Add { title } => {
                let title = title.trim().to_string();
                if title.is_empty() {
                    return Err("title must not be empty".to_string());
                }
                let activity = Activity::with_title(title.clone());
                let msg = format!("Added '{}' [{}]", title, activity.id);
                (Event::Create { activity, now_ms }, msg)
            }

            SessionCommand::Start { target } => {
                let id = self.resolve(&target)?;
                let title = self.title_of(&id);
                if self.session.active_id() == Some(id.as_str()) {
                    return Ok(format!("'{title}' is already running"));
                }
                let ev = Event::SetActive {
                    id,
                    active: true,
                    now_ms,
                };
                (ev, format!("Started '{title}'"))
            }

            SessionCommand::Stop { target } => {
                let id = match target {
                    Some(t) => self.resolve(&t)?,
                    None => match self.session.active_id() {
                        Some(id) => id.to_string(),
                        None => return Ok("Nothing is running".to_string()),
                    },
                };
                let title = self.title_of(&id);
                if self.session.active_id() != Some(id.as_str()) {
                    return Ok(format!("'{title}' is not running"));
                }
                let ev = Event::SetActive {
                    id: id.clone(),
                    active: false,
                    now_ms,
                };
                (ev, String::new())
            }

            SessionCommand::Rename { target, title } => {
                let title = title.trim().to_string();
                if title.is_empty() {
                    return Err("title must not be empty".to_string());
                }
                let id = self.resolve(&target)?;
                let msg = format!("Renamed '{}' to '{}'", self.title_of(&id), title);
                let ev = Event::Update {
                    id,
                    patch: ActivityPatch::title(title),
                    now_ms,
                };
                (ev, msg)
            }

            SessionCommand::SetTime { target, time_ms } => {
                let id = self.resolve(&target)?;
                let msg = format!("Set '{}' to {}", self.title_of(&id), format_elapsed(time_ms));
                let ev = Event::Update {
                    id,
                    patch: ActivityPatch::time(time_ms),
                    now_ms,
                };
                (ev, msg)
            }

            SessionCommand::Remove { target } => {
                let id = self.resolve(&target)?;
                let msg = format!("Removed '{}'", self.title_of(&id));
                (Event::Delete { id, now_ms }, msg)
            }
        };

        let stopped_id = match &event {
            Event::SetActive { id, active: false, .. } => Some(id.clone()),
            _ => None,
        };

        let actions = self.handle_one_event(event)?;
        self.exec_actions(actions).await;

        // Report the committed total for stops.
        if let Some(id) = stopped_id {
            let total = self.session.get(&id).map(|a| a.time).unwrap_or(0);
            return Ok(format!("Stopped '{}' at {}", self.title_of(&id), format_elapsed(total)));
        }

        Ok(message)
    }

    fn resolve(&self, target: &str) -> Result<String, String> {
        self.session
            .resolve(target)
            .ok_or_else(|| format!("no activity matches '{}'", target.trim()))
    }

    fn title_of(&self, id: &str) -> String {
        self.session
            .get(id)
            .map(|a| a.title.clone())
            .unwrap_or_else(|| id.to_string())
    }
}
