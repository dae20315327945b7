// Author: Dustin Pilgrim
// License: MIT

use crate::core::manager_msg::{ManagerMsg, Reply};
use crate::{ddebug, dinfo, dwarn};

use tokio::sync::watch;

use super::{AnyError, Daemon};

impl Daemon {
    /// Runs until shutdown is requested or a stop arrives over IPC, then
    /// performs the final suspend (commit + forced save) before returning.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) -> Result<(), AnyError> {
        let mut rx = self
            .rx
            .take()
            .ok_or("daemon loop already ran")?;

        dinfo!("Daemon", "starting with {} activities", self.session.activities().len());

        let now_ms = crate::core::utils::now_ms();
        let resumed = self.manager.start(&mut self.session, now_ms);
        if !resumed.is_empty() {
            if let Some(a) = self.session.active() {
                dinfo!("Daemon", "resuming '{}'", a.title);
            }
            self.exec_actions(resumed).await;
        }

        // Answered once the final save is done.
        let mut stop_reply: Option<Reply> = None;

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        dinfo!("Daemon", "stopping (shutdown requested)");
                        break;
                    }
                }

                maybe = rx.recv() => {
                    let Some(msg) = maybe else {
                        dinfo!("Daemon", "stopping (message channel closed)");
                        break;
                    };

                    match msg {
                        ManagerMsg::Event(event) => {
                            if let Ok(actions) = self.handle_one_event(event) {
                                self.exec_actions(actions).await;
                            }
                        }

                        ManagerMsg::Command { cmd, reply } => {
                            ddebug!("Daemon", "command: {:?}", cmd);
                            let out = self.handle_command(cmd).await;
                            let _ = reply.send(out);
                        }

                        ManagerMsg::GetInfo { reply } => {
                            let _ = reply.send(self.manager.snapshot(&self.session));
                        }

                        ManagerMsg::Suspend { reply } => {
                            let out = if self.suspend().await {
                                Ok("Saved".to_string())
                            } else {
                                Err("final save did not complete".to_string())
                            };
                            let _ = reply.send(out);
                        }

                        ManagerMsg::StopDaemon { reply } => {
                            dinfo!("Daemon", "stopping (stop requested via IPC)");
                            stop_reply = Some(reply);
                            break;
                        }
                    }
                }
            }
        }

        let saved = self.suspend().await;
        if !saved {
            dwarn!("Daemon", "exiting without a confirmed final save");
        }
        self.ticker.cancel();

        if let Some(reply) = stop_reply {
            let out = if saved {
                Ok("Stopped dayflow daemon".to_string())
            } else {
                Err("daemon stopped, but the final save did not complete".to_string())
            };
            let _ = reply.send(out);
        }

        dinfo!("Daemon", "stopped");
        Ok(())
    }
}
