// Author: Dustin Pilgrim
// License: MIT

use crate::core::{action::Action, info::ElapsedUpdate};
use crate::{ddebug, dwarn};

use super::Daemon;

impl Daemon {
    /// Carries out `actions` in order. Returns false if a forced save did not
    /// complete in time or was refused by the store.
    pub(super) async fn exec_actions(&mut self, actions: Vec<Action>) -> bool {
        let mut ok = true;
        for action in actions {
            ok &= self.exec_action(action).await;
        }
        ok
    }

    async fn exec_action(&mut self, action: Action) -> bool {
        match action {
            Action::Persist {
                activities,
                forced: false,
            } => {
                self.persist.queue(activities);
            }

            Action::Persist {
                activities,
                forced: true,
            } => {
                let flushed =
                    tokio::time::timeout(self.suspend_timeout, self.persist.flush(activities)).await;

                match flushed {
                    Ok(true) => ddebug!("Daemon", "final save complete"),
                    Ok(false) => {
                        dwarn!("Daemon", "final save failed");
                        return false;
                    }
                    Err(_) => {
                        dwarn!(
                            "Daemon",
                            "final save abandoned after {}ms",
                            self.suspend_timeout.as_millis()
                        );
                        return false;
                    }
                }
            }

            Action::StartTicker { epoch } => {
                self.ticker.start(self.tx.clone(), self.tick_period, epoch);
            }

            Action::CancelTicker => {
                self.ticker.cancel();
            }

            Action::ElapsedChanged { elapsed_ms } => {
                let title = self.session.active().map(|a| a.title.clone());
                self.elapsed_tx.send_replace(ElapsedUpdate { title, elapsed_ms });
            }
        }

        true
    }
}
