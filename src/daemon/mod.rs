// Author: Dustin Pilgrim
// License: MIT

mod actions;
mod commands;
mod run;


use crate::config::DayflowConfig;
use crate::core::{
    action::Action,
    events::Event,
    info::ElapsedUpdate,
    manager::Manager,
    manager_msg::ManagerMsg,
    session::Session,
    store::ActivityStore,
};
use crate::services::persist::{spawn_writer, PersistHandle};
use crate::services::ticker::Ticker;
use crate::{ddebug, derror, dinfo};

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};

pub type AnyError = Box<dyn std::error::Error + Send + Sync>;

/// Drives the session: feeds events into the manager and carries out the
/// actions it returns.
pub struct Daemon {
    manager: Manager,
    session: Session,

    persist: PersistHandle,
    ticker: Ticker,
    tick_period: Duration,
    suspend_timeout: Duration,

    elapsed_tx: watch::Sender<ElapsedUpdate>,

    tx: mpsc::Sender<ManagerMsg>,
    rx: Option<mpsc::Receiver<ManagerMsg>>,
}

impl Daemon {
    /// Loads the session from `store`. Must be called inside a tokio runtime.
    pub fn new(cfg: &DayflowConfig, store: Arc<dyn ActivityStore>) -> Self {
        let session = Session::initialize(store.as_ref(), &cfg.seed());

        ddebug!(
            "Daemon",
            "storage_enabled={}, tick_interval_ms={}, accrual_threshold_ms={}, activities={}, active={:?}",
            cfg.storage_enabled,
            cfg.tick_interval_ms,
            cfg.accrual_threshold_ms,
            session.activities().len(),
            session.active_id(),
        );

        let (elapsed_tx, _) = watch::channel(ElapsedUpdate::default());
        let (tx, rx) = mpsc::channel::<ManagerMsg>(256);

        Self {
            manager: Manager::new(cfg.manager_config()),
            session,
            persist: spawn_writer(store),
            ticker: Ticker::new(),
            tick_period: Duration::from_millis(cfg.tick_interval_ms),
            suspend_timeout: Duration::from_millis(cfg.suspend_timeout_ms),
            elapsed_tx,
            tx,
            rx: Some(rx),
        }
    }

    /// Inbox of the daemon loop; ticker, IPC and signal sources all post here.
    pub fn sender(&self) -> mpsc::Sender<ManagerMsg> {
        self.tx.clone()
    }

    /// Receiver for display updates, e.g. for `dayflow watch`.
    pub fn subscribe(&self) -> watch::Receiver<ElapsedUpdate> {
        self.elapsed_tx.subscribe()
    }

    fn handle_one_event(&mut self, event: Event) -> Result<Vec<Action>, String> {
        if event.is_tick() {
            return self
                .manager
                .handle_event(&mut self.session, event)
                .map_err(|e| e.to_string());
        }

        ddebug!("Event", "incoming: {:?}", event);

        match self.manager.handle_event(&mut self.session, event) {
            Ok(actions) => {
                if !actions.is_empty() {
                    ddebug!("Event", "actions: {}", describe(&actions));
                }
                Ok(actions)
            }
            Err(e) => {
                derror!("Event", "rejected: {e}");
                Err(e.to_string())
            }
        }
    }

    /// Commit and wait for the forced save.
    async fn suspend(&mut self) -> bool {
        let now_ms = crate::core::utils::now_ms();
        dinfo!("Daemon", "suspend: committing and saving");

        match self.handle_one_event(Event::Suspend { now_ms }) {
            Ok(actions) => self.exec_actions(actions).await,
            Err(_) => false,
        }
    }
}

/// Compact action summary for debug logs; collections are not dumped.
fn describe(actions: &[Action]) -> String {
    actions
        .iter()
        .map(|a| match a {
            Action::Persist { activities, forced } => {
                format!("persist(n={}, forced={forced})", activities.len())
            }
            Action::StartTicker { epoch } => format!("start-ticker({epoch})"),
            Action::CancelTicker => "cancel-ticker".to_string(),
            Action::ElapsedChanged { elapsed_ms } => format!("elapsed({elapsed_ms})"),
        })
        .collect::<Vec<_>>()
        .join(", ")
}
