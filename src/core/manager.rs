// Author: Dustin Pilgrim
// License: MIT

use crate::core::{
    action::Action,
    activity::{Activity, ActivityPatch},
    error::{CommandError, Error},
    events::Event,
    info::SessionSnapshot,
    session::Session,
};

pub const DEFAULT_ACCRUAL_THRESHOLD_MS: u64 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerConfig {
    /// Emit a save after every effective mutation.
    pub storage_enabled: bool,

    /// Minimum sampled delta before the displayed time moves.
    pub accrual_threshold_ms: u64,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            storage_enabled: true,
            accrual_threshold_ms: DEFAULT_ACCRUAL_THRESHOLD_MS,
        }
    }
}

/// Decides how commands, ticks and suspends change a `Session`.
///
/// Pure: it never reads a clock or touches I/O. Everything the outside world
/// has to do is returned as `Action`s.
#[derive(Debug, Clone)]
pub struct Manager {
    cfg: ManagerConfig,
}

impl Manager {
    pub fn new(cfg: ManagerConfig) -> Self {
        Self { cfg }
    }

    /// Resumes accrual for an activity that was stored as active.
    pub fn start(&mut self, session: &mut Session, now_ms: u64) -> Vec<Action> {
        let Some(id) = session.active_id().map(str::to_string) else {
            return Vec::new();
        };

        session.activate(&id, now_ms);
        let epoch = session.bump_timer_epoch();

        vec![
            Action::StartTicker { epoch },
            Action::ElapsedChanged {
                elapsed_ms: session.displayed_ms(),
            },
        ]
    }

    pub fn handle_event(&mut self, session: &mut Session, event: Event) -> Result<Vec<Action>, Error> {
        let actions = match event {
            Event::Tick { now_ms, epoch } => self.tick(session, now_ms, epoch),
            Event::SetActive { id, active, now_ms } => self.set_active(session, &id, active, now_ms),
            Event::Create { activity, now_ms } => self.create(session, activity, now_ms)?,
            Event::Update { id, patch, now_ms } => self.update(session, &id, &patch, now_ms),
            Event::Delete { id, now_ms } => self.delete(session, &id, now_ms),
            Event::Suspend { now_ms } => self.suspend(session, now_ms),
        };

        Ok(actions)
    }

    pub fn snapshot(&self, session: &Session) -> SessionSnapshot {
        SessionSnapshot::from_session(session, self.cfg.storage_enabled)
    }

    // ---------------- commands ----------------

    fn set_active(&mut self, session: &mut Session, id: &str, desired: bool, now_ms: u64) -> Vec<Action> {
        let mut actions = self.switch(session, id, desired, now_ms);
        if !actions.is_empty() {
            self.persist(session, &mut actions);
        }
        actions
    }

    /// Activation change without the save. Empty when nothing changed.
    fn switch(&mut self, session: &mut Session, id: &str, desired: bool, now_ms: u64) -> Vec<Action> {
        let Some(target) = session.get(id) else {
            return Vec::new();
        };
        if target.is_active == desired {
            return Vec::new();
        }

        // Whatever is running stops here; its time is kept.
        if session.active_id().is_some() {
            session.commit(now_ms);
            session.deactivate();
        }

        let epoch = session.bump_timer_epoch();

        if desired {
            session.activate(id, now_ms);
            vec![
                Action::StartTicker { epoch },
                Action::ElapsedChanged {
                    elapsed_ms: session.displayed_ms(),
                },
            ]
        } else {
            vec![Action::CancelTicker, Action::ElapsedChanged { elapsed_ms: 0 }]
        }
    }

    fn create(&mut self, session: &mut Session, activity: Activity, now_ms: u64) -> Result<Vec<Action>, Error> {
        if session.contains(&activity.id) {
            return Err(Error::InvalidCommand(CommandError::DuplicateId(activity.id)));
        }

        let id = activity.id.clone();
        let wants_active = activity.is_active;
        session.push(activity);

        let mut actions = if wants_active {
            self.switch(session, &id, true, now_ms)
        } else {
            Vec::new()
        };

        self.persist(session, &mut actions);
        Ok(actions)
    }

    fn update(&mut self, session: &mut Session, id: &str, patch: &ActivityPatch, now_ms: u64) -> Vec<Action> {
        if !session.contains(id) {
            return Vec::new();
        }

        let mut actions = Vec::new();
        let is_active = session.active_id() == Some(id);
        let shown_before = session.displayed_ms();
        let retitled = patch
            .title
            .as_ref()
            .is_some_and(|t| session.get(id).is_some_and(|a| &a.title != t));

        if is_active {
            session.commit(now_ms);
        }

        if let Some(a) = session.get_mut(id) {
            patch.apply(a);
        }

        if is_active {
            session.reseed(now_ms);
            // Watchers render the title too.
            if retitled || session.displayed_ms() != shown_before {
                actions.push(Action::ElapsedChanged {
                    elapsed_ms: session.displayed_ms(),
                });
            }
        }

        self.persist(session, &mut actions);
        actions
    }

    fn delete(&mut self, session: &mut Session, id: &str, _now_ms: u64) -> Vec<Action> {
        let was_active = session.active_id() == Some(id);

        if session.remove(id).is_none() {
            return Vec::new();
        }

        let mut actions = Vec::new();

        // Uncommitted time of a deleted activity is dropped.
        if was_active {
            session.reset_accrual();
            session.bump_timer_epoch();
            actions.push(Action::CancelTicker);
            actions.push(Action::ElapsedChanged { elapsed_ms: 0 });
        }

        self.persist(session, &mut actions);
        actions
    }

    // ---------------- timing ----------------

    fn tick(&mut self, session: &mut Session, now_ms: u64, epoch: u64) -> Vec<Action> {
        if epoch != session.timer_epoch() {
            return Vec::new();
        }

        match session.sample(now_ms, self.cfg.accrual_threshold_ms) {
            Some(elapsed_ms) => vec![Action::ElapsedChanged { elapsed_ms }],
            None => Vec::new(),
        }
    }

    fn suspend(&mut self, session: &mut Session, now_ms: u64) -> Vec<Action> {
        session.commit(now_ms);

        vec![Action::Persist {
            activities: session.snapshot(),
            forced: true,
        }]
    }

    fn persist(&self, session: &Session, actions: &mut Vec<Action>) {
        if self.cfg.storage_enabled {
            actions.push(Action::Persist {
                activities: session.snapshot(),
                forced: false,
            });
        }
    }
}
