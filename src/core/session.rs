// Author: Dustin Pilgrim
// License: MIT

use crate::core::activity::Activity;
use crate::core::store::ActivityStore;
use crate::{ddebug, dwarn};

/// The activity collection plus the in-memory accrual of the active one.
///
/// `active_id` always mirrors the single `is_active` flag in `activities`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    activities: Vec<Activity>,
    active_id: Option<String>,

    // Accrual (ms, supplied by events; never persisted)
    accrual_baseline_ms: u64,
    accrued_ms: u64,
    displayed_ms: u64,

    // Ticker generation; bumped on every start/cancel.
    timer_epoch: u64,
}

impl Session {
    /// Builds a session from a stored or seeded list.
    ///
    /// If several entries claim to be active, the first keeps the flag.
    pub fn from_activities(mut activities: Vec<Activity>) -> Self {
        let mut active_id: Option<String> = None;

        for a in activities.iter_mut() {
            if !a.is_active {
                continue;
            }
            if active_id.is_some() {
                dwarn!("Session", "clearing duplicate active flag on '{}'", a.id);
                a.is_active = false;
            } else {
                active_id = Some(a.id.clone());
            }
        }

        Self {
            activities,
            active_id,
            accrual_baseline_ms: 0,
            accrued_ms: 0,
            displayed_ms: 0,
            timer_epoch: 0,
        }
    }

    /// Loads from `store`, falling back to `defaults` when nothing is stored
    /// or the load fails. Never writes to the store.
    pub fn initialize(store: &dyn ActivityStore, defaults: &[Activity]) -> Self {
        match store.load() {
            Ok(Some(activities)) => {
                ddebug!("Session", "loaded {} activities from store", activities.len());
                Self::from_activities(activities)
            }
            Ok(None) => {
                ddebug!("Session", "no stored activities; using defaults");
                Self::from_activities(defaults.to_vec())
            }
            Err(e) => {
                dwarn!("Session", "failed to load activities ({e}); using defaults");
                Self::from_activities(defaults.to_vec())
            }
        }
    }

    // ---------------- read side ----------------

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    pub fn active(&self) -> Option<&Activity> {
        let id = self.active_id.as_deref()?;
        self.get(id)
    }

    pub fn get(&self, id: &str) -> Option<&Activity> {
        self.activities.iter().find(|a| a.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn displayed_ms(&self) -> u64 {
        self.displayed_ms
    }

    pub fn timer_epoch(&self) -> u64 {
        self.timer_epoch
    }

    #[cfg(test)]
    pub fn accrual_baseline_ms(&self) -> u64 {
        self.accrual_baseline_ms
    }

    /// Matches an exact id first, then a case-insensitive title.
    pub fn resolve(&self, needle: &str) -> Option<String> {
        let needle = needle.trim();
        if needle.is_empty() {
            return None;
        }

        if let Some(a) = self.get(needle) {
            return Some(a.id.clone());
        }

        self.activities
            .iter()
            .find(|a| a.title.eq_ignore_ascii_case(needle))
            .map(|a| a.id.clone())
    }

    // ---------------- collection ----------------

    fn position(&self, id: &str) -> Option<usize> {
        self.activities.iter().position(|a| a.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Activity> {
        self.activities.iter_mut().find(|a| a.id == id)
    }

    pub(crate) fn push(&mut self, mut activity: Activity) {
        activity.is_active = false;
        self.activities.push(activity);
    }

    /// Removes `id`; returns the removed entry.
    pub(crate) fn remove(&mut self, id: &str) -> Option<Activity> {
        let idx = self.position(id)?;
        let removed = self.activities.remove(idx);
        if self.active_id.as_deref() == Some(id) {
            self.active_id = None;
        }
        Some(removed)
    }

    pub(crate) fn snapshot(&self) -> Vec<Activity> {
        self.activities.clone()
    }

    // ---------------- accrual ----------------

    /// Marks `id` active and seeds the counter from its stored time.
    pub(crate) fn activate(&mut self, id: &str, now_ms: u64) {
        let Some(a) = self.get_mut(id) else {
            return;
        };
        a.is_active = true;
        let seed = a.time;

        self.active_id = Some(id.to_string());
        self.accrued_ms = seed;
        self.displayed_ms = seed;
        self.accrual_baseline_ms = now_ms;
    }

    /// Clears the active flag without touching stored time.
    pub(crate) fn deactivate(&mut self) {
        if let Some(id) = self.active_id.take() {
            if let Some(a) = self.get_mut(&id) {
                a.is_active = false;
            }
        }
        self.reset_accrual();
    }

    pub(crate) fn reset_accrual(&mut self) {
        self.accrued_ms = 0;
        self.displayed_ms = 0;
    }

    /// Folds `now - baseline` into the counter when it reaches `threshold_ms`.
    /// Returns the new displayed value if it changed.
    pub(crate) fn sample(&mut self, now_ms: u64, threshold_ms: u64) -> Option<u64> {
        self.active_id.as_ref()?;

        let delta = now_ms.saturating_sub(self.accrual_baseline_ms);
        if delta < threshold_ms {
            return None;
        }

        self.accrued_ms = self.accrued_ms.saturating_add(delta);
        self.displayed_ms = self.accrued_ms;
        self.accrual_baseline_ms = now_ms;
        Some(self.displayed_ms)
    }

    /// Writes the counter, including any sub-threshold remainder, into the
    /// active activity's `time`. Returns the committed value.
    pub(crate) fn commit(&mut self, now_ms: u64) -> Option<u64> {
        let id = self.active_id.clone()?;

        let delta = now_ms.saturating_sub(self.accrual_baseline_ms);
        self.accrued_ms = self.accrued_ms.saturating_add(delta);
        self.accrual_baseline_ms = now_ms;
        self.displayed_ms = self.accrued_ms;

        let committed = self.accrued_ms;
        if let Some(a) = self.get_mut(&id) {
            a.time = committed;
        }
        Some(committed)
    }

    /// Re-seeds the counter from the active activity's stored time.
    pub(crate) fn reseed(&mut self, now_ms: u64) {
        let Some(seed) = self.active().map(|a| a.time) else {
            return;
        };
        self.accrued_ms = seed;
        self.displayed_ms = seed;
        self.accrual_baseline_ms = now_ms;
    }

    pub(crate) fn bump_timer_epoch(&mut self) -> u64 {
        self.timer_epoch = self.timer_epoch.wrapping_add(1);
        self.timer_epoch
    }
}
