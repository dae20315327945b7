// Author: Dustin Pilgrim
// License: MIT

use crate::core::action::Action;
use crate::core::activity::{default_activities, Activity, ActivityPatch, DEFAULT_TITLES};
use crate::core::error::{CommandError, Error};
use crate::core::events::Event;
use crate::core::manager::{Manager, ManagerConfig};
use crate::core::session::Session;
use crate::core::store::MemoryStore;

fn cfg(storage_enabled: bool) -> ManagerConfig {
    ManagerConfig {
        storage_enabled,
        accrual_threshold_ms: 100,
    }
}

fn session_ab() -> Session {
    Session::from_activities(vec![Activity::new("a", "Alpha"), Activity::new("b", "Beta")])
}

fn set_active(id: &str, active: bool, now_ms: u64) -> Event {
    Event::SetActive {
        id: id.to_string(),
        active,
        now_ms,
    }
}

fn tick(session: &Session, now_ms: u64) -> Event {
    Event::Tick {
        now_ms,
        epoch: session.timer_epoch(),
    }
}

fn time_of(session: &Session, id: &str) -> u64 {
    session.get(id).map(|a| a.time).unwrap()
}

fn active_count(session: &Session) -> usize {
    session.activities().iter().filter(|a| a.is_active).count()
}

fn persists(actions: &[Action]) -> Vec<(Vec<Activity>, bool)> {
    actions
        .iter()
        .filter_map(|a| match a {
            Action::Persist { activities, forced } => Some((activities.clone(), *forced)),
            _ => None,
        })
        .collect()
}

fn elapsed_updates(actions: &[Action]) -> Vec<u64> {
    actions
        .iter()
        .filter_map(|a| match a {
            Action::ElapsedChanged { elapsed_ms } => Some(*elapsed_ms),
            _ => None,
        })
        .collect()
}

#[test]
fn at_most_one_active_after_every_switch() {
    let mut mgr = Manager::new(cfg(true));
    let mut s = Session::from_activities(default_activities(DEFAULT_TITLES));

    let calls = [
        ("1", true),
        ("2", true),
        ("2", true),
        ("3", false),
        ("5", true),
        ("5", false),
        ("4", true),
        ("missing", true),
        ("1", true),
    ];

    for (i, (id, active)) in calls.iter().enumerate() {
        mgr.handle_event(&mut s, set_active(id, *active, i as u64 * 10)).unwrap();
        assert!(active_count(&s) <= 1, "after call {i}");
        assert_eq!(
            s.active_id(),
            s.activities().iter().find(|a| a.is_active).map(|a| a.id.as_str())
        );
    }

    assert_eq!(s.active_id(), Some("1"));
}

#[test]
fn repeated_activation_is_a_noop() {
    let mut mgr = Manager::new(cfg(true));
    let mut s = session_ab();

    let first = mgr.handle_event(&mut s, set_active("a", true, 0)).unwrap();
    assert!(!first.is_empty());
    let after_once = s.clone();

    let second = mgr.handle_event(&mut s, set_active("a", true, 50)).unwrap();
    assert!(second.is_empty());
    assert_eq!(s, after_once);
}

#[test]
fn deactivation_commits_exact_elapsed_time() {
    let mut mgr = Manager::new(cfg(true));
    let mut s = session_ab();

    mgr.handle_event(&mut s, set_active("a", true, 0)).unwrap();
    let actions = mgr.handle_event(&mut s, set_active("a", false, 1500)).unwrap();

    assert_eq!(time_of(&s, "a"), 1500);
    assert_eq!(s.active_id(), None);
    assert_eq!(s.displayed_ms(), 0);
    assert!(actions.contains(&Action::CancelTicker));

    let saved = persists(&actions);
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].0[0].time, 1500);
    assert!(!saved[0].1);
}

#[test]
fn ticks_do_not_change_committed_total() {
    let mut mgr = Manager::new(cfg(true));
    let mut s = session_ab();

    mgr.handle_event(&mut s, set_active("a", true, 0)).unwrap();
    for now in [130, 260, 301, 700, 1499] {
        let ev = tick(&s, now);
        mgr.handle_event(&mut s, ev).unwrap();
    }
    mgr.handle_event(&mut s, set_active("a", false, 1500)).unwrap();

    assert_eq!(time_of(&s, "a"), 1500);
}

#[test]
fn activation_resumes_from_stored_time() {
    let mut mgr = Manager::new(cfg(true));
    let mut s = session_ab();

    mgr.handle_event(&mut s, set_active("a", true, 0)).unwrap();
    mgr.handle_event(&mut s, set_active("a", false, 400)).unwrap();

    let actions = mgr.handle_event(&mut s, set_active("a", true, 10_000)).unwrap();
    assert_eq!(elapsed_updates(&actions), vec![400]);

    mgr.handle_event(&mut s, set_active("a", false, 10_250)).unwrap();
    assert_eq!(time_of(&s, "a"), 650);
}

#[test]
fn switching_commits_previous_and_restarts_ticker() {
    let mut mgr = Manager::new(cfg(true));
    let mut s = session_ab();

    mgr.handle_event(&mut s, set_active("a", true, 0)).unwrap();
    let epoch_a = s.timer_epoch();

    let actions = mgr.handle_event(&mut s, set_active("b", true, 800)).unwrap();

    assert_eq!(time_of(&s, "a"), 800);
    assert!(!s.get("a").unwrap().is_active);
    assert_eq!(s.active_id(), Some("b"));
    assert!(s.timer_epoch() > epoch_a);
    assert!(actions.contains(&Action::StartTicker {
        epoch: s.timer_epoch()
    }));
}

#[test]
fn delete_of_active_discards_uncommitted_time() {
    let mut mgr = Manager::new(cfg(true));
    let mut s = session_ab();

    mgr.handle_event(&mut s, set_active("b", true, 0)).unwrap();
    let ev = tick(&s, 500);
    mgr.handle_event(&mut s, ev).unwrap();
    assert_eq!(s.displayed_ms(), 500);

    let actions = mgr
        .handle_event(&mut s, Event::Delete { id: "b".to_string(), now_ms: 500 })
        .unwrap();

    assert!(s.get("b").is_none());
    assert_eq!(s.active_id(), None);
    assert_eq!(s.displayed_ms(), 0);
    assert!(s.activities().iter().all(|a| a.time == 0));
    assert!(actions.contains(&Action::CancelTicker));
    assert_eq!(elapsed_updates(&actions), vec![0]);

    let saved = persists(&actions);
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].0, vec![Activity::new("a", "Alpha")]);
}

#[test]
fn delete_of_inactive_keeps_running_timer() {
    let mut mgr = Manager::new(cfg(true));
    let mut s = session_ab();

    mgr.handle_event(&mut s, set_active("a", true, 0)).unwrap();
    let epoch = s.timer_epoch();

    let actions = mgr
        .handle_event(&mut s, Event::Delete { id: "b".to_string(), now_ms: 300 })
        .unwrap();

    assert_eq!(s.active_id(), Some("a"));
    assert_eq!(s.timer_epoch(), epoch);
    assert!(!actions.contains(&Action::CancelTicker));
    assert_eq!(persists(&actions).len(), 1);
}

#[test]
fn default_seed_used_when_nothing_stored() {
    let store = MemoryStore::new();
    let seed = default_activities(DEFAULT_TITLES);

    let s = Session::initialize(&store, &seed);

    assert_eq!(s.activities(), seed.as_slice());
    assert_eq!(s, Session::from_activities(seed));
}

#[test]
fn suspend_forces_single_save_when_storage_disabled() {
    let mut mgr = Manager::new(cfg(false));
    let mut s = session_ab();

    let a = mgr.handle_event(&mut s, set_active("a", true, 0)).unwrap();
    assert!(persists(&a).is_empty());

    let actions = mgr.handle_event(&mut s, Event::Suspend { now_ms: 700 }).unwrap();
    let saved = persists(&actions);

    assert_eq!(saved.len(), 1);
    assert!(saved[0].1);
    assert_eq!(saved[0].0[0].time, 700);
    assert!(saved[0].0[0].is_active);

    // Accrual keeps going after the suspend commit.
    mgr.handle_event(&mut s, set_active("a", false, 1000)).unwrap();
    assert_eq!(time_of(&s, "a"), 1000);
}

#[test]
fn suspend_with_nothing_active_still_saves() {
    let mut mgr = Manager::new(cfg(true));
    let mut s = session_ab();

    let actions = mgr.handle_event(&mut s, Event::Suspend { now_ms: 5 }).unwrap();
    let saved = persists(&actions);

    assert_eq!(saved.len(), 1);
    assert!(saved[0].1);
    assert_eq!(saved[0].0, s.activities().to_vec());
}

#[test]
fn ticks_below_threshold_are_coalesced() {
    let mut mgr = Manager::new(cfg(true));
    let mut s = session_ab();

    mgr.handle_event(&mut s, set_active("a", true, 1000)).unwrap();

    let ev = tick(&s, 1040);
    let first = mgr.handle_event(&mut s, ev).unwrap();
    let ev = tick(&s, 1080);
    let second = mgr.handle_event(&mut s, ev).unwrap();
    assert!(first.is_empty());
    assert!(second.is_empty());

    let ev = tick(&s, 1120);
    let third = mgr.handle_event(&mut s, ev).unwrap();
    assert_eq!(third, vec![Action::ElapsedChanged { elapsed_ms: 120 }]);

    // Baseline moved to 1120.
    let ev = tick(&s, 1200);
    assert!(mgr.handle_event(&mut s, ev).unwrap().is_empty());
}

#[test]
fn stale_ticks_are_ignored() {
    let mut mgr = Manager::new(cfg(true));
    let mut s = session_ab();

    mgr.handle_event(&mut s, set_active("a", true, 0)).unwrap();
    let old_epoch = s.timer_epoch();
    mgr.handle_event(&mut s, set_active("a", false, 100)).unwrap();
    mgr.handle_event(&mut s, set_active("b", true, 100)).unwrap();

    let actions = mgr
        .handle_event(&mut s, Event::Tick { now_ms: 5_000, epoch: old_epoch })
        .unwrap();
    assert!(actions.is_empty());
    assert_eq!(s.displayed_ms(), 0);
}

#[test]
fn ticks_without_active_do_nothing() {
    let mut mgr = Manager::new(cfg(true));
    let mut s = session_ab();

    let ev = tick(&s, 10_000);
    assert!(mgr.handle_event(&mut s, ev).unwrap().is_empty());
    assert_eq!(s.displayed_ms(), 0);
}

#[test]
fn create_appends_inactive_and_persists() {
    let mut mgr = Manager::new(cfg(true));
    let mut s = session_ab();

    let actions = mgr
        .handle_event(
            &mut s,
            Event::Create {
                activity: Activity::new("c", "Gamma"),
                now_ms: 0,
            },
        )
        .unwrap();

    assert_eq!(s.activities().last().map(|a| a.id.as_str()), Some("c"));
    assert_eq!(s.active_id(), None);
    assert_eq!(persists(&actions).len(), 1);
}

#[test]
fn create_active_takes_over_from_running() {
    let mut mgr = Manager::new(cfg(true));
    let mut s = session_ab();

    mgr.handle_event(&mut s, set_active("a", true, 0)).unwrap();

    let mut c = Activity::new("c", "Gamma");
    c.is_active = true;
    let actions = mgr
        .handle_event(&mut s, Event::Create { activity: c, now_ms: 300 })
        .unwrap();

    assert_eq!(s.active_id(), Some("c"));
    assert_eq!(active_count(&s), 1);
    assert_eq!(time_of(&s, "a"), 300);
    assert_eq!(persists(&actions).len(), 1);
}

#[test]
fn create_rejects_duplicate_id() {
    let mut mgr = Manager::new(cfg(true));
    let mut s = session_ab();

    let err = mgr
        .handle_event(
            &mut s,
            Event::Create {
                activity: Activity::new("a", "Again"),
                now_ms: 0,
            },
        )
        .unwrap_err();

    assert_eq!(err, Error::InvalidCommand(CommandError::DuplicateId("a".to_string())));
    assert_eq!(s.activities().len(), 2);
}

#[test]
fn update_of_active_commits_before_merge() {
    let mut mgr = Manager::new(cfg(true));
    let mut s = session_ab();

    mgr.handle_event(&mut s, set_active("a", true, 0)).unwrap();
    let actions = mgr
        .handle_event(
            &mut s,
            Event::Update {
                id: "a".to_string(),
                patch: ActivityPatch::title("Renamed"),
                now_ms: 900,
            },
        )
        .unwrap();

    let a = s.get("a").unwrap();
    assert_eq!(a.title, "Renamed");
    assert_eq!(a.time, 900);
    assert!(a.is_active);
    assert_eq!(persists(&actions)[0].0[0].time, 900);

    mgr.handle_event(&mut s, set_active("a", false, 1000)).unwrap();
    assert_eq!(time_of(&s, "a"), 1000);
}

#[test]
fn rename_of_active_republishes_display() {
    let mut mgr = Manager::new(cfg(false));
    let mut s = session_ab();

    mgr.handle_event(&mut s, set_active("a", true, 0)).unwrap();
    let ev = tick(&s, 300);
    mgr.handle_event(&mut s, ev).unwrap();

    let rename = |title: &str| Event::Update {
        id: "a".to_string(),
        patch: ActivityPatch::title(title),
        now_ms: 300,
    };

    let actions = mgr.handle_event(&mut s, rename("Focus")).unwrap();
    assert_eq!(elapsed_updates(&actions), vec![300]);

    // Same title again: nothing to show.
    let actions = mgr.handle_event(&mut s, rename("Focus")).unwrap();
    assert!(elapsed_updates(&actions).is_empty());

    // Renaming an inactive entry leaves the display alone.
    let actions = mgr
        .handle_event(
            &mut s,
            Event::Update {
                id: "b".to_string(),
                patch: ActivityPatch::title("Other"),
                now_ms: 300,
            },
        )
        .unwrap();
    assert!(elapsed_updates(&actions).is_empty());
}

#[test]
fn time_edit_on_active_reseeds_counter() {
    let mut mgr = Manager::new(cfg(true));
    let mut s = session_ab();

    mgr.handle_event(&mut s, set_active("a", true, 0)).unwrap();
    let actions = mgr
        .handle_event(
            &mut s,
            Event::Update {
                id: "a".to_string(),
                patch: ActivityPatch::time(60_000),
                now_ms: 500,
            },
        )
        .unwrap();

    assert_eq!(elapsed_updates(&actions), vec![60_000]);

    mgr.handle_event(&mut s, set_active("a", false, 700)).unwrap();
    assert_eq!(time_of(&s, "a"), 60_200);
}

#[test]
fn update_of_inactive_leaves_running_accrual_alone() {
    let mut mgr = Manager::new(cfg(true));
    let mut s = session_ab();

    mgr.handle_event(&mut s, set_active("a", true, 0)).unwrap();
    mgr.handle_event(
        &mut s,
        Event::Update {
            id: "b".to_string(),
            patch: ActivityPatch::time(42),
            now_ms: 400,
        },
    )
    .unwrap();

    assert_eq!(time_of(&s, "b"), 42);
    assert_eq!(time_of(&s, "a"), 0);
    assert_eq!(s.accrual_baseline_ms(), 0);
}

#[test]
fn unknown_targets_are_noops() {
    let mut mgr = Manager::new(cfg(true));
    let mut s = session_ab();
    let before = s.clone();

    let events = vec![
        set_active("zzz", true, 0),
        set_active("a", false, 0),
        Event::Update {
            id: "zzz".to_string(),
            patch: ActivityPatch::title("x"),
            now_ms: 0,
        },
        Event::Delete {
            id: "zzz".to_string(),
            now_ms: 0,
        },
    ];

    for ev in events {
        assert!(mgr.handle_event(&mut s, ev).unwrap().is_empty());
    }
    assert_eq!(s, before);
}

#[test]
fn storage_disabled_suppresses_command_saves() {
    let mut mgr = Manager::new(cfg(false));
    let mut s = session_ab();

    let mut all = Vec::new();
    all.extend(mgr.handle_event(&mut s, set_active("a", true, 0)).unwrap());
    all.extend(
        mgr.handle_event(
            &mut s,
            Event::Create {
                activity: Activity::new("c", "Gamma"),
                now_ms: 10,
            },
        )
        .unwrap(),
    );
    all.extend(
        mgr.handle_event(&mut s, Event::Delete { id: "b".to_string(), now_ms: 20 })
            .unwrap(),
    );

    assert!(all.iter().all(|a| !a.is_persist()));
}

#[test]
fn start_resumes_stored_active_activity() {
    let mut mgr = Manager::new(cfg(true));
    let mut a = Activity::new("a", "Alpha");
    a.is_active = true;
    a.time = 5_000;
    let mut s = Session::from_activities(vec![a, Activity::new("b", "Beta")]);

    let actions = mgr.start(&mut s, 100);

    assert_eq!(
        actions,
        vec![
            Action::StartTicker { epoch: s.timer_epoch() },
            Action::ElapsedChanged { elapsed_ms: 5_000 },
        ]
    );

    mgr.handle_event(&mut s, set_active("a", false, 350)).unwrap();
    assert_eq!(time_of(&s, "a"), 5_250);
}

#[test]
fn start_without_active_is_quiet() {
    let mut mgr = Manager::new(cfg(true));
    let mut s = session_ab();
    assert!(mgr.start(&mut s, 0).is_empty());
}
