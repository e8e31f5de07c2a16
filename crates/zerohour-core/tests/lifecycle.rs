//! End-to-end lifecycle scenarios driven through the public API with
//! synthetic clocks: no sleeping, every `tick` gets an explicit `now`.

use chrono::{Duration, Utc};
use tempfile::TempDir;
use zerohour_core::{Config, Delta, EventDraft, Store, Tier, Tracker};

fn disk_tracker(dir: &TempDir) -> Tracker {
    let store = Store::open_at(&dir.path().join("zerohour.db")).unwrap();
    let (tracker, _) = Tracker::load(store, &Config::default(), Utc::now());
    tracker
}

#[test]
fn partition_survives_a_store_round_trip() {
    let dir = TempDir::new().unwrap();
    let mut tracker = disk_tracker(&dir);

    let now = Utc::now();
    let long_ago = now - Duration::days(400);
    tracker
        .create(&EventDraft::new("expired", "2020-03-01", "old"), long_ago)
        .unwrap();
    tracker
        .create(&EventDraft::new("upcoming", "2099-03-01", "new"), now)
        .unwrap();
    tracker.tick(now);

    let active: Vec<_> = tracker.active().to_vec();
    let past: Vec<_> = tracker.past().to_vec();
    assert_eq!(active.len(), 1);
    assert_eq!(past.len(), 1);
    drop(tracker);

    let reloaded = disk_tracker(&dir);
    assert_eq!(reloaded.active(), active.as_slice());
    assert_eq!(reloaded.past(), past.as_slice());
}

#[test]
fn no_id_ever_appears_in_both_collections() {
    let dir = TempDir::new().unwrap();
    let mut tracker = disk_tracker(&dir);
    let long_ago = Utc::now() - Duration::days(400);
    for (name, date) in [("a", "2020-01-01"), ("b", "2020-06-01"), ("c", "2099-01-01")] {
        tracker
            .create(&EventDraft::new(name, date, ""), long_ago)
            .unwrap();
    }
    tracker.tick(Utc::now());
    for event in tracker.past() {
        assert!(!tracker.active().iter().any(|a| a.id == event.id));
    }
}

#[test]
fn ten_days_out_classifies_near() {
    let dir = TempDir::new().unwrap();
    let mut tracker = disk_tracker(&dir);
    let now = Utc::now();
    let date = (now + Duration::days(10)).format("%Y-%m-%d").to_string();
    tracker
        .create(&EventDraft::new("conference", &date, ""), now)
        .unwrap();
    let snap = tracker.snapshot(now);
    assert_eq!(snap.active[0].tier, Tier::Near);
}

#[test]
fn delete_active_event_then_undo_within_window_keeps_it() {
    let dir = TempDir::new().unwrap();
    let mut tracker = disk_tracker(&dir);
    let now = Utc::now();
    let (event, _) = tracker
        .create(&EventDraft::new("keepme", "2099-03-01", "important"), now)
        .unwrap();

    tracker.request_delete(event.id, now).unwrap();
    tracker.tick(now + Duration::seconds(3));
    assert!(tracker
        .undo_delete(event.id, now + Duration::seconds(3))
        .is_some());

    let (found, is_past) = tracker.find(event.id).unwrap();
    assert!(!is_past);
    assert_eq!(*found, event);

    // The restored state is also what the store holds.
    drop(tracker);
    let reloaded = disk_tracker(&dir);
    assert_eq!(reloaded.active(), &[event]);
}

#[test]
fn delete_past_event_without_undo_removes_it_everywhere() {
    let dir = TempDir::new().unwrap();
    let mut tracker = disk_tracker(&dir);
    let now = Utc::now();
    let (event, _) = tracker
        .create(&EventDraft::new("bygone", "2020-03-01", ""), now - Duration::days(400))
        .unwrap();
    tracker.tick(now);
    assert_eq!(tracker.past().len(), 1);

    tracker.request_delete(event.id, now).unwrap();
    let deltas = tracker.tick(now + Duration::seconds(6));
    assert!(deltas
        .iter()
        .any(|d| matches!(d, Delta::Removed { id, .. } if *id == event.id)));
    assert!(tracker.past().is_empty());
    assert!(tracker.undo_delete(event.id, now + Duration::seconds(7)).is_none());

    drop(tracker);
    let reloaded = disk_tracker(&dir);
    assert!(reloaded.past().is_empty());
    assert!(reloaded.active().is_empty());
}

#[test]
fn pending_delete_survives_a_restart() {
    let dir = TempDir::new().unwrap();
    let mut tracker = disk_tracker(&dir);
    let now = Utc::now();
    let (event, _) = tracker
        .create(&EventDraft::new("doomed", "2099-03-01", ""), now)
        .unwrap();
    tracker.request_delete(event.id, now).unwrap();
    drop(tracker);

    // Undo still works within the window after a reload.
    let mut reloaded = disk_tracker(&dir);
    assert!(reloaded.pending_on(event.id).is_some());
    assert!(reloaded
        .undo_delete(event.id, now + Duration::seconds(2))
        .is_some());

    // And a reload after the window reaps on the first catch-up tick.
    reloaded.request_delete(event.id, now).unwrap();
    drop(reloaded);
    let mut later = disk_tracker(&dir);
    later.tick(now + Duration::seconds(10));
    assert!(later.find(event.id).is_none());
}
