//! Lifecycle tracker.
//!
//! The tracker is a wall-clock state machine over the two event
//! collections. It does not use internal threads or timers - the caller is
//! responsible for invoking `tick(now)` periodically.
//!
//! ## State transitions per event
//!
//! ```text
//! Active -> (date passed) -> Past -> (delete requested) -> PendingDelete
//!        -> (grace elapses, no undo) -> Removed
//! PendingDelete -> (undo) -> previous collection
//! ```
//!
//! The tracker owns the collections, the pending-delete map, and the store
//! handle; nothing here is global. Mutations persist through the store on
//! every change, and persistence failures are swallowed: in-memory state
//! stays authoritative for the session.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Local, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::countdown::{ceil_div, Outlook};
use crate::delta::Delta;
use crate::error::ValidationError;
use crate::event::{CountdownEvent, EventDraft, Tier, DATE_INPUT_FORMAT};
use crate::storage::{Config, Store};

/// A scheduled permanent removal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingDelete {
    /// Instant at which the event is removed for good.
    pub deadline: DateTime<Utc>,
    /// Collection the event lived in when deletion was requested.
    pub from_past: bool,
    /// Last whole-second countdown value reported, so `DeleteCountdown`
    /// fires only when the displayed number changes.
    #[serde(default)]
    announced_secs: Option<i64>,
}

/// One active event as the presentation layer sees it.
#[derive(Debug, Clone, Serialize)]
pub struct ActiveView {
    pub event: CountdownEvent,
    pub tier: Tier,
    pub outlook: Outlook,
    /// Seconds left on the undo countdown, when a delete is pending.
    pub pending_secs: Option<i64>,
}

/// One past event as the presentation layer sees it.
#[derive(Debug, Clone, Serialize)]
pub struct PastView {
    pub event: CountdownEvent,
    pub pending_secs: Option<i64>,
}

/// Read model taken after `tick`; a pure function of tracker state and
/// `now`.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    /// Active events in date order, each carrying its tier and outlook.
    pub active: Vec<ActiveView>,
    /// Past events, most recently archived first.
    pub past: Vec<PastView>,
}

impl Snapshot {
    pub fn by_tier(&self, tier: Tier) -> impl Iterator<Item = &ActiveView> {
        self.active.iter().filter(move |v| v.tier == tier)
    }
}

/// Owns the `active` and `past` collections and every mutation over them.
pub struct Tracker {
    active: Vec<CountdownEvent>,
    past: Vec<CountdownEvent>,
    pending: HashMap<i64, PendingDelete>,
    editing: Option<i64>,
    store: Store,
    grace: Duration,
}

impl Tracker {
    /// Load both collections and the pending-delete map from the store.
    ///
    /// Legacy records without a `start` baseline are back-filled from
    /// `created_at` here, once, instead of on every render; the returned
    /// deltas report what was migrated.
    pub fn load(store: Store, config: &Config, now: DateTime<Utc>) -> (Self, Vec<Delta>) {
        let mut active = store.load_active();
        let mut past = store.load_past();
        let pending = store.load_pending();

        let mut deltas = Vec::new();
        for event in active.iter_mut().chain(past.iter_mut()) {
            if event.start.is_none() {
                event.start = Some(event.created_at);
                log::debug!("back-filled start for event {}", event.id);
                deltas.push(Delta::StartBackfilled {
                    id: event.id,
                    at: now,
                });
            }
        }

        let mut tracker = Self {
            active,
            past,
            pending,
            editing: None,
            store,
            grace: Duration::seconds(config.grace_secs as i64),
        };
        tracker.sort_active();
        if !deltas.is_empty() {
            tracker.persist_active();
            tracker.persist_past();
        }
        (tracker, deltas)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn active(&self) -> &[CountdownEvent] {
        &self.active
    }

    pub fn past(&self) -> &[CountdownEvent] {
        &self.past
    }

    /// Find an event in either collection. The bool is true for `past`.
    pub fn find(&self, id: i64) -> Option<(&CountdownEvent, bool)> {
        self.active
            .iter()
            .find(|e| e.id == id)
            .map(|e| (e, false))
            .or_else(|| self.past.iter().find(|e| e.id == id).map(|e| (e, true)))
    }

    pub fn pending_on(&self, id: i64) -> Option<&PendingDelete> {
        self.pending.get(&id)
    }

    pub fn editing(&self) -> Option<i64> {
        self.editing
    }

    /// Build the full read model for the presentation layer.
    pub fn snapshot(&self, now: DateTime<Utc>) -> Snapshot {
        let active = self
            .active
            .iter()
            .map(|e| ActiveView {
                tier: e.tier(now),
                outlook: Outlook::of(e, now),
                pending_secs: self.pending_secs(e.id, now),
                event: e.clone(),
            })
            .collect();
        let past = self
            .past
            .iter()
            .map(|e| PastView {
                pending_secs: self.pending_secs(e.id, now),
                event: e.clone(),
            })
            .collect();
        Snapshot { active, past }
    }

    fn pending_secs(&self, id: i64, now: DateTime<Utc>) -> Option<i64> {
        let entry = self.pending.get(&id)?;
        let ms = entry.deadline.signed_duration_since(now).num_milliseconds();
        (ms > 0).then(|| ceil_div(ms, 1000))
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Validate a draft and append the new event to `active`.
    pub fn create(
        &mut self,
        draft: &EventDraft,
        now: DateTime<Utc>,
    ) -> Result<(CountdownEvent, Delta), ValidationError> {
        let valid = draft.validate()?;
        let id = self.fresh_id(now);
        let event = CountdownEvent::new(id, valid, now);
        log::debug!("created event {id} '{}'", event.name);
        self.active.push(event.clone());
        self.sort_active();
        self.persist_active();
        Ok((
            event.clone(),
            Delta::Created {
                id,
                name: event.name,
                at: now,
            },
        ))
    }

    /// Mark an event as the edit target and return its current field values
    /// for form prefill. Implicitly cancels any other pending edit. Returns
    /// `None` for past, unknown, or pending-delete events.
    pub fn begin_edit(&mut self, id: i64) -> Option<EventDraft> {
        if self.pending.contains_key(&id) {
            return None;
        }
        let event = self.active.iter().find(|e| e.id == id)?;
        self.editing = Some(id);
        Some(EventDraft::new(
            event.name.clone(),
            event
                .date
                .with_timezone(&Local)
                .format(DATE_INPUT_FORMAT)
                .to_string(),
            event.description.clone(),
        ))
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Mutate name/date/description in place.
    ///
    /// Only permitted while the event is Active and not pending deletion;
    /// anything else is a no-op returning `Ok(None)`.
    pub fn edit(
        &mut self,
        id: i64,
        draft: &EventDraft,
        now: DateTime<Utc>,
    ) -> Result<Option<(CountdownEvent, Delta)>, ValidationError> {
        if self.pending.contains_key(&id) || !self.active.iter().any(|e| e.id == id) {
            return Ok(None);
        }
        let valid = draft.validate()?;
        let Some(event) = self.active.iter_mut().find(|e| e.id == id) else {
            return Ok(None);
        };
        event.name = valid.name;
        event.date = valid.date;
        event.description = valid.description;
        let event = event.clone();
        log::debug!("edited event {id}");
        self.editing = None;
        self.sort_active();
        self.persist_active();
        Ok(Some((event, Delta::Edited { id, at: now })))
    }

    /// Schedule a soft delete: the event stays in its collection until the
    /// grace window elapses. A second request for an already-pending id is a
    /// no-op, as is an unknown id.
    pub fn request_delete(&mut self, id: i64, now: DateTime<Utc>) -> Option<Delta> {
        if self.pending.contains_key(&id) {
            return None;
        }
        let from_past = if self.active.iter().any(|e| e.id == id) {
            false
        } else if self.past.iter().any(|e| e.id == id) {
            true
        } else {
            return None;
        };
        if self.editing == Some(id) {
            self.editing = None;
        }
        let deadline = now + self.grace;
        self.pending.insert(
            id,
            PendingDelete {
                deadline,
                from_past,
                announced_secs: None,
            },
        );
        log::debug!("delete scheduled for event {id}, deadline {deadline}");
        self.persist_pending();
        Some(Delta::DeleteScheduled { id, deadline, at: now })
    }

    /// Cancel a pending delete. Effective only strictly before the deadline;
    /// afterwards (or for an unknown id) it does nothing.
    pub fn undo_delete(&mut self, id: i64, now: DateTime<Utc>) -> Option<Delta> {
        let entry = self.pending.get(&id)?;
        if now >= entry.deadline {
            return None;
        }
        self.pending.remove(&id);
        log::debug!("delete undone for event {id}");
        self.persist_pending();
        Some(Delta::DeleteUndone { id, at: now })
    }

    /// Advance the state machine to `now`.
    ///
    /// Order inside one tick is fixed: the expiration sweep (and its
    /// persistence) completes before pending-delete processing, so a
    /// just-expired event never renders with a stale active timer.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Vec<Delta> {
        let mut deltas = Vec::new();
        self.sweep(now, &mut deltas);
        self.reap(now, &mut deltas);
        deltas
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Move every expired event from `active` to the head of `past`,
    /// iterating in active-list order. Idempotent for a fixed `now`; the
    /// only way an event enters `past`.
    fn sweep(&mut self, now: DateTime<Utc>, deltas: &mut Vec<Delta>) {
        if !self.active.iter().any(|e| e.is_expired(now)) {
            return;
        }
        let mut pending_changed = false;
        let drained = std::mem::take(&mut self.active);
        for event in drained {
            if event.is_expired(now) {
                log::debug!("event {} '{}' expired", event.id, event.name);
                deltas.push(Delta::Expired {
                    id: event.id,
                    name: event.name.clone(),
                    at: now,
                });
                // keep a pending entry's origin in step with the migration
                if let Some(entry) = self.pending.get_mut(&event.id) {
                    entry.from_past = true;
                    pending_changed = true;
                }
                self.past.insert(0, event);
            } else {
                self.active.push(event);
            }
        }
        self.persist_active();
        self.persist_past();
        if pending_changed {
            self.persist_pending();
        }
    }

    /// Emit undo-countdown updates and permanently remove pending entries
    /// whose deadline has passed.
    fn reap(&mut self, now: DateTime<Utc>, deltas: &mut Vec<Delta>) {
        let mut ids: Vec<i64> = self.pending.keys().copied().collect();
        ids.sort_unstable();

        let mut removed_active = false;
        let mut removed_past = false;
        let mut pending_changed = false;

        for id in ids {
            let Some(deadline) = self.pending.get(&id).map(|p| p.deadline) else {
                continue;
            };
            if deadline <= now {
                let Some(entry) = self.pending.remove(&id) else {
                    continue;
                };
                pending_changed = true;
                let (list, removed) = if entry.from_past {
                    (&mut self.past, &mut removed_past)
                } else {
                    (&mut self.active, &mut removed_active)
                };
                if let Some(pos) = list.iter().position(|e| e.id == id) {
                    list.remove(pos);
                    *removed = true;
                }
                log::debug!("event {id} permanently removed");
                deltas.push(Delta::Removed { id, at: now });
            } else {
                let ms_left = deadline.signed_duration_since(now).num_milliseconds();
                let secs_left = ceil_div(ms_left, 1000);
                if let Some(entry) = self.pending.get_mut(&id) {
                    if entry.announced_secs != Some(secs_left) {
                        entry.announced_secs = Some(secs_left);
                        pending_changed = true;
                        deltas.push(Delta::DeleteCountdown {
                            id,
                            seconds_left: secs_left,
                            at: now,
                        });
                    }
                }
            }
        }

        if removed_active {
            self.persist_active();
        }
        if removed_past {
            self.persist_past();
        }
        if pending_changed {
            self.persist_pending();
        }
    }

    /// Epoch milliseconds plus a random jitter in 0..1000, rerolled while
    /// the candidate collides with a live id.
    ///
    /// The jitter space only holds 1000 candidates per instant, so the
    /// reroll is bounded: once it is plausibly exhausted the id falls back
    /// to one past the highest live id, which stays time-ordered.
    fn fresh_id(&self, now: DateTime<Utc>) -> i64 {
        const MAX_ROLLS: u32 = 1000;
        let base = now.timestamp_millis();
        let mut rng = rand::thread_rng();
        for _ in 0..MAX_ROLLS {
            let id = base + rng.gen_range(0..1000);
            if !self.id_taken(id) {
                return id;
            }
        }
        let max_live = self
            .active
            .iter()
            .map(|e| e.id)
            .chain(self.past.iter().map(|e| e.id))
            .chain(self.pending.keys().copied())
            .max()
            .unwrap_or(base);
        max_live.max(base) + 1
    }

    fn id_taken(&self, id: i64) -> bool {
        self.active.iter().any(|e| e.id == id)
            || self.past.iter().any(|e| e.id == id)
            || self.pending.contains_key(&id)
    }

    fn sort_active(&mut self) {
        self.active
            .sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
    }

    fn persist_active(&self) {
        if let Err(e) = self.store.save_active(&self.active) {
            log::warn!("failed to persist active events: {e}");
        }
    }

    fn persist_past(&self) {
        if let Err(e) = self.store.save_past(&self.past) {
            log::warn!("failed to persist past events: {e}");
        }
    }

    fn persist_pending(&self) {
        if let Err(e) = self.store.save_pending(&self.pending) {
            log::warn!("failed to persist pending deletes: {e}");
        }
    }
}
