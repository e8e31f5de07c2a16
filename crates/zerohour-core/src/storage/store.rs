//! SQLite-backed key-value persistence for the event collections.
//!
//! Three named slots hold JSON values: the active list, the past list, and
//! the pending-delete map. Every save writes the full serialized value (no
//! diffing); every load of an absent or unparseable slot yields an empty
//! collection. Decoding the lists is per-record lenient: one malformed
//! record is skipped with a warning and never aborts its siblings.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rusqlite::{params, Connection};
use serde::Serialize;

use crate::error::{Result, StoreError};
use crate::event::CountdownEvent;
use crate::tracker::PendingDelete;

/// Slot holding the active list. Mirrors the original storage key.
pub const ACTIVE_SLOT: &str = "countdown_events";
/// Slot holding the past list.
pub const PAST_SLOT: &str = "past_countdown_events";
/// Slot holding pending-delete deadlines, so an undo window survives
/// process restarts.
pub const PENDING_SLOT: &str = "pending_deletes";

/// SQLite database holding the kv slots.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open the store at `<data_dir>/zerohour.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    pub fn open() -> Result<Self> {
        let path = super::data_dir()?.join("zerohour.db");
        Self::open_at(&path)
    }

    /// Open the store at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self { conn };
        store.migrate().map_err(StoreError::from)?;
        Ok(store)
    }

    /// Open an in-memory store (for tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| StoreError::OpenFailed {
            path: PathBuf::from(":memory:"),
            source,
        })?;
        let store = Self { conn };
        store.migrate().map_err(StoreError::from)?;
        Ok(store)
    }

    fn migrate(&self) -> rusqlite::Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )
    }

    pub fn load_active(&self) -> Vec<CountdownEvent> {
        self.load_events(ACTIVE_SLOT)
    }

    pub fn load_past(&self) -> Vec<CountdownEvent> {
        self.load_events(PAST_SLOT)
    }

    pub fn save_active(&self, events: &[CountdownEvent]) -> Result<(), StoreError> {
        self.save_slot(ACTIVE_SLOT, &events)
    }

    pub fn save_past(&self, events: &[CountdownEvent]) -> Result<(), StoreError> {
        self.save_slot(PAST_SLOT, &events)
    }

    pub fn load_pending(&self) -> HashMap<i64, PendingDelete> {
        let Some(raw) = self.read_slot(PENDING_SLOT) else {
            return HashMap::new();
        };
        match serde_json::from_str(&raw) {
            Ok(map) => map,
            Err(e) => {
                log::warn!("unparseable '{PENDING_SLOT}' slot, starting empty: {e}");
                HashMap::new()
            }
        }
    }

    pub fn save_pending(&self, pending: &HashMap<i64, PendingDelete>) -> Result<(), StoreError> {
        self.save_slot(PENDING_SLOT, pending)
    }

    fn load_events(&self, slot: &str) -> Vec<CountdownEvent> {
        let Some(raw) = self.read_slot(slot) else {
            return Vec::new();
        };
        let values: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(values) => values,
            Err(e) => {
                log::warn!("unparseable '{slot}' slot, starting empty: {e}");
                return Vec::new();
            }
        };
        values
            .into_iter()
            .filter_map(|value| match serde_json::from_value(value) {
                Ok(event) => Some(event),
                Err(e) => {
                    log::warn!("skipping malformed record in '{slot}': {e}");
                    None
                }
            })
            .collect()
    }

    fn read_slot(&self, slot: &str) -> Option<String> {
        match self.kv_get(slot) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("failed to read '{slot}' slot: {e}");
                None
            }
        }
    }

    fn save_slot<T: Serialize>(&self, slot: &str, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string(value)?;
        self.kv_set(slot, &json).map_err(StoreError::from)
    }

    fn kv_get(&self, key: &str) -> rusqlite::Result<Option<String>> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn kv_set(&self, key: &str, value: &str) -> rusqlite::Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Make every subsequent read and write fail, simulating a store that
    /// went bad mid-session.
    #[cfg(test)]
    pub(crate) fn break_writes(&self) {
        self.conn
            .execute_batch("DROP TABLE kv;")
            .expect("drop kv table");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn event(id: i64, name: &str) -> CountdownEvent {
        let now = Utc::now();
        CountdownEvent {
            id,
            name: name.into(),
            date: now + Duration::days(10),
            description: "notes".into(),
            created_at: now,
            start: Some(now),
        }
    }

    #[test]
    fn absent_slots_load_empty() {
        let store = Store::open_in_memory().unwrap();
        assert!(store.load_active().is_empty());
        assert!(store.load_past().is_empty());
        assert!(store.load_pending().is_empty());
    }

    #[test]
    fn active_and_past_round_trip() {
        let store = Store::open_in_memory().unwrap();
        let active = vec![event(1, "a"), event(2, "b")];
        let past = vec![event(3, "c")];
        store.save_active(&active).unwrap();
        store.save_past(&past).unwrap();
        assert_eq!(store.load_active(), active);
        assert_eq!(store.load_past(), past);
    }

    #[test]
    fn malformed_record_is_skipped_not_fatal() {
        let store = Store::open_in_memory().unwrap();
        let good = serde_json::to_value(event(1, "good")).unwrap();
        let raw = serde_json::to_string(&vec![
            good,
            serde_json::json!({"id": "not-a-number", "name": 3}),
        ])
        .unwrap();
        store.kv_set(ACTIVE_SLOT, &raw).unwrap();

        let loaded = store.load_active();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "good");
    }

    #[test]
    fn unparseable_slot_loads_empty() {
        let store = Store::open_in_memory().unwrap();
        store.kv_set(ACTIVE_SLOT, "not json at all").unwrap();
        assert!(store.load_active().is_empty());
    }

    #[test]
    fn pending_map_round_trips_through_json() {
        let store = Store::open_in_memory().unwrap();
        let raw = r#"{"42":{"deadline":"2030-01-01T00:00:05Z","from_past":false}}"#;
        store.kv_set(PENDING_SLOT, raw).unwrap();
        let pending = store.load_pending();
        assert!(pending.contains_key(&42));
        store.save_pending(&pending).unwrap();
        assert_eq!(store.load_pending().len(), 1);
    }
}
