use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every state change in the tracker produces a Delta.
///
/// `tick()` returns the deltas it produced; the presentation layer applies
/// them (or just repaints from a fresh snapshot) at a single dispatch point.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Delta {
    Created {
        id: i64,
        name: String,
        at: DateTime<Utc>,
    },
    Edited {
        id: i64,
        at: DateTime<Utc>,
    },
    /// The target date passed; the event moved from `active` to `past`.
    Expired {
        id: i64,
        name: String,
        at: DateTime<Utc>,
    },
    /// A soft delete was requested; removal happens at `deadline` unless
    /// undone first.
    DeleteScheduled {
        id: i64,
        deadline: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    /// The visible undo countdown changed its whole-second value.
    DeleteCountdown {
        id: i64,
        seconds_left: i64,
        at: DateTime<Utc>,
    },
    DeleteUndone {
        id: i64,
        at: DateTime<Utc>,
    },
    /// The grace window elapsed; the event is gone for good.
    Removed {
        id: i64,
        at: DateTime<Utc>,
    },
    /// Load-time migration filled in a missing `start` baseline.
    StartBackfilled {
        id: i64,
        at: DateTime<Utc>,
    },
}
