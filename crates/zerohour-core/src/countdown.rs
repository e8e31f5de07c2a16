//! Countdown/progress display engine.
//!
//! Pure calculators mapping (event, now) to display values: remaining time
//! components, completion percentage, and a rate-of-progress estimate. No
//! mutation, no side effects; safe to call at arbitrary frequency (the
//! design rate is 1 Hz).

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::CountdownEvent;

pub const MS_PER_SECOND: i64 = 1_000;
pub const MS_PER_MINUTE: i64 = 60_000;
pub const MS_PER_HOUR: i64 = 3_600_000;
pub const MS_PER_DAY: i64 = 86_400_000;

/// Ceiling division for signed spans; `d` must be positive.
pub(crate) fn ceil_div(n: i64, d: i64) -> i64 {
    let q = n / d;
    if n % d > 0 {
        q + 1
    } else {
        q
    }
}

/// Remaining time to a target, decomposed into whole display units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Countdown {
    /// Decompose `target - now` by truncating division.
    ///
    /// A negative remainder is clamped to zero: the expiration sweep is
    /// responsible for migrating expired events before this runs.
    pub fn until(target: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let diff = target.signed_duration_since(now).num_milliseconds().max(0);
        Self {
            days: diff / MS_PER_DAY,
            hours: (diff % MS_PER_DAY) / MS_PER_HOUR,
            minutes: (diff % MS_PER_HOUR) / MS_PER_MINUTE,
            seconds: (diff % MS_PER_MINUTE) / MS_PER_SECOND,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.days == 0 && self.hours == 0 && self.minutes == 0 && self.seconds == 0
    }
}

/// Zero-pad to two digits, three once the value outgrows them.
fn pad(value: i64) -> String {
    if value > 99 {
        format!("{value:03}")
    } else {
        format!("{value:02}")
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}d {}:{}:{}",
            pad(self.days),
            pad(self.hours),
            pad(self.minutes),
            pad(self.seconds)
        )
    }
}

/// Rate-of-progress estimate: how much of the remaining percentage burns
/// down per day (or per hour, inside the final day).
///
/// A display heuristic, not a forecast -- recomputed from scratch every
/// tick, no smoothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rate {
    PerDay(f64),
    PerHour(f64),
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rate::PerDay(r) => write!(f, "\u{2248} {r:.2}%/day"),
            Rate::PerHour(r) => write!(f, "\u{2248} {r:.2}%/hr"),
        }
    }
}

/// Completion percentage between an event's start baseline and its target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    /// Elapsed fraction of the start-to-target span, 0..=100.
    pub percent: u8,
    pub remaining_percent: u8,
    /// `None` once the target has passed; rendered as a placeholder.
    pub rate: Option<Rate>,
}

impl Progress {
    pub fn of(event: &CountdownEvent, now: DateTime<Utc>) -> Self {
        let start = event.start.unwrap_or(event.created_at);
        let total_ms = event.date.signed_duration_since(start).num_milliseconds();

        // A degenerate span never divides.
        let percent = if total_ms <= 0 {
            0
        } else {
            let elapsed_ms = now.signed_duration_since(start).num_milliseconds() as f64;
            (elapsed_ms / total_ms as f64 * 100.0).round().clamp(0.0, 100.0) as u8
        };
        let remaining_percent = 100 - percent;

        let remaining_ms = event.date.signed_duration_since(now).num_milliseconds();
        let rate = if remaining_ms <= 0 {
            None
        } else {
            let days_left = remaining_ms as f64 / MS_PER_DAY as f64;
            if days_left >= 1.0 {
                Some(Rate::PerDay(remaining_percent as f64 / days_left))
            } else {
                let mut hours_left = remaining_ms as f64 / MS_PER_HOUR as f64;
                if hours_left == 0.0 {
                    hours_left = 1.0;
                }
                Some(Rate::PerHour(remaining_percent as f64 / hours_left))
            }
        };

        Self {
            percent,
            remaining_percent,
            rate,
        }
    }
}

/// The full per-event display bundle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Outlook {
    pub countdown: Countdown,
    pub progress: Progress,
}

impl Outlook {
    pub fn of(event: &CountdownEvent, now: DateTime<Utc>) -> Self {
        Self {
            countdown: Countdown::until(event.date, now),
            progress: Progress::of(event, now),
        }
    }
}
