//! # Zerohour Core Library
//!
//! Core logic for the zerohour countdown-event tracker. All operations are
//! available through this library; the CLI binary is a thin presentation
//! layer over it.
//!
//! ## Architecture
//!
//! - **Tracker**: a wall-clock state machine owning the `active` and `past`
//!   collections; the caller periodically invokes `tick(now)` to run the
//!   expiration sweep and pending-delete processing
//! - **Countdown engine**: pure calculators mapping (event, now) to
//!   remaining time, completion percentage, and a rate estimate
//! - **Storage**: SQLite key-value slots for the collections and TOML-based
//!   configuration
//! - **Deltas**: every state change produces a [`Delta`] the presentation
//!   layer can react to
//!
//! ## Key Components
//!
//! - [`Tracker`]: lifecycle state machine and collection owner
//! - [`CountdownEvent`]: the event record
//! - [`Outlook`]: the per-event display bundle
//! - [`Store`] / [`Config`]: persistence

pub mod countdown;
pub mod delta;
pub mod error;
pub mod event;
pub mod storage;
pub mod tracker;

pub use countdown::{Countdown, Outlook, Progress, Rate};
pub use delta::Delta;
pub use error::{ConfigError, CoreError, StoreError, ValidationError};
pub use event::{CountdownEvent, EventDraft, Tier, ValidDraft};
pub use storage::{Config, Store};
pub use tracker::{ActiveView, PastView, PendingDelete, Snapshot, Tracker};
