pub mod add;
pub mod config;
pub mod delete;
pub mod edit;
pub mod list;
pub mod past;
pub mod show;
pub mod undo;
pub mod watch;

use chrono::Utc;
use zerohour_core::{Config, Store, Tracker};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Open the store and load the tracker, then run one catch-up tick so
/// anything the wall clock settled since the last invocation (passed
/// dates, elapsed grace windows) is resolved before the command acts.
pub fn load_tracker() -> Result<(Tracker, Config), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let store = Store::open()?;
    let (mut tracker, _migrated) = Tracker::load(store, &config, Utc::now());
    tracker.tick(Utc::now());
    Ok((tracker, config))
}
