use chrono::{Local, Utc};
use zerohour_core::Delta;

use super::CliResult;

pub fn run(id: i64) -> CliResult {
    let (mut tracker, config) = super::load_tracker()?;
    match tracker.request_delete(id, Utc::now()) {
        Some(Delta::DeleteScheduled { deadline, .. }) => {
            println!(
                "event {id} will be removed at {}; run `zerohour undo {id}` within {}s to keep it",
                deadline.with_timezone(&Local).format("%H:%M:%S"),
                config.grace_secs
            );
            Ok(())
        }
        _ => Err(format!("nothing to delete for id {id}").into()),
    }
}
