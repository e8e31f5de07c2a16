use chrono::Utc;

use super::CliResult;

pub fn run(id: i64) -> CliResult {
    let (mut tracker, _config) = super::load_tracker()?;
    match tracker.undo_delete(id, Utc::now()) {
        Some(_) => {
            println!("delete cancelled; event {id} kept");
            Ok(())
        }
        None => Err(format!("nothing to undo for id {id} (window may have elapsed)").into()),
    }
}
