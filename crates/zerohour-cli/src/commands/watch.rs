use chrono::{Local, Utc};
use zerohour_core::Delta;

use super::CliResult;

/// The single dispatch point: tick the tracker, then hand the resulting
/// deltas and a fresh snapshot to the renderer.
pub fn run(ticks: Option<u64>, json: bool) -> CliResult {
    let (mut tracker, config) = super::load_tracker()?;
    let interval = std::time::Duration::from_secs(config.tick_secs.max(1));

    let mut count: u64 = 0;
    loop {
        let now = Utc::now();
        let deltas = tracker.tick(now);
        let snapshot = tracker.snapshot(now);

        if json {
            for delta in &deltas {
                println!("{}", serde_json::to_string(delta)?);
            }
            println!("{}", serde_json::to_string(&snapshot)?);
        } else {
            println!("-- {} --", now.with_timezone(&Local).format("%H:%M:%S"));
            super::list::print_board(&snapshot);
            for delta in &deltas {
                match delta {
                    Delta::Expired { id, name, .. } => {
                        println!("event {id} '{name}' has ended and moved to past");
                    }
                    Delta::Removed { id, .. } => {
                        println!("event {id} permanently removed");
                    }
                    _ => {}
                }
            }
        }

        count += 1;
        if let Some(limit) = ticks {
            if count >= limit {
                break;
            }
        }
        std::thread::sleep(interval);
    }
    Ok(())
}
