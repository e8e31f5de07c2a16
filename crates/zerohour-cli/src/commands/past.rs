use chrono::{Local, Utc};

use super::CliResult;

pub fn run(json: bool) -> CliResult {
    let (tracker, config) = super::load_tracker()?;
    let snapshot = tracker.snapshot(Utc::now());
    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot.past)?);
        return Ok(());
    }
    if snapshot.past.is_empty() {
        println!("No past events yet.");
        return Ok(());
    }
    for view in &snapshot.past {
        let ended = view
            .event
            .date
            .with_timezone(&Local)
            .format(&config.ui.date_format);
        let mut line = format!(
            "  {:<14} {:<24} Ended on {}",
            view.event.id, view.event.name, ended
        );
        if let Some(secs) = view.pending_secs {
            line.push_str(&format!("  [deleting in {secs}s, undo available]"));
        }
        println!("{line}");
    }
    Ok(())
}
