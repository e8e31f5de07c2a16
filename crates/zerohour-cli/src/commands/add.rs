use chrono::{Local, Utc};
use zerohour_core::EventDraft;

use super::CliResult;

pub fn run(name: &str, date: &str, description: &str, json: bool) -> CliResult {
    let (mut tracker, _config) = super::load_tracker()?;
    let draft = EventDraft::new(name, date, description);
    let (event, _delta) = tracker.create(&draft, Utc::now())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&event)?);
    } else {
        println!(
            "added {} '{}' targeting {}",
            event.id,
            event.name,
            event.date.with_timezone(&Local).format("%Y-%m-%d")
        );
    }
    Ok(())
}
