use chrono::{Local, Utc};
use zerohour_core::Outlook;

use super::CliResult;

pub fn run(id: i64, json: bool) -> CliResult {
    let (tracker, config) = super::load_tracker()?;
    let now = Utc::now();
    let Some((event, is_past)) = tracker.find(id) else {
        return Err(format!("no event with id {id}").into());
    };
    let snapshot = tracker.snapshot(now);
    let pending_secs = snapshot
        .active
        .iter()
        .map(|v| (&v.event, v.pending_secs))
        .chain(snapshot.past.iter().map(|v| (&v.event, v.pending_secs)))
        .find(|(e, _)| e.id == id)
        .and_then(|(_, secs)| secs);

    if json {
        let detail = serde_json::json!({
            "event": event,
            "past": is_past,
            "outlook": (!is_past).then(|| Outlook::of(event, now)),
            "pending_secs": pending_secs,
        });
        println!("{}", serde_json::to_string_pretty(&detail)?);
        return Ok(());
    }

    let formatted = event
        .date
        .with_timezone(&Local)
        .format(&config.ui.date_format);
    println!("{}", event.name);
    if event.description.is_empty() {
        println!("No description provided.");
    } else {
        println!("{}", event.description);
    }
    if is_past {
        println!("This event has ended.");
        println!("Ended on {formatted}");
    } else {
        let outlook = Outlook::of(event, now);
        let rate = outlook
            .progress
            .rate
            .map(|r| r.to_string())
            .unwrap_or_else(|| "\u{2014}".into());
        println!("Target: {formatted}");
        println!(
            "{}  ({}% elapsed, {}% left, {})",
            outlook.countdown, outlook.progress.percent, outlook.progress.remaining_percent, rate
        );
    }
    if let Some(secs) = pending_secs {
        println!("Deleting in {secs}s... run `zerohour undo {id}` to keep it.");
    }
    Ok(())
}
