use chrono::Utc;
use zerohour_core::{Snapshot, Tier};

use super::CliResult;

pub fn run(json: bool) -> CliResult {
    let (tracker, _config) = super::load_tracker()?;
    let snapshot = tracker.snapshot(Utc::now());
    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot.active)?);
    } else {
        print_board(&snapshot);
    }
    Ok(())
}

/// Tier-grouped board of active events; shared with the watch loop.
pub(super) fn print_board(snapshot: &Snapshot) {
    if snapshot.active.is_empty() {
        println!("No countdowns yet. Add one to get started!");
        return;
    }
    for tier in [Tier::Soon, Tier::Near, Tier::Far] {
        let views: Vec<_> = snapshot.by_tier(tier).collect();
        if views.is_empty() {
            continue;
        }
        println!("{}", tier.label().to_uppercase());
        for view in views {
            let rate = view
                .outlook
                .progress
                .rate
                .map(|r| r.to_string())
                .unwrap_or_else(|| "\u{2014}".into());
            let mut line = format!(
                "  {:<14} {:<24} {}  {:>3}% elapsed, {}% left, {}",
                view.event.id,
                view.event.name,
                view.outlook.countdown,
                view.outlook.progress.percent,
                view.outlook.progress.remaining_percent,
                rate,
            );
            if let Some(secs) = view.pending_secs {
                line.push_str(&format!("  [deleting in {secs}s, undo available]"));
            }
            println!("{line}");
        }
        println!();
    }
}
