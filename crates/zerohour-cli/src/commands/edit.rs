use chrono::Utc;
use zerohour_core::EventDraft;

use super::CliResult;

pub fn run(
    id: i64,
    name: Option<String>,
    date: Option<String>,
    description: Option<String>,
    json: bool,
) -> CliResult {
    let (mut tracker, _config) = super::load_tracker()?;
    let Some(prefill) = tracker.begin_edit(id) else {
        return Err(format!("event {id} is not editable (unknown, past, or pending delete)").into());
    };
    let draft = EventDraft::new(
        name.unwrap_or(prefill.name),
        date.unwrap_or(prefill.date),
        description.unwrap_or(prefill.description),
    );
    match tracker.edit(id, &draft, Utc::now())? {
        Some((event, _delta)) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&event)?);
            } else {
                println!("updated {} '{}'", event.id, event.name);
            }
            Ok(())
        }
        None => Err(format!("event {id} is not editable").into()),
    }
}
