//! Event records, draft validation, and the proximity classifier.
//!
//! A [`CountdownEvent`] is the unit everything else operates on: the tracker
//! owns collections of them, the countdown engine computes display values
//! from them, and the store serializes them as JSON.

use chrono::{DateTime, Local, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::countdown::{ceil_div, MS_PER_DAY};
use crate::error::ValidationError;

/// Date format accepted by the draft validation boundary.
pub const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

/// Proximity tier for an active event.
///
/// Tiers partition the active set by days-until-target: anything closer than
/// a week is `Soon`, up to a month is `Near`, everything beyond is `Far`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Soon,
    Near,
    Far,
}

impl Tier {
    pub fn label(&self) -> &'static str {
        match self {
            Tier::Soon => "soon",
            Tier::Near => "near",
            Tier::Far => "far",
        }
    }
}

/// A countdown event record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountdownEvent {
    /// Unique id: epoch milliseconds at creation plus a random jitter.
    pub id: i64,
    pub name: String,
    /// The target moment. Normalized to local midnight at the validation
    /// boundary.
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub description: String,
    /// Set once at creation.
    pub created_at: DateTime<Utc>,
    /// Baseline for the progress percentage. Legacy records may lack it;
    /// the store back-fills it from `created_at` at load time.
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
}

impl CountdownEvent {
    /// Build a record from a validated draft.
    pub fn new(id: i64, draft: ValidDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            date: draft.date,
            description: draft.description,
            created_at: now,
            start: Some(now),
        }
    }

    /// Whether the target moment has passed.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.date < now
    }

    /// Bucket this event into a proximity tier.
    ///
    /// `diff_days` is the day count rounded up, so an event two hours away
    /// on the next calendar boundary still counts as one day out. Pure and
    /// total for any non-expired event.
    pub fn tier(&self, now: DateTime<Utc>) -> Tier {
        let diff_ms = self.date.signed_duration_since(now).num_milliseconds();
        let diff_days = ceil_div(diff_ms, MS_PER_DAY);
        if diff_days < 7 {
            Tier::Soon
        } else if diff_days <= 30 {
            Tier::Near
        } else {
            Tier::Far
        }
    }
}

/// Raw form payload for creating or editing an event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventDraft {
    pub name: String,
    /// Calendar date string, `%Y-%m-%d`.
    pub date: String,
    #[serde(default)]
    pub description: String,
}

impl EventDraft {
    pub fn new(
        name: impl Into<String>,
        date: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            date: date.into(),
            description: description.into(),
        }
    }

    /// Validate the draft, normalizing the date to local midnight.
    ///
    /// Fails with [`ValidationError::EmptyName`] when the trimmed name is
    /// empty and [`ValidationError::InvalidDate`] when the date does not
    /// parse. A rejected draft leaves no trace anywhere.
    pub fn validate(&self) -> Result<ValidDraft, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let date = parse_target_date(&self.date)?;
        Ok(ValidDraft {
            name: name.to_string(),
            date,
            description: self.description.clone(),
        })
    }
}

/// A draft that passed validation: non-empty name, date pinned to local
/// midnight. Only obtainable through [`EventDraft::validate`].
#[derive(Debug, Clone)]
pub struct ValidDraft {
    pub name: String,
    pub date: DateTime<Utc>,
    pub description: String,
}

/// Parse a `%Y-%m-%d` string into the UTC instant of that local midnight.
fn parse_target_date(input: &str) -> Result<DateTime<Utc>, ValidationError> {
    let date = NaiveDate::parse_from_str(input.trim(), DATE_INPUT_FORMAT).map_err(|_| {
        ValidationError::InvalidDate {
            input: input.to_string(),
            expected: DATE_INPUT_FORMAT,
        }
    })?;
    let midnight = date.and_time(NaiveTime::MIN);
    let local = match Local.from_local_datetime(&midnight) {
        LocalResult::Single(dt) => dt,
        // A DST transition can make local midnight ambiguous or skip it
        // entirely; take the earlier reading, or the UTC reading when the
        // wall time does not exist at all.
        LocalResult::Ambiguous(earlier, _) => earlier,
        LocalResult::None => return Ok(Utc.from_utc_datetime(&midnight)),
    };
    Ok(local.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn future_event(date: DateTime<Utc>) -> CountdownEvent {
        CountdownEvent {
            id: 1,
            name: "launch".into(),
            date,
            description: String::new(),
            created_at: Utc::now(),
            start: None,
        }
    }

    #[test]
    fn ten_days_out_is_near() {
        let now = Utc::now();
        let event = future_event(now + Duration::days(10));
        assert_eq!(event.tier(now), Tier::Near);
    }

    #[test]
    fn two_hours_out_rounds_up_to_one_day_and_is_soon() {
        let now = Utc::now();
        let event = future_event(now + Duration::hours(2));
        assert_eq!(event.tier(now), Tier::Soon);
    }

    #[test]
    fn tier_boundaries() {
        let now = Utc::now();
        // Exactly 7 days rounds to 7 -> near, not soon.
        assert_eq!(future_event(now + Duration::days(7)).tier(now), Tier::Near);
        // 6 days 23 hours still rounds up to 7 -> near.
        assert_eq!(
            future_event(now + Duration::days(6) + Duration::hours(23)).tier(now),
            Tier::Near
        );
        // Exactly 6 days -> soon.
        assert_eq!(
            future_event(now + Duration::days(6)).tier(now),
            Tier::Soon
        );
        assert_eq!(future_event(now + Duration::days(30)).tier(now), Tier::Near);
        assert_eq!(
            future_event(now + Duration::days(30) + Duration::seconds(1)).tier(now),
            Tier::Far
        );
    }

    #[test]
    fn expiry_is_strict() {
        let now = Utc::now();
        assert!(future_event(now - Duration::seconds(1)).is_expired(now));
        assert!(!future_event(now).is_expired(now));
        assert!(!future_event(now + Duration::seconds(1)).is_expired(now));
    }

    #[test]
    fn validate_rejects_empty_name() {
        let draft = EventDraft::new("   ", "2030-05-01", "");
        assert!(matches!(
            draft.validate(),
            Err(ValidationError::EmptyName)
        ));
    }

    #[test]
    fn validate_rejects_bad_date() {
        let draft = EventDraft::new("party", "05/01/2030", "");
        assert!(matches!(
            draft.validate(),
            Err(ValidationError::InvalidDate { .. })
        ));
    }

    #[test]
    fn validate_normalizes_to_local_midnight() {
        let draft = EventDraft::new("  party  ", "2030-05-01", "bring cake");
        let valid = draft.validate().unwrap();
        assert_eq!(valid.name, "party");
        assert_eq!(valid.description, "bring cake");
        let local = valid.date.with_timezone(&Local);
        assert_eq!(local.time(), NaiveTime::MIN);
        assert_eq!(
            local.date_naive(),
            NaiveDate::from_ymd_opt(2030, 5, 1).unwrap()
        );
    }

    #[test]
    fn draft_serde_defaults_description() {
        let draft: EventDraft = serde_json::from_str(r#"{"name":"x","date":"2030-01-01"}"#).unwrap();
        assert_eq!(draft.description, "");
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            // Any future event lands in exactly one tier.
            #[test]
            fn classify_is_total_over_future_events(offset_ms in 1i64..(400 * MS_PER_DAY)) {
                let now = Utc::now();
                let event = future_event(now + Duration::milliseconds(offset_ms));
                let tier = event.tier(now);
                prop_assert!(matches!(tier, Tier::Soon | Tier::Near | Tier::Far));
            }

            // Tiers are monotone in distance: farther away never yields a
            // closer tier.
            #[test]
            fn tiers_are_monotone(a in 1i64..(400 * MS_PER_DAY), b in 1i64..(400 * MS_PER_DAY)) {
                let now = Utc::now();
                let (near_ms, far_ms) = if a <= b { (a, b) } else { (b, a) };
                let rank = |t: Tier| match t {
                    Tier::Soon => 0,
                    Tier::Near => 1,
                    Tier::Far => 2,
                };
                let closer = future_event(now + Duration::milliseconds(near_ms)).tier(now);
                let farther = future_event(now + Duration::milliseconds(far_ms)).tier(now);
                prop_assert!(rank(closer) <= rank(farther));
            }
        }
    }
}
