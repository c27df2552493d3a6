// src/modules/quest/form.rs
// Raw posting-form input and its validation into a normalized draft

use chrono::{DateTime, Duration, Local, NaiveDateTime, TimeZone, Utc};

use crate::error::ValidationErrors;
use super::Urgency;

pub const DEADLINE_INPUT_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Fallback window when a deadline has already passed at commit time.
pub const DEADLINE_FALLBACK_HOURS: i64 = 3;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuestForm {
    pub title: String,
    pub description: String,
    pub deadline: String,
    pub reward: String,
    pub urgency: Urgency,
    pub location: String,
}

/// Validated posting input, ready for the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestDraft {
    pub title: String,
    pub description: String,
    pub reward: i64,
    pub urgency: Urgency,
    pub deadline: DateTime<Utc>,
    pub location: Option<String>,
}

impl QuestForm {
    /// Collects every field error at once rather than stopping at the first.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<QuestDraft, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let title = self.title.trim();
        if title.is_empty() {
            errors.add("title", "Task name is required");
        }

        let description = self.description.trim();
        if description.is_empty() {
            errors.add("description", "Task details are required");
        }

        let deadline = if self.deadline.trim().is_empty() {
            errors.add("deadline", "Deadline is required");
            None
        } else {
            match parse_deadline_input(&self.deadline) {
                Some(d) if d > now => Some(d),
                _ => {
                    errors.add("deadline", "Deadline must be in the future");
                    None
                }
            }
        };

        let reward = match self.reward.trim().parse::<i64>() {
            Ok(r) if r > 0 => Some(r),
            _ => {
                errors.add("reward", "Bounty is required");
                None
            }
        };

        match (deadline, reward) {
            (Some(deadline), Some(reward)) if errors.is_empty() => Ok(QuestDraft {
                title: title.to_string(),
                description: description.to_string(),
                reward,
                urgency: self.urgency,
                deadline,
                location: Some(self.location.trim())
                    .filter(|l| !l.is_empty())
                    .map(str::to_string),
            }),
            _ => Err(errors),
        }
    }
}

/// Local wall-clock `YYYY-MM-DD HH:MM` to UTC. Ambiguous DST times take the earlier instant.
pub fn parse_deadline_input(input: &str) -> Option<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(input.trim(), DEADLINE_INPUT_FORMAT).ok()?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// An already-elapsed deadline becomes three hours from `now`.
pub fn resolve_deadline(requested: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    if requested > now {
        requested
    } else {
        now + Duration::hours(DEADLINE_FALLBACK_HOURS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn future_input(hours: i64) -> String {
        (Local::now() + Duration::hours(hours))
            .format(DEADLINE_INPUT_FORMAT)
            .to_string()
    }

    fn valid_form() -> QuestForm {
        QuestForm {
            title: "  Hold Canteen Line ".into(),
            description: "Stand in the lunch queue for me for 20 mins.".into(),
            deadline: future_input(5),
            reward: "150".into(),
            urgency: Urgency::Urgent,
            location: "".into(),
        }
    }

    #[test]
    fn test_valid_form_normalizes() {
        let draft = valid_form().validate(Utc::now()).unwrap();
        assert_eq!(draft.title, "Hold Canteen Line");
        assert_eq!(draft.reward, 150);
        assert_eq!(draft.urgency, Urgency::Urgent);
        assert_eq!(draft.location, None);
        assert!(draft.deadline > Utc::now());
    }

    #[test]
    fn test_empty_form_reports_every_field() {
        let errors = QuestForm::default().validate(Utc::now()).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert_eq!(errors.get("title"), Some("Task name is required"));
        assert_eq!(errors.get("description"), Some("Task details are required"));
        assert_eq!(errors.get("deadline"), Some("Deadline is required"));
        assert_eq!(errors.get("reward"), Some("Bounty is required"));
    }

    #[test]
    fn test_non_positive_or_garbage_reward_rejected() {
        for reward in ["0", "-20", "abc", "12.5"] {
            let form = QuestForm { reward: reward.into(), ..valid_form() };
            let errors = form.validate(Utc::now()).unwrap_err();
            assert_eq!(errors.get("reward"), Some("Bounty is required"), "reward {reward}");
        }
    }

    #[test]
    fn test_past_or_unparseable_deadline_rejected() {
        for deadline in [future_input(-2), "tomorrow-ish".to_string()] {
            let form = QuestForm { deadline, ..valid_form() };
            let errors = form.validate(Utc::now()).unwrap_err();
            assert_eq!(errors.get("deadline"), Some("Deadline must be in the future"));
            assert_eq!(errors.len(), 1);
        }
    }

    #[test]
    fn test_resolve_deadline_falls_back_when_elapsed() {
        let now = Utc::now();
        let future = now + Duration::hours(10);
        assert_eq!(resolve_deadline(future, now), future);

        let past = now - Duration::minutes(1);
        assert_eq!(resolve_deadline(past, now), now + Duration::hours(3));
        assert_eq!(resolve_deadline(now, now), now + Duration::hours(3));
    }
}
