use calassist::error::{interaction_error, AssistantResult};
use calassist::event::EventDetails;
use calassist::interaction::Interaction;
use calassist::session::confirm;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Interaction double that serves replies from a fixed script
struct ScriptedInteraction {
    replies: Mutex<VecDeque<String>>,
}

impl ScriptedInteraction {
    fn new(replies: &[&str]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
        }
    }

    fn exhausted(&self) -> bool {
        self.replies.lock().unwrap().is_empty()
    }
}

impl Interaction for ScriptedInteraction {
    fn ask(&self, _prompt: &str) -> AssistantResult<String> {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| interaction_error("Script ran out of replies"))
    }
}

fn sample_details() -> EventDetails {
    EventDetails {
        summary: Some("Team meeting".to_string()),
        date: Some("2025-06-06".to_string()),
        time: Some("10:00".to_string()),
        location: None,
    }
}

#[test]
fn yes_returns_record_unchanged() {
    let script = ScriptedInteraction::new(&["yes"]);
    let details = sample_details();

    let confirmed = confirm(details.clone(), &script).unwrap();

    assert_eq!(confirmed, details);
    assert!(script.exhausted());
}

#[test]
fn yes_is_case_insensitive() {
    let script = ScriptedInteraction::new(&["YES"]);
    let details = sample_details();

    let confirmed = confirm(details.clone(), &script).unwrap();

    assert_eq!(confirmed, details);
}

#[test]
fn invalid_answers_reprompt_until_yes_or_no() {
    let script = ScriptedInteraction::new(&["maybe", "y", "", "yes"]);
    let details = sample_details();

    let confirmed = confirm(details.clone(), &script).unwrap();

    assert_eq!(confirmed, details);
    assert!(script.exhausted());
}

#[test]
fn no_allows_per_field_replacement() {
    let script = ScriptedInteraction::new(&["no", "Planning sync", "2025-06-09", "14:30", "Room 4"]);

    let confirmed = confirm(sample_details(), &script).unwrap();

    assert_eq!(confirmed.summary.as_deref(), Some("Planning sync"));
    assert_eq!(confirmed.date.as_deref(), Some("2025-06-09"));
    assert_eq!(confirmed.time.as_deref(), Some("14:30"));
    assert_eq!(confirmed.location.as_deref(), Some("Room 4"));
    assert!(script.exhausted());
}

#[test]
fn empty_replies_keep_existing_values() {
    // Only the time changes; the null location stays null
    let script = ScriptedInteraction::new(&["no", "", "", "15:00", ""]);
    let details = sample_details();

    let confirmed = confirm(details.clone(), &script).unwrap();

    assert_eq!(confirmed.summary, details.summary);
    assert_eq!(confirmed.date, details.date);
    assert_eq!(confirmed.time.as_deref(), Some("15:00"));
    assert_eq!(confirmed.location, None);
}

#[test]
fn replacements_are_not_validated_here() {
    // A malformed date is accepted as typed; the write step rejects it
    let script = ScriptedInteraction::new(&["no", "", "not-a-date", "", ""]);

    let confirmed = confirm(sample_details(), &script).unwrap();

    assert_eq!(confirmed.date.as_deref(), Some("not-a-date"));
}
