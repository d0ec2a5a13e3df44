use serde::{Deserialize, Serialize};

/// Event insert payload in the calendar API's wire shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventPayload {
    pub summary: String,
    pub location: String,
    pub start: EventDateTime,
    pub end: EventDateTime,
}

/// Start or end instant of an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventDateTime {
    #[serde(rename = "dateTime")]
    pub date_time: String,
    #[serde(rename = "timeZone")]
    pub time_zone: String,
}

/// Subset of the insert response the assistant reports back
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InsertedEvent {
    pub id: Option<String>,
    #[serde(rename = "htmlLink")]
    pub html_link: Option<String>,
}
