use crate::error::{google_calendar_error, AssistantResult};
use crate::event::EventDetails;
use crate::google_calendar::models::{EventDateTime, EventPayload, InsertedEvent};
use crate::google_calendar::time::{compose_start, event_end, DEFAULT_START_TIME, TIME_ZONE};
use crate::google_calendar::token::TokenManager;
use async_trait::async_trait;
use reqwest::Client;
use tracing::info;

const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3/calendars";

/// Calendar collaborator that receives one insert per confirmed record
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn insert(&self, payload: &EventPayload) -> AssistantResult<InsertedEvent>;
}

/// Real sink posting to the Google Calendar API
pub struct GoogleCalendarSink {
    client: Client,
    calendar_id: String,
    tokens: TokenManager,
}

impl GoogleCalendarSink {
    pub fn new(calendar_id: String, tokens: TokenManager) -> Self {
        Self {
            client: Client::new(),
            calendar_id,
            tokens,
        }
    }
}

#[async_trait]
impl EventSink for GoogleCalendarSink {
    async fn insert(&self, payload: &EventPayload) -> AssistantResult<InsertedEvent> {
        let access_token = self.tokens.access_token().await?;
        let url = format!("{}/{}/events", CALENDAR_API_BASE, self.calendar_id);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", access_token))
            .json(payload)
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to create event: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(google_calendar_error(&format!(
                "Failed to create event: HTTP {} - {}",
                status, error_body
            )));
        }

        let inserted: InsertedEvent = response
            .json()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to parse insert response: {}", e)))?;

        info!(event_id = inserted.id.as_deref(), "Created calendar event");
        Ok(inserted)
    }
}

/// Maps one confirmed record into a single calendar insert
pub struct CalendarWriter<S> {
    sink: S,
}

impl<S: EventSink> CalendarWriter<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    /// Submit one event; returns the provider's reference link. A failed
    /// submission is reported as-is, never retried.
    pub async fn write(&self, details: &EventDetails) -> AssistantResult<String> {
        let payload = build_payload(details)?;
        let inserted = self.sink.insert(&payload).await?;
        Ok(inserted
            .html_link
            .or(inserted.id)
            .unwrap_or_else(|| "(no reference link returned)".to_string()))
    }
}

/// Build the insert payload: default start time, fixed one-hour duration,
/// placeholder title for untitled records
pub fn build_payload(details: &EventDetails) -> AssistantResult<EventPayload> {
    let date = details
        .date
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .ok_or_else(|| google_calendar_error("Date is required to create an event"))?;

    let time = details.time.as_deref().unwrap_or(DEFAULT_START_TIME);
    let start = compose_start(date, time)?;
    let end = event_end(start);

    Ok(EventPayload {
        summary: details
            .summary
            .clone()
            .unwrap_or_else(|| "Untitled Event".to_string()),
        location: details.location.clone().unwrap_or_default(),
        start: EventDateTime {
            date_time: start.to_rfc3339(),
            time_zone: TIME_ZONE.to_string(),
        },
        end: EventDateTime {
            date_time: end.to_rfc3339(),
            time_zone: TIME_ZONE.to_string(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_payload_requires_date() {
        let details = EventDetails {
            summary: Some("Sync".to_string()),
            ..Default::default()
        };
        assert!(build_payload(&details).is_err());

        let blank_date = EventDetails {
            summary: Some("Sync".to_string()),
            date: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(build_payload(&blank_date).is_err());
    }

    #[test]
    fn test_build_payload_defaults() {
        let details = EventDetails {
            summary: None,
            date: Some("2025-06-02".to_string()),
            time: None,
            location: None,
        };
        let payload = build_payload(&details).unwrap();
        assert_eq!(payload.summary, "Untitled Event");
        assert_eq!(payload.location, "");
        assert_eq!(payload.start.date_time, "2025-06-02T09:00:00+05:30");
        assert_eq!(payload.end.date_time, "2025-06-02T10:00:00+05:30");
        assert_eq!(payload.start.time_zone, "Asia/Kolkata");
        assert_eq!(payload.end.time_zone, "Asia/Kolkata");
    }

    #[test]
    fn test_build_payload_rejects_bad_time() {
        let details = EventDetails {
            summary: Some("Sync".to_string()),
            date: Some("2025-06-02".to_string()),
            time: Some("7 pm".to_string()),
            ..Default::default()
        };
        assert!(build_payload(&details).is_err());
    }
}
