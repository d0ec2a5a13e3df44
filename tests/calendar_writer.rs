use async_trait::async_trait;
use calassist::error::{google_calendar_error, AssistantResult};
use calassist::event::EventDetails;
use calassist::google_calendar::models::{EventPayload, InsertedEvent};
use calassist::google_calendar::writer::{CalendarWriter, EventSink};
use std::sync::{Arc, Mutex};

/// Sink double that records every payload it receives
#[derive(Clone)]
struct RecordingSink {
    inserted: Arc<Mutex<Vec<EventPayload>>>,
    response: Result<String, String>,
}

impl RecordingSink {
    fn succeeding(link: &str) -> Self {
        Self {
            inserted: Arc::new(Mutex::new(Vec::new())),
            response: Ok(link.to_string()),
        }
    }

    fn failing(error: &str) -> Self {
        Self {
            inserted: Arc::new(Mutex::new(Vec::new())),
            response: Err(error.to_string()),
        }
    }

    fn payloads(&self) -> Vec<EventPayload> {
        self.inserted.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventSink for RecordingSink {
    async fn insert(&self, payload: &EventPayload) -> AssistantResult<InsertedEvent> {
        self.inserted.lock().unwrap().push(payload.clone());
        match &self.response {
            Ok(link) => Ok(InsertedEvent {
                id: Some("evt1".to_string()),
                html_link: Some(link.clone()),
            }),
            Err(e) => Err(google_calendar_error(e)),
        }
    }
}

#[tokio::test]
async fn null_date_is_rejected_without_submitting() {
    let sink = RecordingSink::succeeding("https://calendar.example/evt1");
    let writer = CalendarWriter::new(sink.clone());

    let details = EventDetails {
        summary: Some("Sync".to_string()),
        ..Default::default()
    };

    assert!(writer.write(&details).await.is_err());
    assert!(sink.payloads().is_empty());
}

#[tokio::test]
async fn default_time_and_fixed_duration() {
    let sink = RecordingSink::succeeding("https://calendar.example/evt1");
    let writer = CalendarWriter::new(sink.clone());

    let details = EventDetails {
        summary: Some("Sync".to_string()),
        date: Some("2025-06-02".to_string()),
        time: None,
        location: None,
    };

    writer.write(&details).await.unwrap();

    let payloads = sink.payloads();
    assert_eq!(payloads.len(), 1);
    assert_eq!(payloads[0].summary, "Sync");
    assert_eq!(payloads[0].location, "");
    assert_eq!(payloads[0].start.date_time, "2025-06-02T09:00:00+05:30");
    assert_eq!(payloads[0].end.date_time, "2025-06-02T10:00:00+05:30");
    assert_eq!(payloads[0].start.time_zone, "Asia/Kolkata");
}

#[tokio::test]
async fn end_is_one_hour_after_start_across_midnight() {
    let sink = RecordingSink::succeeding("https://calendar.example/evt1");
    let writer = CalendarWriter::new(sink.clone());

    let details = EventDetails {
        summary: Some("Late sync".to_string()),
        date: Some("2025-06-02".to_string()),
        time: Some("23:30".to_string()),
        location: None,
    };

    writer.write(&details).await.unwrap();

    let payloads = sink.payloads();
    assert_eq!(payloads[0].start.date_time, "2025-06-02T23:30:00+05:30");
    assert_eq!(payloads[0].end.date_time, "2025-06-03T00:30:00+05:30");
}

#[tokio::test]
async fn write_returns_provider_reference_link() {
    let sink = RecordingSink::succeeding("https://calendar.example/evt1");
    let writer = CalendarWriter::new(sink);

    let details = EventDetails {
        summary: Some("Sync".to_string()),
        date: Some("2025-06-02".to_string()),
        ..Default::default()
    };

    let link = writer.write(&details).await.unwrap();
    assert_eq!(link, "https://calendar.example/evt1");
}

#[tokio::test]
async fn malformed_manual_time_aborts_before_submission() {
    let sink = RecordingSink::succeeding("https://calendar.example/evt1");
    let writer = CalendarWriter::new(sink.clone());

    // A manually edited time slips through confirmation unvalidated and
    // must fail here instead of silently defaulting
    let details = EventDetails {
        summary: Some("Sync".to_string()),
        date: Some("2025-06-02".to_string()),
        time: Some("half past nine".to_string()),
        ..Default::default()
    };

    assert!(writer.write(&details).await.is_err());
    assert!(sink.payloads().is_empty());
}

#[tokio::test]
async fn provider_failure_is_reported_without_retry() {
    let sink = RecordingSink::failing("quota exceeded");
    let writer = CalendarWriter::new(sink.clone());

    let details = EventDetails {
        summary: Some("Sync".to_string()),
        date: Some("2025-06-02".to_string()),
        ..Default::default()
    };

    let result = writer.write(&details).await;
    assert!(result.is_err());
    // Exactly one attempt reached the provider
    assert_eq!(sink.payloads().len(), 1);
}
