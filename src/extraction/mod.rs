pub mod fallback;

use crate::error::{extraction_error, AssistantResult};
use crate::event::EventDetails;
use crate::llm::CompletionClient;
use chrono::DateTime;
use chrono_tz::Tz;
use tracing::warn;

const PROMPT_TEMPLATE: &str = "You are a scheduling assistant. Parse the input below to extract event details: title (summary), date (YYYY-MM-DD), time (HH:MM in 24-hour format), and location.
Return the details as a single JSON object with fields: summary, date, time, location.
If any detail is missing or unclear, set it to null.
Interpret dates and times in the Asia/Kolkata timezone (IST, UTC+5:30).
Current date and time: {now}
Input: \"{text}\"
Example output: {\"summary\": \"Team meeting\", \"date\": \"2025-06-02\", \"time\": \"10:00\", \"location\": \"Zoom\"}";

/// Turns one free-text request into an [`EventDetails`] record
pub struct ExtractionEngine<C> {
    client: C,
}

impl<C: CompletionClient> ExtractionEngine<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Extract event details from free text. A failed model attempt falls
    /// back to deterministic heuristic parsing; the returned record may
    /// still be missing fields, which the caller is expected to reject.
    pub async fn extract(&self, text: &str, now: DateTime<Tz>) -> EventDetails {
        match self.model_extract(text, now).await {
            Ok(details) => details,
            Err(e) => {
                warn!(
                    "Model extraction failed: {}. Falling back to heuristic parsing.",
                    e
                );
                fallback::extract(text, now.date_naive())
            }
        }
    }

    /// Single model attempt; any call, parse or validation problem is the
    /// failure variant
    async fn model_extract(&self, text: &str, now: DateTime<Tz>) -> AssistantResult<EventDetails> {
        let prompt = build_prompt(text, now);
        let reply = self.client.complete(&prompt).await?;
        let details = parse_reply(&reply)?;
        if !details.is_usable() {
            return Err(extraction_error("Missing required fields: summary or date"));
        }
        Ok(details)
    }
}

fn build_prompt(text: &str, now: DateTime<Tz>) -> String {
    PROMPT_TEMPLATE
        .replace("{now}", &now.to_rfc3339())
        .replace("{text}", text)
}

/// Parse a model reply into event details, tolerating fenced output
fn parse_reply(reply: &str) -> AssistantResult<EventDetails> {
    let scrubbed = scrub_fences(reply);
    match serde_json::from_str(scrubbed) {
        Ok(details) => Ok(details),
        Err(first_err) => {
            // Some models wrap the object in prose; retry on the outermost braces
            if let (Some(start), Some(end)) = (scrubbed.find('{'), scrubbed.rfind('}')) {
                if start < end {
                    if let Ok(details) = serde_json::from_str(&scrubbed[start..=end]) {
                        return Ok(details);
                    }
                }
            }
            Err(extraction_error(&format!(
                "Invalid JSON in model reply: {}",
                first_err
            )))
        }
    }
}

/// Strip an optional markdown code fence from a model reply
fn scrub_fences(reply: &str) -> &str {
    let trimmed = reply.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix("```").unwrap_or(trimmed);
    trimmed.trim()
}
