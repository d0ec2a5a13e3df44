use crate::error::AssistantResult;
use crate::event::EventDetails;
use crate::extraction::ExtractionEngine;
use crate::google_calendar::writer::{CalendarWriter, EventSink};
use crate::interaction::Interaction;
use crate::llm::CompletionClient;
use chrono::{DateTime, Utc};
use chrono_tz::Asia::Kolkata;
use chrono_tz::Tz;
use tracing::info;

const INPUT_PROMPT: &str = "Enter event details :";
const EXIT_SENTINEL: &str = "exit";

/// Interactive REPL: one free-text line per iteration, pushed through
/// extraction, confirmation and the calendar write
pub struct Session<C, S, I> {
    engine: ExtractionEngine<C>,
    writer: CalendarWriter<S>,
    interaction: I,
}

impl<C, S, I> Session<C, S, I>
where
    C: CompletionClient,
    S: EventSink,
    I: Interaction,
{
    pub fn new(engine: ExtractionEngine<C>, writer: CalendarWriter<S>, interaction: I) -> Self {
        Self {
            engine,
            writer,
            interaction,
        }
    }

    /// Run until the exit sentinel. Per-iteration failures never end the
    /// loop; only a broken interaction channel does.
    pub async fn run(&self) -> AssistantResult<()> {
        loop {
            let line = self.interaction.ask(INPUT_PROMPT)?;
            if line.eq_ignore_ascii_case(EXIT_SENTINEL) {
                info!("Exit requested, ending session");
                return Ok(());
            }

            let details = self.engine.extract(&line, now_in_civil_zone()).await;
            if !details.is_usable() {
                println!(
                    "Could not extract sufficient event details. Please provide at least an event title and date."
                );
                continue;
            }

            let details = confirm(details, &self.interaction)?;

            match self.writer.write(&details).await {
                Ok(link) => println!("Event created: {}", link),
                Err(e) => println!("Error creating event: {}", e),
            }
        }
    }
}

/// Reference instant for resolving relative dates
fn now_in_civil_zone() -> DateTime<Tz> {
    Utc::now().with_timezone(&Kolkata)
}

/// Present the extracted fields and let the operator accept them or
/// replace any field; an empty reply keeps the existing value
pub fn confirm<I: Interaction>(
    mut details: EventDetails,
    interaction: &I,
) -> AssistantResult<EventDetails> {
    println!("\nExtracted Event Details:");
    println!("Title: {}", field_or_placeholder(&details.summary));
    println!("Date: {}", field_or_placeholder(&details.date));
    println!("Time: {}", field_or_placeholder(&details.time));
    println!("Location: {}", field_or_placeholder(&details.location));

    let accepted = loop {
        let answer = interaction.ask("Are these details correct? (yes/no)")?;
        if answer.eq_ignore_ascii_case("yes") {
            break true;
        }
        if answer.eq_ignore_ascii_case("no") {
            break false;
        }
        println!("Please enter 'yes' or 'no'.");
    };

    if !accepted {
        details.summary = replace_or_keep(
            interaction.ask("Enter event title (or press Enter to keep unchanged)")?,
            details.summary,
        );
        details.date = replace_or_keep(
            interaction.ask("Enter date (YYYY-MM-DD, or press Enter to keep unchanged)")?,
            details.date,
        );
        details.time = replace_or_keep(
            interaction.ask("Enter time (HH:MM, or press Enter to keep unchanged)")?,
            details.time,
        );
        details.location = replace_or_keep(
            interaction.ask("Enter location (or press Enter to keep unchanged)")?,
            details.location,
        );
    }

    Ok(details)
}

fn field_or_placeholder(field: &Option<String>) -> &str {
    field.as_deref().unwrap_or("Not specified")
}

/// Replacement values are used as typed; no format validation happens
/// here, bad dates or times surface at write time
fn replace_or_keep(reply: String, current: Option<String>) -> Option<String> {
    if reply.is_empty() {
        current
    } else {
        Some(reply)
    }
}
