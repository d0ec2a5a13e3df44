use crate::config::Config;
use crate::error::Error;
use crate::extraction::ExtractionEngine;
use crate::google_calendar::{CalendarWriter, GoogleCalendarSink, TokenManager};
use crate::interaction::ConsolePrompt;
use crate::llm::TogetherClient;
use crate::session::Session;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load and validate the application config
pub fn load_config() -> miette::Result<Config> {
    match Config::load() {
        Ok(config) => Ok(config),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Wire the collaborators and run the interactive session
pub async fn run(config: Config) -> miette::Result<()> {
    println!("Welcome to the Scheduling Assistant");

    // Token acquisition happens once, before the loop; the consent flow
    // may open a browser here
    let tokens = TokenManager::new(&config)?;
    tokens.ensure_authorized().await?;
    info!("Google Calendar authorization ready");

    let client = TogetherClient::new(config.together_api_key.clone(), config.together_model.clone());
    let engine = ExtractionEngine::new(client);

    let sink = GoogleCalendarSink::new(config.calendar_id.clone(), tokens);
    let writer = CalendarWriter::new(sink);

    let session = Session::new(engine, writer, ConsolePrompt);
    session.run().await?;

    info!("Session ended");
    Ok(())
}
