use calassist::startup;
use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting scheduling assistant");

    // Load configuration; missing settings end the process here
    let config = startup::load_config()?;

    // Run the interactive session
    startup::run(config).await
}
