use crate::error::{config_error, env_error, AssistantResult};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

/// Default chat model used for event extraction
pub const DEFAULT_MODEL: &str = "meta-llama/Llama-3.3-70B-Instruct-Turbo-Free";

/// Main configuration structure for the assistant
#[derive(Debug, Clone)]
pub struct Config {
    /// Together AI API key for the extraction model
    pub together_api_key: String,
    /// Chat model used for event extraction
    pub together_model: String,
    /// Path to the Google OAuth client secret JSON file
    pub credentials_file: PathBuf,
    /// Path to the persisted OAuth token blob
    pub token_file: PathBuf,
    /// Calendar that receives the created events
    pub calendar_id: String,
}

impl Config {
    /// Load configuration from the environment
    pub fn load() -> AssistantResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        // Required environment variables
        let together_api_key =
            env::var("TOGETHER_API_KEY").map_err(|_| env_error("TOGETHER_API_KEY"))?;
        let credentials_file = env::var("GOOGLE_CREDENTIALS_FILE")
            .map(PathBuf::from)
            .map_err(|_| env_error("GOOGLE_CREDENTIALS_FILE"))?;

        // The consent flow must not start without a client secret on disk
        if !credentials_file.exists() {
            return Err(config_error(&format!(
                "Credentials file not found: {}",
                credentials_file.display()
            )));
        }

        let together_model =
            env::var("TOGETHER_MODEL").unwrap_or_else(|_| String::from(DEFAULT_MODEL));
        let token_file = env::var("TOKEN_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("token.json"));
        let calendar_id =
            env::var("GOOGLE_CALENDAR_ID").unwrap_or_else(|_| String::from("primary"));

        Ok(Config {
            together_api_key,
            together_model,
            credentials_file,
            token_file,
            calendar_id,
        })
    }
}
