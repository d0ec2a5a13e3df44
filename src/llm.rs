use crate::error::{extraction_error, AssistantResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

const TOGETHER_API_URL: &str = "https://api.together.xyz/v1/chat/completions";

/// Output budget for one extraction reply
const MAX_TOKENS: u32 = 200;
const TEMPERATURE: f32 = 0.6;

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Chat-completion collaborator used by the extraction engine
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send one prompt and return the raw model reply
    async fn complete(&self, prompt: &str) -> AssistantResult<String>;
}

/// Together AI chat-completions client
pub struct TogetherClient {
    client: Client,
    api_key: String,
    model: String,
}

impl TogetherClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
        }
    }
}

#[async_trait]
impl CompletionClient for TogetherClient {
    async fn complete(&self, prompt: &str) -> AssistantResult<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(TOGETHER_API_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| extraction_error(&format!("Model request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(extraction_error(&format!(
                "Model request failed: HTTP {} - {}",
                status, error_body
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| extraction_error(&format!("Failed to parse completion response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| extraction_error("Completion response contained no choices"))
    }
}
