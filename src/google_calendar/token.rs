use crate::config::Config;
use crate::error::{google_calendar_error, AssistantResult};
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use tokio::sync::RwLock;
use tracing::{info, warn};
use url::Url;
use uuid::Uuid;

const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const SCOPE: &str = "https://www.googleapis.com/auth/calendar";
const REDIRECT_URI: &str = "http://localhost:8080";

/// Client identity loaded from the Google client secret file
#[derive(Debug, Clone, Deserialize)]
struct ClientSecret {
    installed: InstalledApp,
}

#[derive(Debug, Clone, Deserialize)]
struct InstalledApp {
    client_id: String,
    client_secret: String,
}

/// Owns the OAuth token lifecycle: a JSON blob persisted on disk, refreshed
/// when expired, acquired through an interactive consent flow when absent
pub struct TokenManager {
    client: Client,
    token_file: PathBuf,
    secret: ClientSecret,
    token: RwLock<Option<Value>>,
}

impl TokenManager {
    /// Load the client identity; the token blob itself is read lazily
    pub fn new(config: &Config) -> AssistantResult<Self> {
        let raw = fs::read_to_string(&config.credentials_file).map_err(|e| {
            google_calendar_error(&format!(
                "Failed to read credentials file {}: {}",
                config.credentials_file.display(),
                e
            ))
        })?;
        let secret: ClientSecret = serde_json::from_str(&raw)
            .map_err(|e| google_calendar_error(&format!("Failed to parse credentials file: {}", e)))?;

        Ok(Self {
            client: Client::new(),
            token_file: config.token_file.clone(),
            secret,
            token: RwLock::new(None),
        })
    }

    /// Make sure a usable token exists, running the consent flow if needed
    pub async fn ensure_authorized(&self) -> AssistantResult<()> {
        self.access_token().await.map(|_| ())
    }

    /// Current access token, refreshed or newly acquired as needed
    pub async fn access_token(&self) -> AssistantResult<String> {
        {
            let guard = self.token.read().await;
            if let Some(token) = guard.as_ref() {
                if !is_expired(token) {
                    return access_token_of(token);
                }
            }
        }

        let token = self.acquire().await?;
        let access = access_token_of(&token)?;
        *self.token.write().await = Some(token);
        Ok(access)
    }

    /// Resolve a token from the store, by refresh, or by fresh consent
    async fn acquire(&self) -> AssistantResult<Value> {
        if let Some(stored) = self.load_stored()? {
            if !is_expired(&stored) {
                return Ok(stored);
            }
            if stored.get("refresh_token").and_then(|v| v.as_str()).is_some() {
                match self.refresh(&stored).await {
                    Ok(token) => return Ok(token),
                    Err(e) => warn!("Token refresh failed: {}. Restarting authorization.", e),
                }
            }
        }
        self.run_consent_flow().await
    }

    fn load_stored(&self) -> AssistantResult<Option<Value>> {
        if !self.token_file.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.token_file)?;
        let token = serde_json::from_str(&raw)
            .map_err(|e| google_calendar_error(&format!("Failed to parse stored token: {}", e)))?;
        Ok(Some(token))
    }

    fn persist(&self, token: &Value) -> AssistantResult<()> {
        fs::write(&self.token_file, token.to_string())?;
        Ok(())
    }

    /// Refresh an expired token
    async fn refresh(&self, token: &Value) -> AssistantResult<Value> {
        let refresh_token = token
            .get("refresh_token")
            .and_then(|v| v.as_str())
            .ok_or_else(|| google_calendar_error("No refresh token in token data"))?;

        let params = [
            ("client_id", self.secret.installed.client_id.clone()),
            ("client_secret", self.secret.installed.client_secret.clone()),
            ("refresh_token", refresh_token.to_string()),
            ("grant_type", "refresh_token".to_string()),
        ];

        let response = self
            .client
            .post(TOKEN_URL)
            .form(&params)
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to refresh token: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(google_calendar_error(&format!(
                "Failed to refresh token: HTTP {} - {}",
                status, error_body
            )));
        }

        let new_token: Value = response
            .json()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to parse token response: {}", e)))?;

        let access_token = new_token
            .get("access_token")
            .cloned()
            .ok_or_else(|| google_calendar_error("Token response missing 'access_token' field"))?;

        // Keep the long-lived refresh token alongside the new access token
        let token = json!({
            "access_token": access_token,
            "refresh_token": refresh_token,
            "expires_at": expiry_timestamp(&new_token),
        });

        self.persist(&token)?;
        info!("Refreshed Google Calendar access token");
        Ok(token)
    }

    /// Interactive consent: open the authorization page in a browser, catch
    /// the redirect on a localhost listener, and exchange the code
    async fn run_consent_flow(&self) -> AssistantResult<Value> {
        let state = Uuid::new_v4().to_string();

        let mut auth_url = Url::parse(AUTH_URL)
            .map_err(|e| google_calendar_error(&format!("Failed to parse URL: {}", e)))?;
        auth_url
            .query_pairs_mut()
            .append_pair("client_id", &self.secret.installed.client_id)
            .append_pair("redirect_uri", REDIRECT_URI)
            .append_pair("response_type", "code")
            .append_pair("access_type", "offline")
            .append_pair("prompt", "consent")
            .append_pair("scope", SCOPE)
            .append_pair("state", &state);

        println!("Opening browser for Google Calendar authorization...");
        if webbrowser::open(auth_url.as_str()).is_err() {
            println!("Could not open a browser. Please visit:\n{}", auth_url);
        }

        let server = tiny_http::Server::http("127.0.0.1:8080")
            .map_err(|e| google_calendar_error(&format!("Failed to start callback listener: {}", e)))?;
        println!("Waiting for authorization callback...");

        let request = server
            .recv()
            .map_err(|e| google_calendar_error(&format!("Callback listener error: {}", e)))?;

        let callback = Url::parse(&format!("http://localhost:8080{}", request.url()))
            .map_err(|e| google_calendar_error(&format!("Invalid callback URL: {}", e)))?;
        let code = query_param(&callback, "code")
            .ok_or_else(|| google_calendar_error("No authorization code found in callback"))?;
        let returned_state = query_param(&callback, "state")
            .ok_or_else(|| google_calendar_error("No state parameter found in callback"))?;
        if returned_state != state {
            return Err(google_calendar_error("State mismatch in authorization callback"));
        }

        let response = self
            .client
            .post(TOKEN_URL)
            .form(&[
                ("client_id", self.secret.installed.client_id.clone()),
                ("client_secret", self.secret.installed.client_secret.clone()),
                ("code", code),
                ("redirect_uri", REDIRECT_URI.to_string()),
                ("grant_type", "authorization_code".to_string()),
            ])
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to exchange code: {}", e)))?;

        if !response.status().is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(google_calendar_error(&format!(
                "Failed to get token: {}",
                error_text
            )));
        }

        let mut token: Value = response
            .json()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to parse token response: {}", e)))?;

        let expires_at = expiry_timestamp(&token);
        token
            .as_object_mut()
            .ok_or_else(|| google_calendar_error("Token data is not an object"))?
            .insert("expires_at".to_string(), json!(expires_at));

        self.persist(&token)?;

        let _ = request.respond(tiny_http::Response::from_string(
            "Authorization successful! You can close this window.",
        ));
        println!("Authorization complete; token saved.");

        Ok(token)
    }
}

fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// Absolute expiry for a token response carrying a relative `expires_in`
fn expiry_timestamp(token: &Value) -> i64 {
    let expires_in = token
        .get("expires_in")
        .and_then(|v| v.as_i64())
        .unwrap_or(3600);
    Utc::now().timestamp() + expires_in
}

fn is_expired(token: &Value) -> bool {
    match token.get("expires_at").and_then(|v| v.as_i64()) {
        Some(expiry) => expiry <= Utc::now().timestamp(),
        None => true,
    }
}

fn access_token_of(token: &Value) -> AssistantResult<String> {
    token
        .get("access_token")
        .and_then(|t| t.as_str())
        .map(str::to_string)
        .ok_or_else(|| google_calendar_error("No access token available"))
}
