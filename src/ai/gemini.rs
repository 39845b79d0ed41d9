//! Gemini client - The AI backend behind the agronomist chat.
//!
//! Gemini's `generateContent` endpoint is stateless, so each
//! [`GeminiConversation`] keeps its own turn history and replays it on every
//! call. A turn pair is only committed once the call succeeds.

use crate::{
    config::settings::AgronomistSettings,
    core::chat::{
        AgronomistReply, ChatBackend, ConversationStarter, EMPTY_REPLY, GroundingSource,
    },
    errors::{Error, Result},
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc, time::Duration};
use tokio::sync::Mutex;
use tracing::debug;

/// Public Gemini REST endpoint.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Connection settings for Gemini.
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key sent as `x-goog-api-key`
    pub api_key: String,
    /// Model name (e.g., "gemini-2.5-flash")
    pub model: String,
    /// REST base URL, without trailing slash
    pub base_url: String,
    /// Fixed system instruction for every conversation
    pub system_instruction: String,
    /// Whether to enable the Google Search grounding tool
    pub search_enabled: bool,
    /// HTTP request timeout
    pub timeout: Duration,
    /// Most turns kept in a conversation's history (user and model each count as one)
    pub max_history_turns: usize,
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("search_enabled", &self.search_enabled)
            .field("timeout", &self.timeout)
            .field("max_history_turns", &self.max_history_turns)
            .finish_non_exhaustive()
    }
}

impl GeminiConfig {
    /// Combines file settings with the API key from the environment.
    #[must_use]
    pub fn from_settings(settings: &AgronomistSettings, api_key: String) -> Self {
        Self {
            api_key,
            model: settings.model.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            system_instruction: settings.system_instruction.clone(),
            search_enabled: settings.search_enabled,
            timeout: Duration::from_secs(settings.timeout_secs),
            max_history_turns: settings.max_history_turns,
        }
    }
}

/// Shared HTTP client; cheap to clone.
#[derive(Clone, Debug)]
pub struct GeminiClient {
    http: Client,
    config: Arc<GeminiConfig>,
}

impl GeminiClient {
    /// Builds the client.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if the API key is missing and [`Error::Http`]
    /// if the HTTP client cannot be constructed.
    pub fn new(config: GeminiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(Error::Config {
                message: "Gemini API key is required. Set GEMINI_API_KEY.".to_string(),
            });
        }

        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    /// Model in use.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Opens a fresh conversation with an empty history.
    #[must_use]
    pub fn conversation(&self) -> GeminiConversation {
        GeminiConversation {
            client: self.clone(),
            history: Mutex::new(Vec::new()),
        }
    }

    fn request_for(&self, contents: Vec<Content>) -> GenerateContentRequest {
        GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part::text(&self.config.system_instruction)],
            },
            contents,
            tools: if self.config.search_enabled {
                vec![Tool {
                    google_search: GoogleSearch {},
                }]
            } else {
                Vec::new()
            },
        }
    }

    async fn generate(&self, contents: Vec<Content>) -> Result<GenerateContentResponse> {
        let request = self.request_for(contents);
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        );

        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Error::Agronomist {
                message: format!("Gemini API error ({status}): {body}"),
            });
        }

        Ok(response.json::<GenerateContentResponse>().await?)
    }
}

impl ConversationStarter for GeminiClient {
    fn start_conversation(&self) -> Arc<dyn ChatBackend> {
        Arc::new(self.conversation())
    }
}

/// One multi-turn Gemini chat.
#[derive(Debug)]
pub struct GeminiConversation {
    client: GeminiClient,
    history: Mutex<Vec<Content>>,
}

impl GeminiConversation {
    /// Number of committed turns (user and model each count as one).
    pub async fn turns(&self) -> usize {
        self.history.lock().await.len()
    }
}

#[async_trait]
impl ChatBackend for GeminiConversation {
    async fn send_message(&self, text: &str) -> Result<AgronomistReply> {
        let user_turn = Content {
            role: Some("user".to_string()),
            parts: vec![Part::text(text)],
        };

        let mut contents = self.history.lock().await.clone();
        contents.push(user_turn.clone());
        debug!("Sending {} turns to {}", contents.len(), self.client.model());

        let response = self.client.generate(contents).await?;
        let reply = reply_from_response(&response);

        let answer_turn = model_turn(response, &reply);

        let mut history = self.history.lock().await;
        history.push(user_turn);
        history.push(answer_turn);
        trim_history(&mut history, self.client.config.max_history_turns);

        Ok(reply)
    }
}

/// The model turn to replay on later calls. Only text parts are kept; an
/// answer without any falls back to the text shown to the user so no turn is
/// ever replayed empty.
fn model_turn(response: GenerateContentResponse, reply: &AgronomistReply) -> Content {
    let parts: Vec<Part> = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter(|p| p.text.is_some()).collect())
        .unwrap_or_default();

    Content {
        role: Some("model".to_string()),
        parts: if parts.is_empty() {
            vec![Part::text(&reply.text)]
        } else {
            parts
        },
    }
}

/// Drops the oldest user/model pairs until at most `max_turns` remain.
fn trim_history(history: &mut Vec<Content>, max_turns: usize) {
    let excess = history.len().saturating_sub(max_turns);
    // Whole pairs only, so history always starts with a user turn
    let excess = (excess + excess % 2).min(history.len());
    if excess > 0 {
        debug!("Dropping {excess} oldest turns from agronomist history");
        history.drain(..excess);
    }
}

/// Extracts answer text and citations from the first candidate.
#[must_use]
pub fn reply_from_response(response: &GenerateContentResponse) -> AgronomistReply {
    let Some(candidate) = response.candidates.first() else {
        return AgronomistReply {
            text: EMPTY_REPLY.to_string(),
            sources: Vec::new(),
        };
    };

    let text: String = candidate
        .content
        .iter()
        .flat_map(|c| c.parts.iter())
        .filter_map(|p| p.text.as_deref())
        .collect();

    let sources = candidate
        .grounding_metadata
        .iter()
        .flat_map(|m| m.grounding_chunks.iter())
        .filter_map(|chunk| chunk.web.as_ref())
        .map(|web| GroundingSource {
            title: web.title.clone().unwrap_or_else(|| "Source".to_string()),
            uri: web.uri.clone().unwrap_or_else(|| "#".to_string()),
        })
        .collect();

    AgronomistReply {
        text: if text.is_empty() {
            EMPTY_REPLY.to_string()
        } else {
            text
        },
        sources,
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
}

#[derive(Debug, Serialize)]
struct Tool {
    google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

/// One turn of conversation as Gemini represents it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    /// "user" or "model"; absent for the system instruction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Message parts
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// A piece of a turn. Only text parts are used here.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    /// Text content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Part {
    fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
        }
    }
}

/// Response body of `generateContent`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Candidate answers; only the first is used
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// One candidate answer.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Answer content
    #[serde(default)]
    pub content: Option<Content>,
    /// Search grounding information
    #[serde(default)]
    pub grounding_metadata: Option<GroundingMetadata>,
}

/// Search grounding attached to a candidate.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    /// Retrieved chunks
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
}

/// One retrieved chunk.
#[derive(Debug, Default, Deserialize)]
pub struct GroundingChunk {
    /// Web page the chunk came from
    #[serde(default)]
    pub web: Option<WebChunk>,
}

/// Web citation.
#[derive(Debug, Default, Deserialize)]
pub struct WebChunk {
    /// Page address
    pub uri: Option<String>,
    /// Page title
    pub title: Option<String>,
}
