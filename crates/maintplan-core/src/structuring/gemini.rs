//! [`PlanStructurer`] backed by the Gemini `generateContent` REST method.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info};

use super::error::{FailureKind, StructuringError};
use super::prompt::build_prompt;
use super::response::{ResponseError, parse_plan_response};
use super::trait_def::PlanStructurer;
use crate::config::ModelConfig;
use crate::plan::OrganizedPlan;

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Response format hint sent in `generationConfig`.
const JSON_MIME_TYPE: &str = "application/json";

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate, if there is any text.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.is_empty() { None } else { Some(text) }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Everything that can go wrong in one Gemini round trip.
#[derive(Debug, Error)]
enum GeminiError {
    #[error("request to model service failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("model service returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("model service returned an unreadable envelope: {0}")]
    Envelope(#[source] serde_json::Error),

    #[error(transparent)]
    Response(#[from] ResponseError),
}

impl GeminiError {
    fn kind(&self) -> FailureKind {
        match self {
            Self::Transport(_) | Self::Status { .. } => FailureKind::Transport,
            Self::Envelope(_) => FailureKind::MalformedJson,
            Self::Response(e) => e.kind(),
        }
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Structures plans by calling a hosted Gemini model.
pub struct GeminiStructurer {
    client: reqwest::Client,
    config: ModelConfig,
}

impl GeminiStructurer {
    pub fn new(config: ModelConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Use a preconfigured HTTP client (proxy, timeouts, TLS settings).
    pub fn with_client(config: ModelConfig, client: reqwest::Client) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    async fn request_plan(&self, text: &str) -> Result<OrganizedPlan, GeminiError> {
        let prompt = build_prompt(text);
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: &prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: JSON_MIME_TYPE,
            },
        };

        let url = self.config.generate_content_url();
        debug!(%url, prompt_len = prompt.len(), "sending generateContent request");

        let resp = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let raw = resp.text().await?;
        debug!(%status, body_len = raw.len(), "received generateContent response");

        if !status.is_success() {
            return Err(GeminiError::Status { status, body: raw });
        }

        let envelope: GenerateContentResponse = if raw.trim().is_empty() {
            GenerateContentResponse::default()
        } else {
            serde_json::from_str(&raw).map_err(GeminiError::Envelope)?
        };

        Ok(parse_plan_response(envelope.text().as_deref())?)
    }
}

#[async_trait]
impl PlanStructurer for GeminiStructurer {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn structure(&self, text: &str) -> Result<OrganizedPlan, StructuringError> {
        match self.request_plan(text).await {
            Ok(plan) => {
                info!(
                    model = %self.config.model,
                    tasks = plan.planning.len(),
                    volunteers = plan.volunteers.len(),
                    "plan structured"
                );
                Ok(plan)
            }
            Err(e) => {
                error!(
                    model = %self.config.model,
                    kind = %e.kind(),
                    error = %e,
                    "error calling or parsing model response"
                );
                Err(StructuringError::new(e.kind()))
            }
        }
    }
}
