//! Gemini client for plan generation and support chat.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{ChatResponder, PlanGenerator};
use crate::{
    config::GeneratorConfig,
    error::{ArchitectError, HttpResultExt, Result},
    models::{ChatMessage, Plan},
};

const ARCHITECT_INSTRUCTION: &str = "You are an automation architect. Turn the user's \
     description into a workflow plan: a short name and an ordered list of steps. Each step \
     has a unique id, a type of trigger, condition or action, a concise title and a one \
     sentence description. Respond with JSON only.";

const SUPPORT_INSTRUCTION: &str = "You are the support assistant of Glacier, an automation \
     platform. Answer briefly and helpfully. If you do not know an answer, say so and suggest \
     contacting the support team.";

/// Client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    client: reqwest::Client,
    config: GeneratorConfig,
    api_key: String,
}

impl GeminiClient {
    /// Creates a client with an explicit API key.
    ///
    /// # Errors
    ///
    /// Returns `ArchitectError::Http` if the HTTP client cannot be built.
    pub fn new(config: GeneratorConfig, api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .http_context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            config,
            api_key: api_key.into(),
        })
    }

    /// Creates a client reading the API key from the configured environment
    /// variable.
    ///
    /// # Errors
    ///
    /// Returns `ArchitectError::Configuration` if the variable is unset or
    /// empty.
    pub fn from_env(config: GeneratorConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                ArchitectError::configuration(format!(
                    "API key not found. Set the {} environment variable.",
                    config.api_key_env
                ))
            })?;
        Self::new(config, api_key)
    }

    fn build_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    async fn generate_content(&self, body: &GeminiRequest) -> Result<Option<String>> {
        let url = self.build_url();
        debug!("POST {url}");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .http_context("Request to generation service failed")?;

        let status = response.status();
        let text = response
            .text()
            .await
            .http_context("Failed to read generation response")?;
        if !status.is_success() {
            return Err(ArchitectError::generation(format!("HTTP {status}: {text}")));
        }

        let parsed: GeminiResponse = serde_json::from_str(&text)?;
        if let Some(error) = parsed.error {
            return Err(ArchitectError::generation(format!(
                "Gemini API error: {}",
                error.message
            )));
        }
        Ok(parsed.first_text())
    }
}

#[async_trait]
impl PlanGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<Plan> {
        let body = GeminiRequest {
            contents: vec![GeminiContent::text("user", prompt)],
            system_instruction: Some(GeminiSystemInstruction::text(ARCHITECT_INSTRUCTION)),
            generation_config: GeminiGenerationConfig {
                temperature: self.config.temperature,
                response_mime_type: Some("application/json"),
                response_schema: Some(plan_schema()),
            },
        };

        let text = self
            .generate_content(&body)
            .await?
            .ok_or_else(|| ArchitectError::generation("No content in response"))?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl ChatResponder for GeminiClient {
    async fn respond(&self, message: &str, history: &[ChatMessage]) -> Result<String> {
        let mut contents: Vec<GeminiContent> = history
            .iter()
            .map(|msg| GeminiContent::text(msg.role.as_str(), &msg.text))
            .collect();
        contents.push(GeminiContent::text("user", message));

        let body = GeminiRequest {
            contents,
            system_instruction: Some(GeminiSystemInstruction::text(SUPPORT_INSTRUCTION)),
            generation_config: GeminiGenerationConfig {
                temperature: self.config.temperature,
                response_mime_type: None,
                response_schema: None,
            },
        };

        Ok(self.generate_content(&body).await?.unwrap_or_default())
    }
}

/// Response schema constraining plan output to the plan model.
fn plan_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "name": { "type": "STRING" },
            "steps": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": { "type": "STRING" },
                        "type": { "type": "STRING", "enum": ["trigger", "condition", "action"] },
                        "title": { "type": "STRING" },
                        "description": { "type": "STRING" }
                    },
                    "required": ["id", "type", "title", "description"]
                }
            }
        },
        "required": ["name", "steps"]
    })
}

// Gemini API request/response structures

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiSystemInstruction>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

impl GeminiContent {
    fn text(role: &str, text: &str) -> Self {
        Self {
            role: role.to_string(),
            parts: vec![GeminiPart {
                text: text.to_string(),
            }],
        }
    }
}

#[derive(Debug, Serialize)]
struct GeminiSystemInstruction {
    parts: Vec<GeminiPart>,
}

impl GeminiSystemInstruction {
    fn text(text: &str) -> Self {
        Self {
            parts: vec![GeminiPart {
                text: text.to_string(),
            }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
struct GeminiGenerationConfig {
    temperature: f32,
    #[serde(rename = "responseMimeType", skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(rename = "responseSchema", skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    error: Option<GeminiErrorDetail>,
}

impl GeminiResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<String>()
            })
    }
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContentResponse>,
}

#[derive(Debug, Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    message: String,
}
