//! GeminiApiClient - Direct REST API implementation for Gemini.
//!
//! Every operation is a single `generateContent` call. Nothing is retried;
//! HTTP failures and undecodable answers are reported as errors and the
//! caller decides what the learner sees.

use async_trait::async_trait;
use lingua_core::chat::HistoryTurn;
use lingua_core::config::{AppConfig, GeminiSettings, SecretConfig};
use lingua_core::generation::{EncodedAudio, GenerationService};
use lingua_core::lesson::LessonLevel;
use lingua_core::quiz::QuizQuestion;
use lingua_core::vocab::{GeneratedImage, WordDefinition};
use lingua_core::{LinguaError, Result};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use crate::prompts;

const DEFAULT_IMAGE_MIME: &str = "image/png";
const DEFAULT_AUDIO_MIME: &str = "audio/L16;codec=pcm;rate=24000";

/// Client that talks to the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiApiClient {
    client: Client,
    api_key: String,
    settings: GeminiSettings,
}

impl GeminiApiClient {
    /// Creates a new client with the provided API key and model settings.
    pub fn new(api_key: impl Into<String>, settings: GeminiSettings) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            settings,
        }
    }

    /// Builds a client from the loaded configuration files.
    ///
    /// `model_name` in `secret.json` overrides the configured text model.
    pub fn from_config(config: &AppConfig, secrets: &SecretConfig) -> Result<Self> {
        let gemini = secrets.gemini.as_ref().ok_or_else(|| {
            LinguaError::config("Gemini configuration not found in secret.json")
        })?;
        if gemini.api_key.trim().is_empty() {
            return Err(LinguaError::config("Gemini api_key in secret.json is empty"));
        }

        let mut settings = config.gemini.clone();
        if let Some(model) = &gemini.model_name {
            settings.text_model = model.clone();
        }
        Ok(Self::new(gemini.api_key.clone(), settings))
    }

    /// Overrides the text model after construction.
    pub fn with_text_model(mut self, model: impl Into<String>) -> Self {
        self.settings.text_model = model.into();
        self
    }

    pub fn settings(&self) -> &GeminiSettings {
        &self.settings
    }

    async fn generate(
        &self,
        model: &str,
        body: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let url = format!(
            "{base}/{model}:generateContent?key={api_key}",
            base = self.settings.base_url.trim_end_matches('/'),
            api_key = self.api_key
        );
        debug!(model, "Sending Gemini generateContent request");

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|err| {
                LinguaError::service(
                    None,
                    format!("Gemini API request failed: {}", err.without_url()),
                )
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        response
            .json()
            .await
            .map_err(|err| LinguaError::malformed(format!("Failed to parse Gemini response: {err}")))
    }

    async fn generate_json<T: DeserializeOwned>(
        &self,
        prompt: String,
        schema: Value,
    ) -> Result<T> {
        let request = GenerateContentRequest::prompt(prompt).with_config(GenerationConfig {
            response_mime_type: Some("application/json".to_string()),
            response_schema: Some(schema),
            ..GenerationConfig::default()
        });
        let response = self.generate(&self.settings.text_model, &request).await?;
        let text = extract_text(response).ok_or_else(|| {
            LinguaError::malformed("Gemini API returned no text in the response candidates")
        })?;
        parse_json(&text)
    }
}

#[async_trait]
impl GenerationService for GeminiApiClient {
    async fn send_chat(&self, history: &[HistoryTurn], message: &str) -> Result<Option<String>> {
        let mut contents: Vec<Content> = history
            .iter()
            .map(|turn| Content::with_role(turn.role.wire_name(), &turn.text))
            .collect();
        contents.push(Content::with_role("user", message));

        let request = GenerateContentRequest {
            contents,
            system_instruction: Some(Content::text(prompts::TUTOR_SYSTEM_INSTRUCTION)),
            generation_config: None,
        };
        let response = self.generate(&self.settings.text_model, &request).await?;
        Ok(extract_text(response))
    }

    async fn generate_lesson(&self, title: &str, level: LessonLevel) -> Result<String> {
        let request = GenerateContentRequest::prompt(prompts::lesson_prompt(title, level));
        let response = self.generate(&self.settings.text_model, &request).await?;
        extract_text(response).ok_or_else(|| {
            LinguaError::malformed("Gemini API returned no lesson text")
        })
    }

    async fn generate_quiz(&self, topic: &str, count: usize) -> Result<Vec<QuizQuestion>> {
        self.generate_json(prompts::quiz_prompt(topic, count), quiz_schema())
            .await
    }

    async fn define_word(&self, word: &str) -> Result<WordDefinition> {
        self.generate_json(prompts::definition_prompt(word), definition_schema())
            .await
    }

    async fn generate_image(&self, word: &str) -> Result<Option<GeneratedImage>> {
        let request = GenerateContentRequest::prompt(prompts::illustration_prompt(word));
        let response = self.generate(&self.settings.image_model, &request).await?;
        Ok(extract_inline_data(response).map(|data| GeneratedImage {
            mime_type: data
                .mime_type
                .unwrap_or_else(|| DEFAULT_IMAGE_MIME.to_string()),
            data_base64: data.data,
        }))
    }

    async fn synthesize_speech(&self, text: &str) -> Result<Option<EncodedAudio>> {
        let request = GenerateContentRequest::prompt(text).with_config(GenerationConfig {
            response_modalities: Some(vec!["AUDIO".to_string()]),
            speech_config: Some(json!({
                "voiceConfig": {
                    "prebuiltVoiceConfig": { "voiceName": self.settings.voice_name }
                }
            })),
            ..GenerationConfig::default()
        });
        let response = self.generate(&self.settings.speech_model, &request).await?;
        Ok(extract_inline_data(response).map(|data| EncodedAudio {
            mime_type: data
                .mime_type
                .unwrap_or_else(|| DEFAULT_AUDIO_MIME.to_string()),
            data_base64: data.data,
        }))
    }
}

fn quiz_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "question": { "type": "STRING" },
                "options": { "type": "ARRAY", "items": { "type": "STRING" } },
                "correctAnswer": {
                    "type": "INTEGER",
                    "description": "Index of the correct answer (0-3)"
                },
                "explanation": { "type": "STRING", "description": "Explanation in Uzbek" }
            },
            "required": ["question", "options", "correctAnswer", "explanation"]
        }
    })
}

fn definition_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "definition": { "type": "STRING" },
            "example": { "type": "STRING" }
        }
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    fn prompt(text: impl Into<String>) -> Self {
        Self {
            contents: vec![Content::text(text)],
            system_instruction: None,
            generation_config: None,
        }
    }

    fn with_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = Some(config);
        self
    }
}

#[derive(Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

impl Content {
    fn text(text: impl Into<String>) -> Self {
        Self {
            role: None,
            parts: vec![Part { text: text.into() }],
        }
    }

    fn with_role(role: &str, text: impl Into<String>) -> Self {
        Self {
            role: Some(role.to_string()),
            parts: vec![Part { text: text.into() }],
        }
    }
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize, Default)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_modalities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    speech_config: Option<Value>,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PartResponse {
    text: Option<String>,
    inline_data: Option<InlineData>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: Option<String>,
    data: String,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

fn first_candidate_parts(response: GenerateContentResponse) -> Vec<PartResponse> {
    response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts)
        .unwrap_or_default()
}

/// Concatenated text parts of the first candidate, `None` if there are none
/// or they are all blank.
fn extract_text(response: GenerateContentResponse) -> Option<String> {
    let text: String = first_candidate_parts(response)
        .into_iter()
        .filter_map(|part| part.text)
        .collect();
    if text.trim().is_empty() { None } else { Some(text) }
}

/// First inline data part of the first candidate.
fn extract_inline_data(response: GenerateContentResponse) -> Option<InlineData> {
    first_candidate_parts(response)
        .into_iter()
        .find_map(|part| part.inline_data)
}

/// Parses structured output, tolerating a surrounding markdown code fence.
fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T> {
    let trimmed = text.trim();
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed);

    serde_json::from_str(unfenced.trim()).map_err(|err| {
        LinguaError::malformed(format!("Gemini returned invalid structured output: {err}"))
    })
}

fn map_http_error(status: StatusCode, body: String) -> LinguaError {
    let message = serde_json::from_str::<ErrorWrapper>(&body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.clone());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.clone());

    LinguaError::service(Some(status.as_u16()), message)
}
