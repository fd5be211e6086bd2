//! ElevenLabs text-to-speech client.
//!
//! POST {base_url}/v1/text-to-speech/{voice_id}
//! Request: {"text": "...", "model_id": "..."} (JSON), `xi-api-key` header
//! Response: audio/mpeg binary

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use crate::{SpeechSynthesizer, SynthesisRequest, TtsError, AUDIO_CONTENT_TYPE};

pub const DEFAULT_BASE_URL: &str = "https://api.elevenlabs.io";
/// "Rachel"
pub const DEFAULT_VOICE_ID: &str = "21m00Tcm4TlvDq8ikWAM";
pub const DEFAULT_MODEL_ID: &str = "eleven_monolingual_v1";

#[derive(Serialize)]
struct TtsHttpRequest<'a> {
    text: &'a str,
    model_id: &'a str,
}

pub struct ElevenLabsClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl ElevenLabsClient {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self, TtsError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self, voice_id: &str) -> String {
        format!("{}/v1/text-to-speech/{}", self.base_url, voice_id)
    }
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsClient {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>, TtsError> {
        debug!(
            voice_id = %request.voice_id,
            model_id = %request.model_id,
            text_len = request.text.len(),
            "requesting speech synthesis"
        );

        let response = self
            .client
            .post(self.endpoint(&request.voice_id))
            .header("xi-api-key", &self.api_key)
            .header(header::ACCEPT, AUDIO_CONTENT_TYPE)
            .json(&TtsHttpRequest {
                text: &request.text,
                model_id: &request.model_id,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status, &body));
        }

        let audio = response.bytes().await?;
        if audio.is_empty() {
            return Err(TtsError::EmptyAudio);
        }
        Ok(audio.to_vec())
    }
}

// Error bodies look like {"detail": {"status": "...", "message": "..."}} or {"detail": "..."}.
fn api_error(status: StatusCode, body: &str) -> TtsError {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| json.get("detail").cloned());
    let message = match detail {
        Some(serde_json::Value::String(text)) => text,
        Some(serde_json::Value::Object(obj)) => obj
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| serde_json::Value::Object(obj).to_string()),
        _ if !body.trim().is_empty() => body.trim().to_string(),
        _ => status.canonical_reason().unwrap_or("unknown error").to_string(),
    };
    TtsError::Api {
        status: status.as_u16(),
        message,
    }
}
