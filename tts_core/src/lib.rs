mod elevenlabs;
mod slot;

use async_trait::async_trait;
use thiserror::Error;

pub use elevenlabs::{ElevenLabsClient, DEFAULT_BASE_URL, DEFAULT_MODEL_ID, DEFAULT_VOICE_ID};
pub use slot::{AudioSlot, SlotError, SlotVersion};

/// MIME type of every artifact produced by the synthesis provider.
pub const AUDIO_CONTENT_TYPE: &str = "audio/mpeg";

#[derive(Debug, Error)]
pub enum TtsError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message} (status {status})")]
    Api { status: u16, message: String },

    #[error("provider returned no audio")]
    EmptyAudio,
}

/// Text plus the voice/model pair to render it with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisRequest {
    pub text: String,
    pub voice_id: String,
    pub model_id: String,
}

/// Remote or local engine that renders text as encoded audio bytes.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>, TtsError>;
}
