// Configuration for the server, read from the environment

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set in the environment")]
    Missing(&'static str),

    #[error("{key} has an invalid value {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub llm_model: String,
    pub elevenlabs_api_key: String,
    pub elevenlabs_base_url: String,
    pub voice_id: String,
    pub tts_model: String,
    pub audio_dir: PathBuf,
    pub rate_limit_per_minute: u32,
    pub llm_timeout_secs: u64,
    pub synthesis_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub cors_allowed_origins: Option<Vec<String>>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            openai_api_key: String::new(),
            openai_base_url: llm_core::DEFAULT_BASE_URL.into(),
            llm_model: llm_core::DEFAULT_MODEL.into(),
            elevenlabs_api_key: String::new(),
            elevenlabs_base_url: tts_core::DEFAULT_BASE_URL.into(),
            voice_id: tts_core::DEFAULT_VOICE_ID.into(),
            tts_model: tts_core::DEFAULT_MODEL_ID.into(),
            audio_dir: std::env::temp_dir().join("interview-audio"),
            rate_limit_per_minute: 60,
            llm_timeout_secs: 120,
            synthesis_timeout_secs: 60,
            request_timeout_secs: 300,
            cors_allowed_origins: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key/value source. API keys are mandatory;
    /// everything else falls back to `Default`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let openai_api_key = get("OPENAI_API_KEY").ok_or(ConfigError::Missing("OPENAI_API_KEY"))?;
        let elevenlabs_api_key =
            get("ELEVENLABS_API_KEY").ok_or(ConfigError::Missing("ELEVENLABS_API_KEY"))?;

        let cors_allowed_origins = get("CORS_ALLOWED_ORIGINS").map(|origins| {
            origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        Ok(Self {
            port: parsed(&get, "PORT", defaults.port)?,
            openai_api_key,
            openai_base_url: get("OPENAI_BASE_URL").unwrap_or(defaults.openai_base_url),
            llm_model: get("LLM_MODEL").unwrap_or(defaults.llm_model),
            elevenlabs_api_key,
            elevenlabs_base_url: get("ELEVENLABS_BASE_URL").unwrap_or(defaults.elevenlabs_base_url),
            voice_id: get("ELEVENLABS_VOICE_ID").unwrap_or(defaults.voice_id),
            tts_model: get("ELEVENLABS_MODEL").unwrap_or(defaults.tts_model),
            audio_dir: get("AUDIO_DIR").map(PathBuf::from).unwrap_or(defaults.audio_dir),
            rate_limit_per_minute: parsed(&get, "RATE_LIMIT_PER_MINUTE", defaults.rate_limit_per_minute)?,
            llm_timeout_secs: parsed(&get, "LLM_TIMEOUT_SECS", defaults.llm_timeout_secs)?,
            synthesis_timeout_secs: parsed(&get, "SYNTHESIS_TIMEOUT_SECS", defaults.synthesis_timeout_secs)?,
            request_timeout_secs: parsed(&get, "REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs)?,
            cors_allowed_origins,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm_timeout_secs)
    }

    pub fn synthesis_timeout(&self) -> Duration {
        Duration::from_secs(self.synthesis_timeout_secs)
    }
}

fn parsed<T, G>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}
