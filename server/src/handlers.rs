use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use llm_core::{ChatMessage, LlmError};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use tts_core::{SlotVersion, SynthesisRequest, AUDIO_CONTENT_TYPE};

use crate::error::ApiError;
use crate::metrics::{EndpointMetricsResponse, MetricsResponse, SystemMetrics};
use crate::validation::validate_chat_request;
use crate::AppState;

/// Fixed reference handed out for "whatever the slot holds now".
pub const AUDIO_URL: &str = "/audio";

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatReply {
    pub response: String,
    pub audio_url: Option<String>,
}

pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn chat_endpoint(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, ApiError> {
    let start_time = Instant::now();
    let result = chat(&state, payload).await;

    state.metrics.chat.record_request(start_time.elapsed().as_millis() as u64);
    if result.is_err() {
        state.metrics.chat.record_error();
    }
    result.map(Json)
}

async fn chat(
    state: &AppState,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<ChatReply, ApiError> {
    let Json(req) = payload.map_err(|rejection| ApiError::InvalidInput(rejection.body_text()))?;
    let message = validate_chat_request(req.message.as_deref())?;

    info!("Chat request received: message length={}", message.len());

    let start_time = Instant::now();
    let messages = [ChatMessage::user(message)];
    let timeout = state.config.llm_timeout();
    let reply = match tokio::time::timeout(timeout, state.llm.complete(&messages)).await {
        Ok(result) => result?,
        Err(_) => return Err(LlmError::Timeout(timeout).into()),
    };
    info!(
        "Completion received in {:.2}s, reply length={}",
        start_time.elapsed().as_secs_f64(),
        reply.len()
    );

    let audio_url = speak_reply(state, &reply).await.map(|_| AUDIO_URL.to_string());

    Ok(ChatReply {
        response: reply,
        audio_url,
    })
}

/// Synthesize `text` into the audio slot. Any failure is logged and turns
/// into `None`; the chat reply is still delivered without audio.
async fn speak_reply(state: &AppState, text: &str) -> Option<SlotVersion> {
    let request = SynthesisRequest {
        text: text.to_string(),
        voice_id: state.config.voice_id.clone(),
        model_id: state.config.tts_model.clone(),
    };

    let audio = match state.tts.synthesize(&request).await {
        Ok(audio) => audio,
        Err(e) => {
            warn!("Audio generation error: {e}");
            state.metrics.synthesis.record_failure();
            return None;
        }
    };
    state.metrics.synthesis.record_success(audio.len());

    match state.slot.put(&audio).await {
        Ok(version) => {
            info!(version = version.0, bytes = audio.len(), "reply audio stored");
            Some(version)
        }
        Err(e) => {
            error!("Could not store reply audio: {e}");
            None
        }
    }
}

pub async fn audio_endpoint(State(state): State<AppState>) -> Result<Response, ApiError> {
    let start_time = Instant::now();
    let result = match state.slot.get().await {
        Ok(Some(audio)) => Ok((
            [
                (header::CONTENT_TYPE, AUDIO_CONTENT_TYPE),
                // same URL, different content after every chat
                (header::CACHE_CONTROL, "no-store"),
            ],
            audio,
        )
            .into_response()),
        Ok(None) => Err(ApiError::NotFound("No audio available".to_string())),
        Err(e) => Err(e.into()),
    };

    state.metrics.audio.record_request(start_time.elapsed().as_millis() as u64);
    if result.is_err() {
        state.metrics.audio.record_error();
    }
    result
}

pub async fn metrics_endpoint(State(state): State<AppState>) -> Json<MetricsResponse> {
    let mut system = sysinfo::System::new();
    system.refresh_cpu();
    system.refresh_memory();

    let cpu_usage = system.global_cpu_info().cpu_usage();
    let memory_used = system.used_memory();
    let memory_total = system.total_memory();
    let memory_usage_percent = if memory_total > 0 {
        (memory_used as f64 / memory_total as f64 * 100.0) as f32
    } else {
        0.0
    };

    // Get system load (Unix-like systems only)
    let system_load = {
        #[cfg(unix)]
        {
            std::fs::read_to_string("/proc/loadavg")
                .ok()
                .and_then(|loadavg| loadavg.split_whitespace().next()?.parse::<f64>().ok())
        }
        #[cfg(not(unix))]
        None
    };

    Json(MetricsResponse {
        timestamp: chrono::Utc::now(),
        system: SystemMetrics {
            cpu_usage_percent: cpu_usage,
            memory_used_mb: memory_used / 1024 / 1024,
            memory_total_mb: memory_total / 1024 / 1024,
            memory_usage_percent,
            uptime_seconds: state.metrics.uptime_seconds(),
            system_load,
        },
        endpoints: EndpointMetricsResponse {
            chat: state.metrics.chat.stats(),
            audio: state.metrics.audio.stats(),
        },
        synthesis: state.metrics.synthesis.stats(),
    })
}
