//! Common utilities for integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body, Bytes},
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use interview_server::{config::ServerConfig, router, AppState};
use llm_core::{ChatMessage, CompletionProvider, LlmError};
use tempfile::TempDir;
use tower::ServiceExt;
use tts_core::{AudioSlot, SpeechSynthesizer, SynthesisRequest, TtsError};

/// Completion double: fixed reply or fixed failure, with call recording.
pub struct FakeCompletion {
    outcome: Result<String, String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    seen: Mutex<Vec<Vec<ChatMessage>>>,
}

impl FakeCompletion {
    pub fn replying(text: &str) -> Self {
        Self::with_outcome(Ok(text.to_string()))
    }

    pub fn failing(message: &str) -> Self {
        Self::with_outcome(Err(message.to_string()))
    }

    pub fn slow(text: &str, delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::replying(text)
        }
    }

    fn with_outcome(outcome: Result<String, String>) -> Self {
        Self {
            outcome,
            delay: None,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<Vec<ChatMessage>> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for FakeCompletion {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(messages.to_vec());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.outcome.clone().map_err(|message| LlmError::Api {
            status: 503,
            message,
        })
    }
}

/// Synthesis double. Call N gets outcome N; once exhausted the last one repeats.
pub struct FakeSynth {
    outcomes: Vec<Result<Vec<u8>, String>>,
    calls: AtomicUsize,
    seen: Mutex<Vec<SynthesisRequest>>,
}

impl FakeSynth {
    pub fn returning(audio: &[u8]) -> Self {
        Self::sequence(vec![Ok(audio.to_vec())])
    }

    pub fn failing(message: &str) -> Self {
        Self::sequence(vec![Err(message.to_string())])
    }

    pub fn sequence(outcomes: Vec<Result<Vec<u8>, String>>) -> Self {
        assert!(!outcomes.is_empty());
        Self {
            outcomes,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<SynthesisRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechSynthesizer for FakeSynth {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>, TtsError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(request.clone());
        let index = call.min(self.outcomes.len() - 1);
        self.outcomes[index].clone().map_err(|message| TtsError::Api {
            status: 500,
            message,
        })
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub llm: Arc<FakeCompletion>,
    pub tts: Arc<FakeSynth>,
    _audio_dir: TempDir,
}

/// Create a test app instance backed by the given doubles and a fresh
/// temporary audio directory.
pub fn create_test_app(llm: FakeCompletion, tts: FakeSynth) -> TestApp {
    create_test_app_with_config(llm, tts, ServerConfig::default())
}

pub fn create_test_app_with_config(
    llm: FakeCompletion,
    tts: FakeSynth,
    mut config: ServerConfig,
) -> TestApp {
    let audio_dir = tempfile::tempdir().unwrap();
    config.audio_dir = audio_dir.path().to_path_buf();

    let llm = Arc::new(llm);
    let tts = Arc::new(tts);
    let slot = AudioSlot::new(audio_dir.path()).unwrap();
    let state = AppState::new(llm.clone(), tts.clone(), slot, config);

    TestApp {
        router: router(state.clone()),
        state,
        llm,
        tts,
        _audio_dir: audio_dir,
    }
}

impl TestApp {
    pub async fn post_chat_raw(&self, uri: &str, content_type: &str, body: String) -> (StatusCode, serde_json::Value) {
        let response = self
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", content_type)
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    pub async fn post_chat(&self, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        self.post_chat_raw("/chat", "application/json", body.to_string())
            .await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, HeaderMap, Bytes) {
        let response = self
            .router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, body)
    }

    pub async fn get_audio(&self) -> (StatusCode, HeaderMap, Bytes) {
        self.get("/audio").await
    }
}
