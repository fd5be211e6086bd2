pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod validation;

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Request},
    http::{HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use llm_core::CompletionProvider;
use tower::ServiceBuilder;
use tower_governor::{governor::GovernorConfigBuilder, key_extractor::GlobalKeyExtractor, GovernorLayer};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};
use tts_core::{AudioSlot, SpeechSynthesizer};

use crate::config::ServerConfig;
use crate::handlers::{audio_endpoint, chat_endpoint, health_check, metrics_endpoint};
use crate::metrics::AppMetrics;

/// Upper bound on request bodies, and with it on prompt size.
const MAX_BODY_BYTES: usize = 256 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<dyn CompletionProvider>,
    pub tts: Arc<dyn SpeechSynthesizer>,
    pub slot: Arc<AudioSlot>,
    pub metrics: AppMetrics,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(
        llm: Arc<dyn CompletionProvider>,
        tts: Arc<dyn SpeechSynthesizer>,
        slot: AudioSlot,
        config: ServerConfig,
    ) -> Self {
        Self {
            llm,
            tts,
            slot: Arc::new(slot),
            metrics: AppMetrics::new(),
            config,
        }
    }
}

/// Routes without middleware, served both at the root and under `/api`.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
        .route("/chat", post(chat_endpoint))
        .route("/audio", get(audio_endpoint))
        .route("/metrics", get(metrics_endpoint));

    Router::new()
        .merge(api.clone())
        .nest("/api", api)
        .with_state(state)
}

/// Full application: routes plus tracing, rate limiting, timeout, CORS and
/// request ids.
pub fn app(state: AppState) -> anyhow::Result<Router> {
    let config = state.config.clone();

    // One global bucket shared by every caller.
    let per_minute = config.rate_limit_per_minute.max(1);
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_millisecond((60_000 / per_minute as u64).max(1))
            .burst_size(per_minute)
            .key_extractor(GlobalKeyExtractor)
            .finish()
            .ok_or_else(|| anyhow::anyhow!("invalid rate limit configuration"))?,
    );
    info!("Rate limiting: {} requests per minute", per_minute);

    let middleware_stack = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(GovernorLayer::new(governor_conf))
        .layer(TimeoutLayer::new(config.request_timeout()))
        .layer(cors_layer(&config))
        .into_inner();

    Ok(router(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(axum::middleware::from_fn(add_request_id))
        .layer(middleware_stack))
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .allow_credentials(false);

    let Some(allowed_origins) = &config.cors_allowed_origins else {
        warn!("CORS_ALLOWED_ORIGINS not set, allowing all origins (development mode)");
        return base.allow_origin(Any);
    };

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect();

    if origins.is_empty() {
        warn!("CORS_ALLOWED_ORIGINS is empty, falling back to permissive CORS");
        base.allow_origin(Any)
    } else {
        info!("CORS configured for {} origin(s)", origins.len());
        base.allow_origin(AllowOrigin::list(origins))
    }
}

// Request ID middleware for tracing
async fn add_request_id(mut request: Request, next: Next) -> Response {
    let request_id = uuid::Uuid::new_v4().to_string();
    let header_value = HeaderValue::from_str(&request_id).ok();
    if let Some(value) = &header_value {
        request.headers_mut().insert("x-request-id", value.clone());
    }
    let mut response = next.run(request).await;
    if let Some(value) = header_value {
        response.headers_mut().insert("x-request-id", value);
    }
    response
}
