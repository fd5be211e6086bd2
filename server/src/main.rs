use std::{net::SocketAddr, sync::Arc};

use interview_server::{app, config::ServerConfig, AppState};
use llm_core::OpenAiClient;
use tokio::net::TcpListener;
use tracing::info;
use tts_core::{AudioSlot, ElevenLabsClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let _ = dotenv::dotenv();

    async_main().await
}

async fn async_main() -> anyhow::Result<()> {
    info!("Starting interview server...");

    let config = ServerConfig::from_env()?;

    let llm = OpenAiClient::new(config.openai_api_key.clone(), config.llm_model.clone())?
        .with_base_url(config.openai_base_url.clone());
    info!("Completion provider ready: model={}", llm.model());

    let tts = ElevenLabsClient::new(config.elevenlabs_api_key.clone(), config.synthesis_timeout())?
        .with_base_url(config.elevenlabs_base_url.clone());
    info!(
        "Synthesis provider ready: voice={}, model={}",
        config.voice_id, config.tts_model
    );

    let slot = AudioSlot::new(&config.audio_dir).map_err(|e| {
        anyhow::anyhow!("Failed to prepare audio dir {}: {e}", config.audio_dir.display())
    })?;
    info!("Reply audio stored under {}", slot.dir().display());

    info!(
        "Server configuration loaded: port={}, rate_limit={}/min, llm_timeout={}s",
        config.port, config.rate_limit_per_minute, config.llm_timeout_secs
    );

    let port = config.port;
    let state = AppState::new(Arc::new(llm), Arc::new(tts), slot, config);
    let app = app(state)?;

    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse()?;
    let listener = TcpListener::bind(addr).await.map_err(|e| {
        anyhow::anyhow!("Failed to bind {addr}: {e}. Try a different PORT.")
    })?;

    info!("Server listening on http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}
