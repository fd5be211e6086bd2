//! Command-line interview client.
//!
//! Usage: interview <resume.txt> <question...>
//!
//! Cleans the résumé, asks the server one interview question with it and
//! saves the spoken reply when the server produced one.
//! BACKEND_URL (default http://localhost:5000) and INTERVIEW_AUDIO_OUT
//! (default reply.mp3) are read from the environment.

use std::time::Duration;

use anyhow::{bail, Context};
use interview_server::handlers::ChatReply;
use llm_core::prompts::{clean_resume, interview_prompt};
use tracing::{info, warn};

const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let _ = dotenv::dotenv();

    let mut args = std::env::args().skip(1);
    let Some(resume_path) = args.next() else {
        bail!("usage: interview <resume.txt> <question...>");
    };
    let question = args.collect::<Vec<_>>().join(" ");
    if question.trim().is_empty() {
        bail!("usage: interview <resume.txt> <question...>");
    }

    let raw = tokio::fs::read_to_string(&resume_path)
        .await
        .with_context(|| format!("Failed to read {resume_path}"))?;
    let resume = clean_resume(&raw);
    if resume.is_empty() {
        bail!("{resume_path} contains no usable text");
    }
    info!("Loaded resume: {} characters after cleaning", resume.len());

    let backend = std::env::var("BACKEND_URL").unwrap_or_else(|_| DEFAULT_BACKEND_URL.into());
    let backend = backend.trim_end_matches('/');
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(20))
        .build()?;

    let response = client
        .post(format!("{backend}/chat"))
        .json(&serde_json::json!({ "message": interview_prompt(&resume, &question) }))
        .send()
        .await
        .context("Connection error")?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        bail!("Backend error ({status}): {body}");
    }
    let reply: ChatReply = response.json().await?;
    println!("Interviewer: {}", reply.response);

    let Some(audio_url) = reply.audio_url else {
        warn!("Server returned no audio for this reply");
        return Ok(());
    };

    let audio = client
        .get(format!("{backend}{audio_url}"))
        .send()
        .await?
        .error_for_status()?
        .bytes()
        .await?;
    let out = std::env::var("INTERVIEW_AUDIO_OUT").unwrap_or_else(|_| "reply.mp3".into());
    tokio::fs::write(&out, &audio)
        .await
        .with_context(|| format!("Failed to write {out}"))?;
    info!("Saved {} bytes of audio to {}", audio.len(), out);
    Ok(())
}
