//! End-to-end tests for the complete chat pipeline
//! Tests: prompt -> completion provider -> synthesis provider -> /audio

use reqwest::StatusCode;
use serde_json::json;

use crate::e2e_test_helpers::*;

#[tokio::test]
async fn test_complete_chat_pipeline() {
    let upstream = spawn_mock_upstream().await;
    let server = spawn_server(upstream, OPENAI_KEY, ELEVENLABS_KEY).await;

    let response = server
        .client
        .post(format!("{}/chat", server.base_url))
        .json(&json!({ "message": "Hello" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "response": "You said: Hello", "audio_url": "/audio" }));

    let audio = server
        .client
        .get(format!("{}{}", server.base_url, body["audio_url"].as_str().unwrap()))
        .send()
        .await
        .unwrap();
    assert_eq!(audio.status(), StatusCode::OK);
    assert_eq!(audio.headers()["content-type"], "audio/mpeg");
    assert_eq!(
        audio.bytes().await.unwrap().as_ref(),
        b"21m00Tcm4TlvDq8ikWAM|eleven_monolingual_v1|You said: Hello"
    );
}

#[tokio::test]
async fn test_pipeline_replaces_audio_between_turns() {
    let upstream = spawn_mock_upstream().await;
    let server = spawn_server(upstream, OPENAI_KEY, ELEVENLABS_KEY).await;

    for message in ["first question", "second question"] {
        let status = server
            .client
            .post(format!("{}/api/chat", server.base_url))
            .json(&json!({ "message": message }))
            .send()
            .await
            .unwrap()
            .status();
        assert_eq!(status, StatusCode::OK);
    }

    let audio = server
        .client
        .get(format!("{}/api/audio", server.base_url))
        .send()
        .await
        .unwrap()
        .bytes()
        .await
        .unwrap();
    assert!(audio.ends_with(b"You said: second question"));

    let files = std::fs::read_dir(server.state.slot.dir()).unwrap().count();
    assert_eq!(files, 1);
}

#[tokio::test]
async fn test_pipeline_with_rejected_completion_key() {
    let upstream = spawn_mock_upstream().await;
    let server = spawn_server(upstream, "sk-wrong", ELEVENLABS_KEY).await;

    let response = server
        .client
        .post(format!("{}/chat", server.base_url))
        .json(&json!({ "message": "Hello" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.text().await.unwrap();
    assert!(body.contains("Incorrect API key provided"), "{body}");

    let audio = server
        .client
        .get(format!("{}/audio", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(audio.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_pipeline_with_rejected_synthesis_key() {
    let upstream = spawn_mock_upstream().await;
    let server = spawn_server(upstream, OPENAI_KEY, "el-wrong").await;

    let response = server
        .client
        .post(format!("{}/chat", server.base_url))
        .json(&json!({ "message": "Hello" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["response"], "You said: Hello");
    assert!(body["audio_url"].is_null());

    let audio = server
        .client
        .get(format!("{}/audio", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(audio.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_pipeline_rejects_empty_message() {
    let upstream = spawn_mock_upstream().await;
    let server = spawn_server(upstream, OPENAI_KEY, ELEVENLABS_KEY).await;

    let response = server
        .client
        .post(format!("{}/chat", server.base_url))
        .json(&json!({ "message": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(server.state.metrics.synthesis.stats().attempts, 0);
}
