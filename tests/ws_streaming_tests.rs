//! End-to-end streaming tests
//!
//! Boot the real server on an ephemeral port, stream synthetic PCM over a
//! WebSocket client and assert on the events that come back. The energy
//! VAD backend keeps classification deterministic on synthetic audio, and
//! wiremock stands in for the collaborators.

mod fixtures;
mod mock_providers;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use wiremock::MockServer;

use fixtures::audio_fixtures::{MS_100, generate_silence_bytes, generate_voice_bytes};
use mock_providers::{
    MOCK_TTS_AUDIO, mount_assemblyai_completed, mount_assemblyai_upload_failure,
    mount_elevenlabs_audio, mount_gemini_reply,
};

use voxchat_gateway::middleware::connection_limit_middleware;
use voxchat_gateway::core::vad::VadBackend;
use voxchat_gateway::{AppState, ServerConfig, routes};

const VOICE_ID: &str = "test-voice";
const MODEL: &str = "gemini-1.5-pro";

/// Test configuration: energy VAD, a short silence threshold and all
/// collaborators pointed at the mock server.
fn test_config(mocks: &MockServer) -> ServerConfig {
    let mut config = ServerConfig::default();
    config.vad.backend = VadBackend::Energy;
    config.silence_threshold_ms = 100;
    config.assemblyai_api_key = Some("test-assemblyai-key".to_string());
    config.assemblyai_base_url = format!("{}/v2", mocks.uri());
    config.transcript_poll_interval_ms = 10;
    config.transcript_max_polls = 5;
    config.gemini_api_key = Some("test-gemini-key".to_string());
    config.gemini_base_url = mocks.uri();
    config.gemini_model = MODEL.to_string();
    config.elevenlabs_api_key = Some("test-elevenlabs-key".to_string());
    config.elevenlabs_base_url = mocks.uri();
    config.elevenlabs_voice_id = VOICE_ID.to_string();
    config
}

/// Serve the full application on an ephemeral port.
async fn spawn_app(state: Arc<AppState>) -> SocketAddr {
    let ws_routes = routes::stream::create_stream_router().layer(
        axum::middleware::from_fn_with_state(state.clone(), connection_limit_middleware),
    );
    let app = Router::new()
        .merge(routes::api::create_api_router())
        .merge(ws_routes)
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });
    addr
}

type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

async fn connect(addr: SocketAddr) -> WsStream {
    let (stream, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/ws/audio"))
        .await
        .expect("WebSocket handshake");
    stream
}

/// Stream 500ms of voice, then enough spaced silence to cross the 100ms
/// threshold.
async fn stream_one_utterance(ws: &mut WsStream) {
    for _ in 0..5 {
        ws.send(Message::Binary(generate_voice_bytes(MS_100).into()))
            .await
            .unwrap();
    }
    ws.send(Message::Binary(generate_silence_bytes(MS_100).into()))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(150)).await;
    ws.send(Message::Binary(generate_silence_bytes(MS_100).into()))
        .await
        .unwrap();
}

async fn next_json(ws: &mut WsStream) -> Value {
    loop {
        let message = timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("server event before timeout")
            .expect("socket open")
            .expect("socket healthy");
        if let Message::Text(text) = message {
            return serde_json::from_str(&text).unwrap();
        }
    }
}

#[tokio::test]
async fn voiced_stream_produces_one_final_response() {
    let mocks = MockServer::start().await;
    mount_assemblyai_completed(&mocks, "hello gateway").await;
    mount_gemini_reply(&mocks, MODEL, "Hello human!").await;
    mount_elevenlabs_audio(&mocks, VOICE_ID).await;

    let state = AppState::new(test_config(&mocks)).await;
    let addr = spawn_app(state).await;
    let mut ws = connect(addr).await;

    stream_one_utterance(&mut ws).await;

    // Progress events precede the final response, in pipeline step order.
    let first = next_json(&mut ws).await;
    assert_eq!(first["event_type"], "disappear");
    assert_eq!(first["message"], "Speech detected. Transcribing...");

    let mut event = next_json(&mut ws).await;
    let mut disappear_count = 1;
    while event["event_type"] == "disappear" {
        disappear_count += 1;
        event = next_json(&mut ws).await;
    }

    assert_eq!(disappear_count, 3);
    assert_eq!(event["event_type"], "final_response");
    assert_eq!(event["userText"], "hello gateway");
    assert_eq!(event["aiResponse"], "Hello human!");
    assert_eq!(event["role"], "AI");
    assert_eq!(event["audio"], BASE64.encode(MOCK_TTS_AUDIO));
}

#[tokio::test]
async fn silence_only_stream_produces_no_events() {
    let mocks = MockServer::start().await;

    let state = AppState::new(test_config(&mocks)).await;
    let addr = spawn_app(state).await;
    let mut ws = connect(addr).await;

    for _ in 0..4 {
        ws.send(Message::Binary(generate_silence_bytes(MS_100).into()))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(60)).await;
    }

    // Nothing should arrive: no utterance boundary, no collaborator calls.
    let quiet = timeout(Duration::from_millis(500), ws.next()).await;
    assert!(quiet.is_err(), "unexpected event from a silent stream");
    assert!(
        mocks
            .received_requests()
            .await
            .expect("request recording enabled")
            .is_empty()
    );
}

#[tokio::test]
async fn transcription_failure_sends_one_error_and_no_final_response() {
    let mocks = MockServer::start().await;
    mount_assemblyai_upload_failure(&mocks).await;
    mount_gemini_reply(&mocks, MODEL, "unused").await;
    mount_elevenlabs_audio(&mocks, VOICE_ID).await;

    let state = AppState::new(test_config(&mocks)).await;
    let addr = spawn_app(state).await;
    let mut ws = connect(addr).await;

    stream_one_utterance(&mut ws).await;

    // Skip progress notices; collect the terminal event.
    let mut event = next_json(&mut ws).await;
    while event["event_type"] == "disappear" {
        event = next_json(&mut ws).await;
    }
    assert_eq!(event["error"], "Transcription failed");

    // And nothing further arrives for this utterance.
    let quiet = timeout(Duration::from_millis(500), ws.next()).await;
    assert!(quiet.is_err(), "unexpected event after the error");
}

#[tokio::test]
async fn odd_sized_chunks_reassemble_losslessly() {
    let mocks = MockServer::start().await;
    mount_assemblyai_completed(&mocks, "odd chunks").await;
    mount_gemini_reply(&mocks, MODEL, "still fine").await;
    mount_elevenlabs_audio(&mocks, VOICE_ID).await;

    let state = AppState::new(test_config(&mocks)).await;
    let addr = spawn_app(state).await;
    let mut ws = connect(addr).await;

    // Split the voiced audio at deliberately sample-misaligned boundaries.
    let voice = generate_voice_bytes(MS_100 * 5);
    for chunk in voice.chunks(3201) {
        ws.send(Message::Binary(chunk.to_vec().into())).await.unwrap();
    }
    ws.send(Message::Binary(generate_silence_bytes(MS_100).into()))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(150)).await;
    ws.send(Message::Binary(generate_silence_bytes(MS_100).into()))
        .await
        .unwrap();

    let mut event = next_json(&mut ws).await;
    while event["event_type"] == "disappear" {
        event = next_json(&mut ws).await;
    }
    assert_eq!(event["event_type"], "final_response");
    assert_eq!(event["userText"], "odd chunks");
}

#[tokio::test]
async fn global_connection_limit_rejects_extra_sockets() {
    let mocks = MockServer::start().await;
    let mut config = test_config(&mocks);
    config.max_websocket_connections = Some(1);

    let state = AppState::new(config).await;
    let addr = spawn_app(state).await;

    let _first = connect(addr).await;
    let second = tokio_tungstenite::connect_async(format!("ws://{addr}/ws/audio")).await;
    match second {
        Err(tokio_tungstenite::tungstenite::Error::Http(response)) => {
            assert_eq!(response.status(), 503);
        }
        other => panic!("expected HTTP 503 rejection, got {other:?}"),
    }
}
