//! Mock collaborator backends
//!
//! wiremock mounts simulating the three remote collaborators (AssemblyAI,
//! Gemini, ElevenLabs) so end-to-end tests run without network access or
//! credentials.

#![allow(dead_code)]

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Audio bytes served by the mock synthesis endpoint.
pub const MOCK_TTS_AUDIO: &[u8] = b"mock-mp3-audio-bytes";

/// Mount a transcription flow that uploads, then completes immediately with
/// `transcript`.
pub async fn mount_assemblyai_completed(server: &MockServer, transcript: &str) {
    Mock::given(method("POST"))
        .and(path("/v2/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "upload_url": format!("{}/cdn/upload/1", server.uri()),
        })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v2/transcript"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "transcript-1",
            "status": "completed",
            "text": transcript,
        })))
        .mount(server)
        .await;
}

/// Mount a transcription flow that stays queued long enough to need polls,
/// then completes with `transcript`.
pub async fn mount_assemblyai_polling(server: &MockServer, transcript: &str) {
    Mock::given(method("POST"))
        .and(path("/v2/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "upload_url": format!("{}/cdn/upload/1", server.uri()),
        })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v2/transcript"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "transcript-1",
            "status": "queued",
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/transcript/transcript-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "transcript-1",
            "status": "completed",
            "text": transcript,
        })))
        .mount(server)
        .await;
}

/// Mount a transcription flow that never leaves `processing`.
pub async fn mount_assemblyai_stuck(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/v2/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "upload_url": format!("{}/cdn/upload/1", server.uri()),
        })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v2/transcript"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "transcript-1",
            "status": "queued",
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/transcript/transcript-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "transcript-1",
            "status": "processing",
        })))
        .mount(server)
        .await;
}

/// Mount a transcription flow whose upload is rejected outright.
pub async fn mount_assemblyai_upload_failure(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/v2/upload"))
        .respond_with(ResponseTemplate::new(500))
        .mount(server)
        .await;
}

/// Mount a Gemini completion returning `reply`.
pub async fn mount_gemini_reply(server: &MockServer, model: &str, reply: &str) {
    Mock::given(method("POST"))
        .and(path(format!("/v1beta/models/{model}:generateContent")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [
                {"content": {"parts": [{"text": reply}]}}
            ],
        })))
        .mount(server)
        .await;
}

/// Mount an ElevenLabs synthesis endpoint returning [`MOCK_TTS_AUDIO`].
pub async fn mount_elevenlabs_audio(server: &MockServer, voice_id: &str) {
    Mock::given(method("POST"))
        .and(path(format!("/v1/text-to-speech/{voice_id}/stream")))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "audio/mpeg")
                .set_body_bytes(MOCK_TTS_AUDIO),
        )
        .mount(server)
        .await;
}

/// Mount an ElevenLabs synthesis endpoint that always fails.
pub async fn mount_elevenlabs_failure(server: &MockServer, voice_id: &str) {
    Mock::given(method("POST"))
        .and(path(format!("/v1/text-to-speech/{voice_id}/stream")))
        .respond_with(ResponseTemplate::new(500))
        .mount(server)
        .await;
}
