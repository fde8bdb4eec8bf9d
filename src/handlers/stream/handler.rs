//! Streaming audio WebSocket handler
//!
//! Handles `GET /ws/audio` upgrades. Each connection gets its own session
//! state and its own classifier; the only thing connections share is the
//! process-wide job queue, which serializes pipeline work across all of
//! them.

use std::sync::Arc;

use axum::{
    Extension,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::{select, time::Duration};
use tracing::{debug, error, info, warn};

use crate::core::pipeline::PipelineEvent;
use crate::core::vad::VoiceClassifier;
use crate::middleware::ClientIp;
use crate::state::AppState;

use super::messages::{ErrorMessage, MessageRoute, OutgoingMessage};
use super::session::StreamSession;

/// Channel buffer size for outgoing messages.
const CHANNEL_BUFFER_SIZE: usize = 256;

/// Maximum WebSocket frame size (10 MB)
const MAX_WS_FRAME_SIZE: usize = 10 * 1024 * 1024;

/// Maximum WebSocket message size (10 MB)
const MAX_WS_MESSAGE_SIZE: usize = 10 * 1024 * 1024;

/// How often the connection is checked for staleness.
const IDLE_CHECK_INTERVAL: Duration = Duration::from_secs(30);

/// Maximum idle time before a stale connection is closed.
const IDLE_TIMEOUT: Duration = Duration::from_secs(300);

/// Streaming audio WebSocket handler.
pub async fn stream_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    client_ip: Option<Extension<ClientIp>>,
) -> Response {
    info!("audio stream connection upgrade requested");

    ws.max_frame_size(MAX_WS_FRAME_SIZE)
        .max_message_size(MAX_WS_MESSAGE_SIZE)
        .on_upgrade(move |socket| handle_stream_socket(socket, state, client_ip.map(|ip| ip.0.0)))
}

/// Drive one streaming connection to completion.
async fn handle_stream_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    client_ip: Option<std::net::IpAddr>,
) {
    info!("audio stream connection established");

    let (mut sender, mut receiver) = socket.split();
    let (message_tx, mut message_rx) = mpsc::channel::<MessageRoute>(CHANNEL_BUFFER_SIZE);

    // Sender task: serializes outgoing messages onto the socket.
    let sender_task = tokio::spawn(async move {
        while let Some(route) = message_rx.recv().await {
            let should_close = matches!(route, MessageRoute::Close);

            let result = match route {
                MessageRoute::Outgoing(message) => match serde_json::to_string(&message) {
                    Ok(json) => sender.send(Message::Text(json.into())).await,
                    Err(error) => {
                        error!(%error, "failed to serialize outgoing message");
                        continue;
                    }
                },
                MessageRoute::Close => sender.send(Message::Close(None)).await,
            };

            if let Err(error) = result {
                debug!(%error, "failed to send WebSocket message");
                break;
            }
            if should_close {
                break;
            }
        }
    });

    // Each connection owns its own classifier instance.
    let classifier = match state.classifier() {
        Ok(classifier) => classifier,
        Err(error) => {
            error!(%error, "failed to create voice classifier");
            let _ = message_tx
                .send(MessageRoute::Outgoing(OutgoingMessage::Error(
                    ErrorMessage {
                        error: "Voice activity detection unavailable".to_string(),
                        details: Some(error.to_string()),
                    },
                )))
                .await;
            let _ = message_tx.send(MessageRoute::Close).await;
            sender_task.abort();
            if let Some(ip) = client_ip {
                state.release_connection(ip);
            }
            return;
        }
    };

    // Pipeline events flow through their own channel; the forwarder
    // tolerates a closed socket by simply dropping what it cannot deliver.
    // Queued jobs hold clones of `event_tx`, so the forwarder naturally
    // outlives the connection until the last job settles.
    let (event_tx, mut event_rx) = mpsc::channel::<PipelineEvent>(CHANNEL_BUFFER_SIZE);
    let forward_tx = message_tx.clone();
    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            if forward_tx
                .send(MessageRoute::Outgoing(event.into()))
                .await
                .is_err()
            {
                debug!("connection gone, dropping remaining pipeline events");
                break;
            }
        }
    });

    let mut session = StreamSession::new(&state.config);
    let mut last_activity = std::time::Instant::now();

    loop {
        select! {
            incoming = receiver.next() => {
                last_activity = std::time::Instant::now();

                match incoming {
                    Some(Ok(message)) => {
                        let keep_going = process_stream_message(
                            message,
                            &mut session,
                            &classifier,
                            &event_tx,
                            &state,
                        ).await;
                        if !keep_going {
                            break;
                        }
                    }
                    Some(Err(error)) => {
                        // Connection-level errors are logged and the stream
                        // torn down; nothing else is affected.
                        warn!(%error, "audio stream WebSocket error");
                        break;
                    }
                    None => {
                        info!("audio stream closed by client");
                        break;
                    }
                }
            }
            _ = tokio::time::sleep(IDLE_CHECK_INTERVAL) => {
                if last_activity.elapsed() > IDLE_TIMEOUT {
                    warn!(
                        idle_secs = last_activity.elapsed().as_secs(),
                        "closing stale audio stream connection"
                    );
                    let _ = message_tx.send(MessageRoute::Close).await;
                    break;
                }
                debug!("audio stream idle check - still active");
            }
        }
    }

    sender_task.abort();
    if let Some(ip) = client_ip {
        state.release_connection(ip);
    }

    info!(
        chunks = session.chunks_received(),
        "audio stream connection terminated"
    );
}

/// Process one incoming WebSocket message.
///
/// Returns `false` to terminate the connection.
async fn process_stream_message(
    message: Message,
    session: &mut StreamSession,
    classifier: &Arc<dyn VoiceClassifier>,
    event_tx: &mpsc::Sender<PipelineEvent>,
    state: &Arc<AppState>,
) -> bool {
    match message {
        Message::Binary(chunk) => {
            debug!(bytes = chunk.len(), "received PCM chunk");

            let frames = session.ingest(&chunk);
            if frames.is_empty() {
                debug!("no whole samples in chunk, carrying leftover byte");
                return true;
            }

            match classifier.classify(&frames, session.sample_rate()).await {
                Ok(event) => {
                    if let Some(utterance) = session.push_classified(&frames, event) {
                        info!(
                            bytes = utterance.pcm.len(),
                            duration_ms = utterance.duration_ms(),
                            "utterance detected, queueing pipeline job"
                        );
                        let pipeline = state.pipeline.clone();
                        let job_classifier = classifier.clone();
                        let job_events = event_tx.clone();
                        // The receiver is dropped deliberately: the job has
                        // no cancellation link to this connection and runs
                        // to completion even if the socket closes first.
                        let _ = state.job_queue.enqueue(async move {
                            pipeline.run(utterance, job_classifier, job_events).await;
                        });
                    }
                }
                Err(error) => {
                    // Inconclusive frame: skip it, keep accumulated state.
                    warn!(%error, "frame classification failed, skipping frame");
                }
            }
            true
        }
        Message::Text(text) => {
            debug!(bytes = text.len(), "ignoring unexpected text frame on audio stream");
            true
        }
        Message::Ping(_) | Message::Pong(_) => true,
        Message::Close(_) => {
            info!("audio stream close frame received");
            false
        }
    }
}
