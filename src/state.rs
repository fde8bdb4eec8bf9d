//! Shared application state
//!
//! One `AppState` is built at startup and shared (via `Arc`) by every
//! handler. It owns the collaborator clients, the process-wide job queue
//! and the WebSocket connection accounting used by the admission-control
//! middleware.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::config::ServerConfig;
use crate::core::llm::{GeminiGenerator, TextGenerator};
use crate::core::pipeline::Pipeline;
use crate::core::queue::JobQueue;
use crate::core::stt::{AssemblyAiStt, SpeechToText};
use crate::core::tts::{ElevenLabsTts, TextToSpeech};
use crate::core::vad::{VoiceClassifier, create_classifier};

/// Why a connection was refused admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionLimitError {
    GlobalLimitReached,
    PerIpLimitReached,
}

/// Application state shared across all connections.
pub struct AppState {
    pub config: ServerConfig,

    /// Process-wide sequential job queue; the single serialization point
    /// shared by every connection.
    pub job_queue: JobQueue,

    /// The per-utterance collaborator pipeline.
    pub pipeline: Arc<Pipeline>,

    // Individual collaborators, also used directly by the REST surface.
    pub transcriber: Arc<dyn SpeechToText>,
    pub generator: Arc<dyn TextGenerator>,
    pub synthesizer: Arc<dyn TextToSpeech>,

    /// Shared HTTP connection pool for ad-hoc calls (LiveKit room service).
    pub http: reqwest::Client,

    // WebSocket connection accounting
    ws_connections: AtomicUsize,
    connections_per_ip: Mutex<HashMap<IpAddr, u32>>,
}

impl AppState {
    /// Build the application state from configuration.
    ///
    /// Must be called from within a tokio runtime (the job queue spawns its
    /// worker task here).
    pub async fn new(config: ServerConfig) -> Arc<Self> {
        let http = reqwest::Client::new();

        let transcriber: Arc<dyn SpeechToText> = Arc::new(AssemblyAiStt::with_client(
            config.assemblyai_config(),
            http.clone(),
        ));
        let generator: Arc<dyn TextGenerator> = Arc::new(GeminiGenerator::with_client(
            config.gemini_config(),
            http.clone(),
        ));
        let synthesizer: Arc<dyn TextToSpeech> = Arc::new(ElevenLabsTts::with_client(
            config.elevenlabs_config(),
            http.clone(),
        ));

        let pipeline = Arc::new(Pipeline::new(
            transcriber.clone(),
            generator.clone(),
            synthesizer.clone(),
            config.vad.frame_duration_ms,
        ));

        Arc::new(Self {
            config,
            job_queue: JobQueue::new(),
            pipeline,
            transcriber,
            generator,
            synthesizer,
            http,
            ws_connections: AtomicUsize::new(0),
            connections_per_ip: Mutex::new(HashMap::new()),
        })
    }

    /// Build a fresh classifier for one connection.
    ///
    /// Each connection owns its own classifier so that the detector's
    /// internal adaptation state never leaks between streams.
    pub fn classifier(&self) -> anyhow::Result<Arc<dyn VoiceClassifier>> {
        create_classifier(&self.config.vad)
    }

    /// Try to reserve a connection slot for `ip`.
    pub fn try_acquire_connection(&self, ip: IpAddr) -> Result<(), ConnectionLimitError> {
        let mut per_ip = self.connections_per_ip.lock();

        if let Some(max) = self.config.max_websocket_connections
            && self.ws_connections.load(Ordering::SeqCst) >= max
        {
            return Err(ConnectionLimitError::GlobalLimitReached);
        }

        let count = per_ip.entry(ip).or_insert(0);
        if *count >= self.config.max_connections_per_ip {
            return Err(ConnectionLimitError::PerIpLimitReached);
        }

        *count += 1;
        self.ws_connections.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    /// Release a previously acquired connection slot.
    pub fn release_connection(&self, ip: IpAddr) {
        let mut per_ip = self.connections_per_ip.lock();
        if let Some(count) = per_ip.get_mut(&ip) {
            *count -= 1;
            if *count == 0 {
                per_ip.remove(&ip);
            }
            self.ws_connections.fetch_sub(1, Ordering::SeqCst);
        }
    }

    /// Current number of live WebSocket connections.
    pub fn ws_connection_count(&self) -> usize {
        self.ws_connections.load(Ordering::SeqCst)
    }

    /// Current number of live connections from `ip`.
    pub fn ip_connection_count(&self, ip: &IpAddr) -> u32 {
        self.connections_per_ip.lock().get(ip).copied().unwrap_or(0)
    }
}
