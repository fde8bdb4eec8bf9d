//! Utterance processing pipeline
//!
//! Drives one utterance through speech verification, transcription, reply
//! generation and speech synthesis, in that order, each step depending on
//! the previous one succeeding. Progress and results are emitted as
//! [`PipelineEvent`]s on a channel owned by the originating connection; a
//! closed channel (the client went away) just drops the events.
//!
//! Failure policy, deliberately asymmetric: a verification negative is a
//! silent discard, transcription and synthesis failures abort with exactly
//! one error event, and reply generation never fails (the generator
//! degrades to a fallback string internally).

use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::audio::encode_wav;
use super::llm::TextGenerator;
use super::segment::Utterance;
use super::stt::SpeechToText;
use super::tts::TextToSpeech;
use super::vad::{VoiceClassifier, contains_speech};

/// Event emitted by the pipeline toward the originating connection.
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    /// Ephemeral progress notice.
    Status { message: String },
    /// Terminal success: the full exchange for one utterance.
    Completed {
        transcript: String,
        reply: String,
        audio: Bytes,
    },
    /// Terminal failure for this utterance only.
    Failed {
        error: String,
        details: Option<String>,
    },
}

/// Orchestrates the per-utterance collaborator sequence.
///
/// One pipeline is shared by all connections; serialization is the job
/// queue's concern, not the pipeline's.
pub struct Pipeline {
    transcriber: Arc<dyn SpeechToText>,
    generator: Arc<dyn TextGenerator>,
    synthesizer: Arc<dyn TextToSpeech>,
    /// Window length for speech verification, in milliseconds.
    verify_frame_ms: u32,
}

impl Pipeline {
    pub fn new(
        transcriber: Arc<dyn SpeechToText>,
        generator: Arc<dyn TextGenerator>,
        synthesizer: Arc<dyn TextToSpeech>,
        verify_frame_ms: u32,
    ) -> Self {
        Self {
            transcriber,
            generator,
            synthesizer,
            verify_frame_ms,
        }
    }

    /// Run one utterance to completion, emitting events along the way.
    pub async fn run(
        &self,
        utterance: Utterance,
        classifier: Arc<dyn VoiceClassifier>,
        events: mpsc::Sender<PipelineEvent>,
    ) {
        if !contains_speech(
            classifier.as_ref(),
            &utterance.pcm,
            utterance.sample_rate,
            self.verify_frame_ms,
        )
        .await
        {
            debug!(
                bytes = utterance.pcm.len(),
                "no speech in utterance buffer, discarding"
            );
            return;
        }

        info!(
            bytes = utterance.pcm.len(),
            duration_ms = utterance.duration_ms(),
            "speech confirmed, starting pipeline"
        );

        let container = encode_wav(&utterance.pcm, utterance.sample_rate, utterance.channels);
        emit(
            &events,
            PipelineEvent::Status {
                message: "Speech detected. Transcribing...".to_string(),
            },
        )
        .await;

        let transcript = match self.transcriber.transcribe(Bytes::from(container)).await {
            Ok(text) => text,
            Err(error) => {
                warn!(%error, "transcription failed, aborting utterance");
                emit(
                    &events,
                    PipelineEvent::Failed {
                        error: "Transcription failed".to_string(),
                        details: Some(error.to_string()),
                    },
                )
                .await;
                return;
            }
        };

        emit(
            &events,
            PipelineEvent::Status {
                message: "Transcript ready. Generating a reply...".to_string(),
            },
        )
        .await;

        let reply = self.generator.generate(&transcript).await.trim().to_string();

        emit(
            &events,
            PipelineEvent::Status {
                message: "Reply ready. Synthesizing audio...".to_string(),
            },
        )
        .await;

        match self.synthesizer.synthesize(&reply).await {
            Ok(audio) => {
                info!(
                    transcript_chars = transcript.len(),
                    audio_bytes = audio.len(),
                    "pipeline complete"
                );
                emit(
                    &events,
                    PipelineEvent::Completed {
                        transcript,
                        reply,
                        audio,
                    },
                )
                .await;
            }
            Err(error) => {
                warn!(%error, "speech synthesis failed");
                emit(
                    &events,
                    PipelineEvent::Failed {
                        error: "Failed to generate audio response".to_string(),
                        details: Some(error.to_string()),
                    },
                )
                .await;
            }
        }
    }
}

async fn emit(events: &mpsc::Sender<PipelineEvent>, event: PipelineEvent) {
    if events.send(event).await.is_err() {
        debug!("event receiver closed, dropping pipeline event");
    }
}
