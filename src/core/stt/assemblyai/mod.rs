//! AssemblyAI batch speech-to-text
//!
//! Implements the upload → transcript → poll flow of the AssemblyAI v2 REST
//! API. The whole exchange is bounded by a fixed poll budget; exceeding it
//! is a terminal failure for that call, never retried here.

mod client;
mod config;
mod messages;

pub use client::AssemblyAiStt;
pub use config::AssemblyAiConfig;
pub use messages::{TranscriptRequest, TranscriptResponse, TranscriptStatus, UploadResponse};
