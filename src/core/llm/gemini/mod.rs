//! Gemini text generation
//!
//! Thin client for the Generative Language `generateContent` REST endpoint.
//! Failures never leave this module; the pipeline always receives a reply
//! string.

mod client;
mod config;
mod messages;

pub use client::GeminiGenerator;
pub use config::GeminiConfig;
pub use messages::{GenerateContentRequest, GenerateContentResponse};
