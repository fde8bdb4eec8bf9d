//! Streaming audio WebSocket handler
//!
//! The live path of the gateway: raw PCM chunks arrive on a WebSocket,
//! flow through framing, classification and segmentation, and each
//! detected utterance is queued for the sequential AI pipeline. Events
//! travel back to the same socket as JSON text frames.

mod handler;
pub mod messages;
mod session;

pub use handler::stream_handler;
pub use messages::{ErrorMessage, MessageRoute, OutgoingMessage, StreamEvent};
pub use session::StreamSession;
