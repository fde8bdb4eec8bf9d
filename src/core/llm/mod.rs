pub mod gemini;

// Re-export public types and traits
pub use gemini::{GeminiConfig, GeminiGenerator};

use async_trait::async_trait;

/// Reply used whenever the text-generation collaborator fails.
///
/// Generation is the one pipeline step that never aborts: transport errors,
/// quota errors and empty completions all degrade to this string.
pub const FALLBACK_REPLY: &str = "Sorry, I'm having trouble responding right now.";

/// Text completion capability.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a reply to the user's input.
    ///
    /// Infallible by contract: implementations must fall back to
    /// [`FALLBACK_REPLY`] instead of surfacing an error.
    async fn generate(&self, input: &str) -> String;
}
