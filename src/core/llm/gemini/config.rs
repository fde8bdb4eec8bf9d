//! Gemini client configuration

/// Default Generative Language API base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model for chat replies.
pub const DEFAULT_MODEL: &str = "gemini-1.5-pro";

/// Configuration for the Gemini text-generation client.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key; `None` disables the provider (fallback replies only).
    pub api_key: Option<String>,

    /// API base URL, overridable for proxies and tests.
    pub base_url: String,

    /// Model identifier.
    pub model: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}
