//! AssemblyAI client configuration

use std::time::Duration;

/// Default AssemblyAI API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.assemblyai.com/v2";

/// Configuration for the AssemblyAI batch transcription client.
#[derive(Debug, Clone)]
pub struct AssemblyAiConfig {
    /// API key; `None` disables the provider.
    pub api_key: Option<String>,

    /// API base URL, overridable for self-hosted proxies and tests.
    pub base_url: String,

    /// Language code sent with every transcript request.
    pub language_code: String,

    /// Request automatic punctuation.
    pub punctuate: bool,

    /// Request casing and formatting cleanup.
    pub format_text: bool,

    /// Delay between status polls.
    pub poll_interval: Duration,

    /// Maximum number of status polls before the call is declared dead.
    /// Together with `poll_interval` this bounds the worst-case wait
    /// (default 60 x 2s = 120s).
    pub max_poll_attempts: u32,
}

impl Default for AssemblyAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            language_code: "en".to_string(),
            punctuate: true,
            format_text: true,
            poll_interval: Duration::from_secs(2),
            max_poll_attempts: 60,
        }
    }
}
