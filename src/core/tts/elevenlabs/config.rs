//! ElevenLabs client configuration

/// Default ElevenLabs API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.elevenlabs.io";

/// Default voice used when none is configured.
pub const DEFAULT_VOICE_ID: &str = "DMyrgzQFny3JI1Y1paM5";

/// Configuration for the ElevenLabs synthesis client.
#[derive(Debug, Clone)]
pub struct ElevenLabsConfig {
    /// API key; `None` disables the provider.
    pub api_key: Option<String>,

    /// API base URL, overridable for proxies and tests.
    pub base_url: String,

    /// Voice to synthesize with.
    pub voice_id: String,
}

impl Default for ElevenLabsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            voice_id: DEFAULT_VOICE_ID.to_string(),
        }
    }
}
