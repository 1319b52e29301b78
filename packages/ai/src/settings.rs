use serde::{Deserialize, Serialize};

/// Fallback variable consulted when the configured one is unset
pub const FALLBACK_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Generative-AI backend settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiSettings {
    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_fast_model")]
    pub fast_model: String,

    #[serde(default = "default_reasoning_model")]
    pub reasoning_model: String,

    #[serde(default = "default_image_model")]
    pub image_model: String,

    #[serde(default = "default_speech_model")]
    pub speech_model: String,

    #[serde(default = "default_live_model")]
    pub live_model: String,

    /// Prebuilt voice for speech synthesis
    #[serde(default = "default_voice")]
    pub voice: String,

    #[serde(default = "default_thinking_budget")]
    pub thinking_budget: u32,

    /// REST endpoint root
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// WebSocket endpoint root for live sessions
    #[serde(default = "default_live_url")]
    pub live_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_key_env() -> String {
    "API_KEY".to_string()
}

fn default_fast_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_reasoning_model() -> String {
    "gemini-2.5-pro".to_string()
}

fn default_image_model() -> String {
    "imagen-4.0-generate-001".to_string()
}

fn default_speech_model() -> String {
    "gemini-2.5-flash-preview-tts".to_string()
}

fn default_live_model() -> String {
    "gemini-2.5-flash-native-audio-preview-09-2025".to_string()
}

fn default_voice() -> String {
    "Kore".to_string()
}

fn default_thinking_budget() -> u32 {
    32768
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_live_url() -> String {
    "wss://generativelanguage.googleapis.com".to_string()
}

fn default_timeout_secs() -> u64 {
    300
}

impl AiSettings {
    /// Read the API key from the environment
    ///
    /// Blank values count as absent.
    pub fn api_key_from_env(&self) -> Option<String> {
        [self.api_key_env.as_str(), FALLBACK_API_KEY_ENV]
            .into_iter()
            .filter_map(|name| std::env::var(name).ok())
            .map(|key| key.trim().to_string())
            .find(|key| !key.is_empty())
    }
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            fast_model: default_fast_model(),
            reasoning_model: default_reasoning_model(),
            image_model: default_image_model(),
            speech_model: default_speech_model(),
            live_model: default_live_model(),
            voice: default_voice(),
            thinking_budget: default_thinking_budget(),
            base_url: default_base_url(),
            live_url: default_live_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
