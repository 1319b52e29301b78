//! # Folio AI
//!
//! Generative-AI collaborator for the editor: text generation, in-line
//! rewrites, image understanding and generation, speech synthesis and live
//! voice conversation.
//!
//! Every operation returns [`AiResult`]. A backend without credentials
//! reports [`AiError::NotConfigured`] without touching the network.

pub mod assistant;
pub mod audio;
mod error;
mod gemini;
pub mod live;
mod settings;
mod types;

pub use assistant::{AssistantReply, WritingMode};
pub use error::{AiError, AiResult};
pub use gemini::GeminiClient;
pub use live::{LiveCommand, LiveEvent, LiveSession, TranscriptAccumulator, Turn};
pub use settings::{AiSettings, FALLBACK_API_KEY_ENV};
pub use types::{AspectRatio, EditAction, GroundedText, GroundingSource, QualityTier};

use async_trait::async_trait;

/// Generative-AI backend
#[async_trait]
pub trait AiBackend: Send + Sync {
    async fn generate_text(&self, prompt: &str, tier: QualityTier) -> AiResult<String>;

    /// Slower generation with an extended reasoning budget
    async fn generate_with_reasoning(&self, prompt: &str) -> AiResult<String>;

    /// Generation grounded on web search results
    async fn generate_with_retrieval(&self, prompt: &str) -> AiResult<GroundedText>;

    /// Rewrite `text`; the result is trimmed
    async fn edit_text(&self, text: &str, action: EditAction) -> AiResult<String>;

    async fn analyze_image(&self, prompt: &str, image: &[u8], mime_type: &str) -> AiResult<String>;

    /// Generated image as JPEG bytes
    async fn generate_image(&self, prompt: &str, aspect_ratio: AspectRatio) -> AiResult<Vec<u8>>;

    /// Synthesized speech as 24 kHz 16-bit LE mono PCM
    async fn synthesize_speech(&self, text: &str) -> AiResult<Vec<u8>>;

    async fn open_live_session(&self) -> AiResult<LiveSession>;
}
