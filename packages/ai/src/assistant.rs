//! Writing assistant modes

use crate::{AiBackend, AiResult, GroundingSource, QualityTier};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WritingMode {
    /// Fast-tier generation
    #[default]
    Fast,
    /// Extended reasoning
    Complex,
    /// Search-grounded, with sources
    Research,
}

impl WritingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WritingMode::Fast => "fast",
            WritingMode::Complex => "complex",
            WritingMode::Research => "research",
        }
    }

    /// Run a prompt in this mode
    pub async fn run(&self, backend: &dyn AiBackend, prompt: &str) -> AiResult<AssistantReply> {
        tracing::debug!(mode = self.as_str(), "Running writing assistant");
        match self {
            WritingMode::Fast => Ok(AssistantReply::plain(
                backend.generate_text(prompt, QualityTier::Fast).await?,
            )),
            WritingMode::Complex => Ok(AssistantReply::plain(
                backend.generate_with_reasoning(prompt).await?,
            )),
            WritingMode::Research => {
                let grounded = backend.generate_with_retrieval(prompt).await?;
                Ok(AssistantReply {
                    text: grounded.text,
                    sources: grounded.sources,
                })
            }
        }
    }
}

impl fmt::Display for WritingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WritingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fast" => Ok(WritingMode::Fast),
            "complex" => Ok(WritingMode::Complex),
            "research" => Ok(WritingMode::Research),
            other => Err(format!("unknown writing mode '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantReply {
    pub text: String,
    pub sources: Vec<GroundingSource>,
}

impl AssistantReply {
    fn plain(text: String) -> Self {
        Self {
            text,
            sources: Vec::new(),
        }
    }
}
