use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Model tier for plain text generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    Fast,
    Quality,
}

/// Rewrite applied to a selected span of page content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditAction {
    Improve,
    Expand,
    Summarize,
}

impl EditAction {
    pub const ALL: [EditAction; 3] = [EditAction::Improve, EditAction::Expand, EditAction::Summarize];

    pub fn as_str(&self) -> &'static str {
        match self {
            EditAction::Improve => "improve",
            EditAction::Expand => "expand",
            EditAction::Summarize => "summarize",
        }
    }

    /// Past tense used in confirmations ("Text has been improved.")
    pub fn past_tense(&self) -> &'static str {
        match self {
            EditAction::Improve => "improved",
            EditAction::Expand => "expanded",
            EditAction::Summarize => "summarized",
        }
    }

    /// Prompt asking the model for the rewritten text only
    pub fn prompt(&self, text: &str) -> String {
        match self {
            EditAction::Improve => format!(
                "Rewrite the following text to be more clear, engaging, and grammatically correct. \
                 Do not add any explanatory preamble, just provide the improved text:\n\n\"{text}\""
            ),
            EditAction::Expand => format!(
                "Expand on the following idea or scene, adding more detail and description. \
                 Do not add any explanatory preamble, just provide the expanded text:\n\n\"{text}\""
            ),
            EditAction::Summarize => format!(
                "Summarize the following text concisely. \
                 Do not add any explanatory preamble, just provide the summary:\n\n\"{text}\""
            ),
        }
    }
}

impl fmt::Display for EditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EditAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EditAction::ALL
            .into_iter()
            .find(|action| action.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown edit action '{s}' (expected improve, expand or summarize)"))
    }
}

/// Output aspect ratio for image generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "3:4")]
    Portrait,
    #[serde(rename = "4:3")]
    Landscape,
    #[serde(rename = "9:16")]
    Tall,
    #[serde(rename = "16:9")]
    Wide,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 5] = [
        AspectRatio::Square,
        AspectRatio::Portrait,
        AspectRatio::Landscape,
        AspectRatio::Tall,
        AspectRatio::Wide,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Portrait => "3:4",
            AspectRatio::Landscape => "4:3",
            AspectRatio::Tall => "9:16",
            AspectRatio::Wide => "16:9",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AspectRatio::ALL
            .into_iter()
            .find(|ratio| ratio.as_str() == s)
            .ok_or_else(|| format!("unsupported aspect ratio '{s}'"))
    }
}

/// Web source backing a retrieval-grounded answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingSource {
    pub uri: String,
    pub title: String,
}

/// Answer produced with retrieval grounding
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GroundedText {
    pub text: String,
    pub sources: Vec<GroundingSource>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_action_parse() {
        assert_eq!("Expand".parse::<EditAction>().unwrap(), EditAction::Expand);
        assert!("shorten".parse::<EditAction>().is_err());
    }

    #[test]
    fn test_edit_prompt_quotes_text() {
        let prompt = EditAction::Summarize.prompt("A long tale.");
        assert!(prompt.starts_with("Summarize the following text concisely."));
        assert!(prompt.ends_with("\n\n\"A long tale.\""));
    }

    #[test]
    fn test_aspect_ratio_round_trip() {
        for ratio in AspectRatio::ALL {
            assert_eq!(ratio.as_str().parse::<AspectRatio>().unwrap(), ratio);
        }
        assert_eq!(serde_json::to_string(&AspectRatio::Wide).unwrap(), "\"16:9\"");
    }
}
