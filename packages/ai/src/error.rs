use thiserror::Error;

pub type AiResult<T> = Result<T, AiError>;

/// Failure of a generative-AI operation
///
/// Every operation returns one of these instead of panicking; callers turn
/// them into notifications and skip the operation's effect.
#[derive(Error, Debug)]
pub enum AiError {
    #[error("API Key not configured.")]
    NotConfigured,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Live session error: {0}")]
    Session(String),
}

impl From<base64::DecodeError> for AiError {
    fn from(e: base64::DecodeError) -> Self {
        AiError::InvalidResponse(format!("invalid base64 payload: {e}"))
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for AiError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        AiError::Session(e.to_string())
    }
}
