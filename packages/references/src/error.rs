use thiserror::Error;

pub type ReferenceResult<T> = Result<T, ReferenceError>;

/// Reasons an asset mention cannot be written as a token
///
/// The token format has no escaping, so anything that would be read back
/// differently is rejected up front.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReferenceError {
    #[error("Asset id must not be empty")]
    EmptyId,

    #[error("Asset id '{0}' contains a reserved character (':', '[', ']' or a line break)")]
    InvalidId(String),

    #[error("Display name '{0}' cannot be embedded (empty, contains ']]' or a line break)")]
    InvalidName(String),
}
