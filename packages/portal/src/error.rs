use thiserror::Error;

/// Errors raised by the reading surface
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PortalError {
    #[error("Page not found in this project: {0}")]
    PageNotFound(String),
}

pub type PortalResult<T> = Result<T, PortalError>;
