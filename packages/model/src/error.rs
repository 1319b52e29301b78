use thiserror::Error;

pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("{0} name must not be empty")]
    EmptyName(&'static str),

    #[error("Unknown asset type '{0}'. Must be one of: character, location, item, image")]
    UnknownAssetType(String),
}
