//! Error types for the editor

use folio_model::{ItemKind, ModelError, SelectionError};
use folio_references::ReferenceError;
use folio_storage::StorageError;
use thiserror::Error;

pub type EditorResult<T> = Result<T, EditorError>;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Item not found: {0}")]
    NotFound(String),

    #[error("Cannot apply a {update} update to {actual} '{id}'")]
    KindMismatch {
        id: String,
        actual: ItemKind,
        update: ItemKind,
    },

    /// The in-memory tree already holds the change; durable storage does not
    #[error("Persistence failed: {0}")]
    Persistence(#[from] StorageError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("Asset cannot be referenced: {0}")]
    Reference(#[from] ReferenceError),

    #[error("Invalid selection: {0}")]
    Selection(#[from] SelectionError),

    #[error("An AI edit is already in progress")]
    EditInFlight,

    #[error("No text is selected")]
    NoSelection,

    #[error("A {0} has no editable content")]
    NotEditable(ItemKind),
}
