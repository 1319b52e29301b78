//! # Folio Model
//!
//! Entities of the publishing library:
//!
//! ```text
//! Project ─┬─ Chapter ─┬─ Page (content may embed [[asset:<id>:<name>]])
//!          │           └─ Page
//!          └─ Chapter ── ...
//!
//! Asset catalog (flat, shared by every project)
//! ```
//!
//! Projects own their chapters and chapters own their pages; order is
//! table-of-contents order and never changes implicitly. Assets live outside
//! the hierarchy and are referenced by id from page content.

mod asset;
mod entities;
mod error;
pub mod selection;

pub use asset::{Asset, AssetData, AssetType};
pub use entities::{Chapter, ItemKind, Page, Project};
pub use error::{ModelError, ModelResult};
pub use selection::{Selection, SelectionError};

use chrono::{DateTime, Utc};
use folio_common::Clock;

/// Generate a fresh opaque entity id
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Timestamp for a mutation that must never move backwards
pub(crate) fn refreshed(previous: DateTime<Utc>, clock: &dyn Clock) -> DateTime<Utc> {
    clock.now().max(previous)
}

pub(crate) fn require_name(kind: &'static str, name: &str) -> ModelResult<String> {
    if name.trim().is_empty() {
        return Err(ModelError::EmptyName(kind));
    }
    Ok(name.to_string())
}
