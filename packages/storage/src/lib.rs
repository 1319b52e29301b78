//! # Folio Storage
//!
//! Durable persistence behind the document store. Both collections are read
//! and written whole; there are no partial updates and no transactions, so
//! callers own read-modify-write correctness.

mod error;
mod json_file;
mod memory;
pub mod seed;

pub use error::{StorageError, StorageResult};
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use folio_model::{Asset, Project};

/// Whole-collection backing store
pub trait BackingStore {
    fn load_projects(&self) -> StorageResult<Vec<Project>>;

    fn load_assets(&self) -> StorageResult<Vec<Asset>>;

    fn save_projects(&mut self, projects: &[Project]) -> StorageResult<()>;

    fn save_assets(&mut self, assets: &[Asset]) -> StorageResult<()>;

    /// Populate each collection with default content if it has never been
    /// written. Collections are seeded independently.
    fn seed_if_empty(&mut self) -> StorageResult<()>;
}

impl<S: BackingStore + ?Sized> BackingStore for Box<S> {
    fn load_projects(&self) -> StorageResult<Vec<Project>> {
        (**self).load_projects()
    }

    fn load_assets(&self) -> StorageResult<Vec<Asset>> {
        (**self).load_assets()
    }

    fn save_projects(&mut self, projects: &[Project]) -> StorageResult<()> {
        (**self).save_projects(projects)
    }

    fn save_assets(&mut self, assets: &[Asset]) -> StorageResult<()> {
        (**self).save_assets(assets)
    }

    fn seed_if_empty(&mut self) -> StorageResult<()> {
        (**self).seed_if_empty()
    }
}
