use crate::{seed, BackingStore, StorageError, StorageResult};
use folio_common::{Clock, SystemClock};
use folio_model::{Asset, Project};
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

const PROJECTS_FILE: &str = "projects.json";
const ASSETS_FILE: &str = "assets.json";

/// Backing store keeping each collection in its own JSON file
///
/// Writes go to a sibling temp file first and are renamed into place, so a
/// reader never sees a half-written collection.
pub struct JsonFileStore {
    dir: PathBuf,
    clock: Arc<dyn Clock>,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_clock(dir, Arc::new(SystemClock))
    }

    pub fn with_clock(dir: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            dir: dir.into(),
            clock,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn projects_path(&self) -> PathBuf {
        self.dir.join(PROJECTS_FILE)
    }

    pub fn assets_path(&self) -> PathBuf {
        self.dir.join(ASSETS_FILE)
    }

    fn read_collection<T: DeserializeOwned>(path: &Path) -> StorageResult<Vec<T>> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn write_collection<T: Serialize>(&self, path: &Path, items: &[T]) -> StorageResult<()> {
        let start = Instant::now();
        fs::create_dir_all(&self.dir)?;

        let json = serde_json::to_string_pretty(items)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json.as_bytes())?;
        fs::rename(&tmp, path)?;

        tracing::debug!(
            path = %path.display(),
            count = items.len(),
            bytes = json.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "Wrote collection"
        );
        Ok(())
    }
}

impl BackingStore for JsonFileStore {
    fn load_projects(&self) -> StorageResult<Vec<Project>> {
        Self::read_collection(&self.projects_path())
    }

    fn load_assets(&self) -> StorageResult<Vec<Asset>> {
        Self::read_collection(&self.assets_path())
    }

    fn save_projects(&mut self, projects: &[Project]) -> StorageResult<()> {
        let path = self.projects_path();
        self.write_collection(&path, projects)
    }

    fn save_assets(&mut self, assets: &[Asset]) -> StorageResult<()> {
        let path = self.assets_path();
        self.write_collection(&path, assets)
    }

    fn seed_if_empty(&mut self) -> StorageResult<()> {
        if !self.projects_path().exists() {
            let projects = seed::seed_projects(self.clock.as_ref())
                .map_err(|e| StorageError::Unavailable(e.to_string()))?;
            tracing::info!(dir = %self.dir.display(), "Seeding default projects");
            self.save_projects(&projects)?;
        }
        if !self.assets_path().exists() {
            let assets = seed::seed_assets(self.clock.as_ref())
                .map_err(|e| StorageError::Unavailable(e.to_string()))?;
            tracing::info!(dir = %self.dir.display(), "Seeding default assets");
            self.save_assets(&assets)?;
        }
        Ok(())
    }
}
