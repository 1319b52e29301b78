use crate::{seed, BackingStore, StorageError, StorageResult};
use folio_common::{Clock, SystemClock};
use folio_model::{Asset, Project};
use std::sync::Arc;

/// In-memory backing store for tests and embedding hosts
///
/// Counts every write and can be switched into a failing mode to exercise
/// persistence-failure paths.
pub struct MemoryStore {
    projects: Option<Vec<Project>>,
    assets: Option<Vec<Asset>>,
    clock: Arc<dyn Clock>,
    project_writes: usize,
    asset_writes: usize,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            projects: None,
            assets: None,
            clock,
            project_writes: 0,
            asset_writes: 0,
            fail_writes: false,
        }
    }

    /// Store pre-populated with the given collections
    pub fn with_data(projects: Vec<Project>, assets: Vec<Asset>) -> Self {
        let mut store = Self::new();
        store.projects = Some(projects);
        store.assets = Some(assets);
        store
    }

    /// Make every subsequent save fail with [`StorageError::Unavailable`]
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn project_writes(&self) -> usize {
        self.project_writes
    }

    pub fn asset_writes(&self) -> usize {
        self.asset_writes
    }

    /// Last successfully written project list
    pub fn stored_projects(&self) -> &[Project] {
        self.projects.as_deref().unwrap_or_default()
    }

    pub fn stored_assets(&self) -> &[Asset] {
        self.assets.as_deref().unwrap_or_default()
    }

    fn check_writable(&self) -> StorageResult<()> {
        if self.fail_writes {
            return Err(StorageError::Unavailable(
                "memory store is rejecting writes".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BackingStore for MemoryStore {
    fn load_projects(&self) -> StorageResult<Vec<Project>> {
        Ok(self.projects.clone().unwrap_or_default())
    }

    fn load_assets(&self) -> StorageResult<Vec<Asset>> {
        Ok(self.assets.clone().unwrap_or_default())
    }

    fn save_projects(&mut self, projects: &[Project]) -> StorageResult<()> {
        self.check_writable()?;
        self.projects = Some(projects.to_vec());
        self.project_writes += 1;
        tracing::debug!(count = projects.len(), writes = self.project_writes, "Stored projects in memory");
        Ok(())
    }

    fn save_assets(&mut self, assets: &[Asset]) -> StorageResult<()> {
        self.check_writable()?;
        self.assets = Some(assets.to_vec());
        self.asset_writes += 1;
        tracing::debug!(count = assets.len(), writes = self.asset_writes, "Stored assets in memory");
        Ok(())
    }

    fn seed_if_empty(&mut self) -> StorageResult<()> {
        if self.projects.is_none() {
            let projects = seed::seed_projects(self.clock.as_ref())
                .map_err(|e| StorageError::Unavailable(e.to_string()))?;
            self.projects = Some(projects);
        }
        if self.assets.is_none() {
            let assets = seed::seed_assets(self.clock.as_ref())
                .map_err(|e| StorageError::Unavailable(e.to_string()))?;
            self.assets = Some(assets);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_common::ManualClock;

    #[test]
    fn test_empty_store_loads_nothing() {
        let store = MemoryStore::new();
        assert!(store.load_projects().unwrap().is_empty());
        assert!(store.load_assets().unwrap().is_empty());
    }

    #[test]
    fn test_seed_only_fills_missing_collections() {
        let clock = Arc::new(ManualClock::default());
        let mut store = MemoryStore::with_clock(clock.clone());
        store.save_assets(&[]).unwrap();

        store.seed_if_empty().unwrap();

        assert_eq!(store.load_projects().unwrap().len(), 1);
        assert!(store.load_assets().unwrap().is_empty());
    }

    #[test]
    fn test_seed_does_not_count_as_write() {
        let mut store = MemoryStore::new();
        store.seed_if_empty().unwrap();
        assert_eq!(store.project_writes(), 0);
        assert_eq!(store.asset_writes(), 0);
    }

    #[test]
    fn test_failing_writes_keep_previous_state() {
        let clock = ManualClock::default();
        let project = Project::new("Draft", &clock).unwrap();
        let mut store = MemoryStore::new();
        store.save_projects(&[project]).unwrap();

        store.set_fail_writes(true);
        let err = store.save_projects(&[]).unwrap_err();

        assert!(matches!(err, StorageError::Unavailable(_)));
        assert_eq!(store.stored_projects().len(), 1);
        assert_eq!(store.project_writes(), 1);
    }
}
