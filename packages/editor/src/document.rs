//! # Document Store
//!
//! Owns the in-memory project tree and asset catalog and writes them through
//! to a [`BackingStore`].
//!
//! ## Write path
//!
//! ```text
//! mutation → new tree → install + publish snapshot → save whole collection
//!                                                   ↓ (failure)
//!                                       error returned, memory keeps change
//! ```
//!
//! Every mutating call performs exactly one durable write of the complete
//! collection it touched. The in-memory state is updated first, so a failed
//! write leaves memory ahead of storage; the error is returned, never
//! swallowed.
//!
//! Subscribers receive whole [`Snapshot`]s, never a half-updated tree.

use crate::mutations::{ItemPath, ItemUpdate};
use crate::{EditorError, EditorResult};
use folio_common::Clock;
use folio_model::{Asset, Chapter, ItemKind, Page, Project};
use folio_storage::BackingStore;
use std::sync::Arc;
use tokio::sync::watch;

/// Consistent view of the library at one revision
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub projects: Arc<Vec<Project>>,
    pub assets: Arc<Vec<Asset>>,
    /// Increments on every installed change
    pub revision: u64,
}

/// Owning chain of a located entity
#[derive(Debug, Clone, Copy)]
pub enum Located<'a> {
    Project(&'a Project),
    Chapter {
        project: &'a Project,
        chapter: &'a Chapter,
    },
    Page {
        project: &'a Project,
        chapter: &'a Chapter,
        page: &'a Page,
    },
}

impl<'a> Located<'a> {
    pub fn kind(&self) -> ItemKind {
        match self {
            Located::Project(_) => ItemKind::Project,
            Located::Chapter { .. } => ItemKind::Chapter,
            Located::Page { .. } => ItemKind::Page,
        }
    }

    pub fn project(&self) -> &'a Project {
        match self {
            Located::Project(project)
            | Located::Chapter { project, .. }
            | Located::Page { project, .. } => project,
        }
    }

    pub fn chapter(&self) -> Option<&'a Chapter> {
        match self {
            Located::Project(_) => None,
            Located::Chapter { chapter, .. } | Located::Page { chapter, .. } => Some(chapter),
        }
    }

    pub fn page(&self) -> Option<&'a Page> {
        match self {
            Located::Page { page, .. } => Some(page),
            _ => None,
        }
    }

    pub fn id(&self) -> &'a str {
        match self {
            Located::Project(project) => &project.id,
            Located::Chapter { chapter, .. } => &chapter.id,
            Located::Page { page, .. } => &page.id,
        }
    }

    pub fn title(&self) -> &'a str {
        match self {
            Located::Project(project) => &project.title,
            Located::Chapter { chapter, .. } => &chapter.title,
            Located::Page { page, .. } => &page.title,
        }
    }

    pub fn updated_at(&self) -> chrono::DateTime<chrono::Utc> {
        match self {
            Located::Project(project) => project.updated_at,
            Located::Chapter { chapter, .. } => chapter.updated_at,
            Located::Page { page, .. } => page.updated_at,
        }
    }

    fn from_path(projects: &'a [Project], path: ItemPath) -> Self {
        let project = &projects[path.project];
        match (path.chapter, path.page) {
            (Some(c), Some(p)) => {
                let chapter = &project.chapters[c];
                Located::Page {
                    project,
                    chapter,
                    page: &chapter.pages[p],
                }
            }
            (Some(c), None) => Located::Chapter {
                project,
                chapter: &project.chapters[c],
            },
            _ => Located::Project(project),
        }
    }
}

/// In-memory library backed by durable storage
pub struct DocumentStore<S: BackingStore> {
    backing: S,
    clock: Arc<dyn Clock>,
    projects: Arc<Vec<Project>>,
    assets: Arc<Vec<Asset>>,
    revision: u64,
    publisher: watch::Sender<Snapshot>,
}

impl<S: BackingStore> DocumentStore<S> {
    /// Seed the backing store if needed and load both collections
    pub fn open(mut backing: S, clock: Arc<dyn Clock>) -> EditorResult<Self> {
        backing.seed_if_empty()?;
        let projects = Arc::new(backing.load_projects()?);
        let assets = Arc::new(backing.load_assets()?);

        tracing::debug!(
            projects = projects.len(),
            assets = assets.len(),
            "Loaded library"
        );

        let (publisher, _) = watch::channel(Snapshot {
            projects: projects.clone(),
            assets: assets.clone(),
            revision: 0,
        });

        Ok(Self {
            backing,
            clock,
            projects,
            assets,
            revision: 0,
            publisher,
        })
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn backing(&self) -> &S {
        &self.backing
    }

    pub fn backing_mut(&mut self) -> &mut S {
        &mut self.backing
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            projects: self.projects.clone(),
            assets: self.assets.clone(),
            revision: self.revision,
        }
    }

    /// Receive a fresh snapshot after every installed change
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.publisher.subscribe()
    }

    /// Locate an entity at any level, with its owning chain
    pub fn find_item(&self, id: &str) -> Option<Located<'_>> {
        ItemPath::locate(&self.projects, id).map(|path| Located::from_path(&self.projects, path))
    }

    pub fn find_asset(&self, id: &str) -> Option<&Asset> {
        self.assets.iter().find(|asset| asset.id == id)
    }

    /// Merge `update` into entity `id` and refresh its `updatedAt`
    pub fn update_item(&mut self, id: &str, update: ItemUpdate) -> EditorResult<()> {
        let mut next = self.projects.as_ref().clone();
        update.apply(&mut next, id, self.clock.as_ref())?;

        tracing::debug!(item_id = id, kind = %update.kind(), "Updated item");
        self.commit_projects(next)
    }

    /// Install a full replacement tree
    pub fn replace_all(&mut self, projects: Vec<Project>) -> EditorResult<()> {
        self.commit_projects(projects)
    }

    pub fn add_project(&mut self, project: Project) -> EditorResult<()> {
        let mut next = self.projects.as_ref().clone();
        next.push(project);
        self.commit_projects(next)
    }

    pub fn add_chapter(&mut self, project_id: &str, chapter: Chapter) -> EditorResult<()> {
        let mut next = self.projects.as_ref().clone();
        let project = next
            .iter_mut()
            .find(|project| project.id == project_id)
            .ok_or_else(|| EditorError::NotFound(project_id.to_string()))?;
        project.chapters.push(chapter);
        self.commit_projects(next)
    }

    pub fn add_page(&mut self, project_id: &str, chapter_id: &str, page: Page) -> EditorResult<()> {
        let mut next = self.projects.as_ref().clone();
        let project = next
            .iter_mut()
            .find(|project| project.id == project_id)
            .ok_or_else(|| EditorError::NotFound(project_id.to_string()))?;
        let chapter = project
            .chapters
            .iter_mut()
            .find(|chapter| chapter.id == chapter_id)
            .ok_or_else(|| EditorError::NotFound(chapter_id.to_string()))?;
        chapter.pages.push(page);
        self.commit_projects(next)
    }

    /// Append to the catalog and write the whole asset list
    pub fn add_asset(&mut self, asset: Asset) -> EditorResult<()> {
        let mut next = self.assets.as_ref().clone();
        next.push(asset);

        self.assets = Arc::new(next);
        self.publish();

        if let Err(e) = self.backing.save_assets(&self.assets) {
            tracing::error!(error = %e, revision = self.revision, "Failed to persist assets");
            return Err(EditorError::Persistence(e));
        }
        tracing::debug!(revision = self.revision, count = self.assets.len(), "Persisted assets");
        Ok(())
    }

    fn commit_projects(&mut self, projects: Vec<Project>) -> EditorResult<()> {
        self.projects = Arc::new(projects);
        self.publish();

        if let Err(e) = self.backing.save_projects(&self.projects) {
            tracing::error!(error = %e, revision = self.revision, "Failed to persist projects");
            return Err(EditorError::Persistence(e));
        }
        tracing::debug!(revision = self.revision, count = self.projects.len(), "Persisted projects");
        Ok(())
    }

    fn publish(&mut self) {
        self.revision += 1;
        self.publisher.send_replace(self.snapshot());
    }
}
