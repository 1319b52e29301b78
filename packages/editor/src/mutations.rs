//! # Item Updates
//!
//! Field patches for one entity of the project tree. The variant names the
//! level the patch targets, so applying it never guesses the entity kind
//! from which fields happen to be present.
//!
//! Only the targeted entity's `updatedAt` moves. Parents and siblings keep
//! their timestamps even when a child changes.

use crate::{EditorError, EditorResult};
use folio_common::Clock;
use folio_model::{ItemKind, Project};
use serde::{Deserialize, Serialize};

/// Patch for a single project, chapter or page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ItemUpdate {
    #[serde(rename_all = "camelCase")]
    Project {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        is_published: Option<bool>,
    },

    Chapter {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },

    Page {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
    },
}

impl ItemUpdate {
    /// Title change for an entity of the given kind
    pub fn title(kind: ItemKind, title: impl Into<String>) -> Self {
        let title = Some(title.into());
        match kind {
            ItemKind::Project => ItemUpdate::Project {
                title,
                description: None,
                is_published: None,
            },
            ItemKind::Chapter => ItemUpdate::Chapter { title },
            ItemKind::Page => ItemUpdate::Page {
                title,
                content: None,
            },
        }
    }

    pub fn page_content(content: impl Into<String>) -> Self {
        ItemUpdate::Page {
            title: None,
            content: Some(content.into()),
        }
    }

    pub fn project_description(description: impl Into<String>) -> Self {
        ItemUpdate::Project {
            title: None,
            description: Some(description.into()),
            is_published: None,
        }
    }

    pub fn publish(is_published: bool) -> Self {
        ItemUpdate::Project {
            title: None,
            description: None,
            is_published: Some(is_published),
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            ItemUpdate::Project { .. } => ItemKind::Project,
            ItemUpdate::Chapter { .. } => ItemKind::Chapter,
            ItemUpdate::Page { .. } => ItemKind::Page,
        }
    }

    /// Apply to the entity `id` inside `projects`
    ///
    /// Validates before touching anything, so on error the tree is unchanged.
    pub fn apply(&self, projects: &mut [Project], id: &str, clock: &dyn Clock) -> EditorResult<()> {
        let path = ItemPath::locate(projects, id).ok_or_else(|| EditorError::NotFound(id.to_string()))?;

        if path.kind() != self.kind() {
            return Err(EditorError::KindMismatch {
                id: id.to_string(),
                actual: path.kind(),
                update: self.kind(),
            });
        }

        let project = &mut projects[path.project];
        match self {
            ItemUpdate::Project {
                title,
                description,
                is_published,
            } => {
                if let Some(title) = title {
                    project.title = title.clone();
                }
                if let Some(description) = description {
                    project.description = description.clone();
                }
                if let Some(is_published) = is_published {
                    project.is_published = *is_published;
                }
                project.touch(clock);
            }

            ItemUpdate::Chapter { title } => {
                let chapter = &mut project.chapters[path.chapter.unwrap_or_default()];
                if let Some(title) = title {
                    chapter.title = title.clone();
                }
                chapter.touch(clock);
            }

            ItemUpdate::Page { title, content } => {
                let chapter = &mut project.chapters[path.chapter.unwrap_or_default()];
                let page = &mut chapter.pages[path.page.unwrap_or_default()];
                if let Some(title) = title {
                    page.title = title.clone();
                }
                if let Some(content) = content {
                    page.content = content.clone();
                }
                page.touch(clock);
            }
        }

        Ok(())
    }
}

/// Index path of an entity within the project list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ItemPath {
    pub project: usize,
    pub chapter: Option<usize>,
    pub page: Option<usize>,
}

impl ItemPath {
    /// First entity with this id, walking projects, then their chapters, then
    /// their pages, in tree order
    pub fn locate(projects: &[Project], id: &str) -> Option<Self> {
        for (p, project) in projects.iter().enumerate() {
            if project.id == id {
                return Some(Self {
                    project: p,
                    chapter: None,
                    page: None,
                });
            }
            for (c, chapter) in project.chapters.iter().enumerate() {
                if chapter.id == id {
                    return Some(Self {
                        project: p,
                        chapter: Some(c),
                        page: None,
                    });
                }
                if let Some(pg) = chapter.pages.iter().position(|page| page.id == id) {
                    return Some(Self {
                        project: p,
                        chapter: Some(c),
                        page: Some(pg),
                    });
                }
            }
        }
        None
    }

    pub fn kind(&self) -> ItemKind {
        match (self.chapter, self.page) {
            (_, Some(_)) => ItemKind::Page,
            (Some(_), None) => ItemKind::Chapter,
            (None, None) => ItemKind::Project,
        }
    }
}
