use crate::{new_id, refreshed, require_name, ModelResult};
use chrono::{DateTime, Utc};
use folio_common::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which level of the hierarchy an item lives at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Project,
    Chapter,
    Page,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ItemKind::Project => "project",
            ItemKind::Chapter => "chapter",
            ItemKind::Page => "page",
        };
        f.write_str(name)
    }
}

/// Top-level publication
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
    #[serde(default)]
    pub is_published: bool,
}

/// Ordered section of a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub title: String,
    #[serde(default)]
    pub pages: Vec<Page>,
}

/// Unit of editable text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl Project {
    /// New unpublished project with no chapters
    pub fn new(title: &str, clock: &dyn Clock) -> ModelResult<Self> {
        Self::with_id(new_id(), title, clock)
    }

    pub fn with_id(id: impl Into<String>, title: &str, clock: &dyn Clock) -> ModelResult<Self> {
        let title = require_name("Project", title)?;
        let now = clock.now();
        Ok(Self {
            id: id.into(),
            created_at: now,
            updated_at: now,
            title,
            description: String::new(),
            chapters: Vec::new(),
            is_published: false,
        })
    }

    /// Refresh `updated_at` after one of this project's own fields changed
    pub fn touch(&mut self, clock: &dyn Clock) {
        self.updated_at = refreshed(self.updated_at, clock);
    }

    pub fn chapter(&self, id: &str) -> Option<&Chapter> {
        self.chapters.iter().find(|c| c.id == id)
    }

    /// All pages in table-of-contents order
    pub fn pages(&self) -> impl Iterator<Item = &Page> {
        self.chapters.iter().flat_map(|c| c.pages.iter())
    }

    pub fn first_page(&self) -> Option<&Page> {
        self.chapters.first().and_then(|c| c.pages.first())
    }
}

impl Chapter {
    /// New chapter with no pages
    pub fn new(title: &str, clock: &dyn Clock) -> ModelResult<Self> {
        Self::with_id(new_id(), title, clock)
    }

    pub fn with_id(id: impl Into<String>, title: &str, clock: &dyn Clock) -> ModelResult<Self> {
        let title = require_name("Chapter", title)?;
        let now = clock.now();
        Ok(Self {
            id: id.into(),
            created_at: now,
            updated_at: now,
            title,
            pages: Vec::new(),
        })
    }

    pub fn touch(&mut self, clock: &dyn Clock) {
        self.updated_at = refreshed(self.updated_at, clock);
    }

    pub fn page(&self, id: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.id == id)
    }
}

impl Page {
    /// New page with empty content
    pub fn new(title: &str, clock: &dyn Clock) -> ModelResult<Self> {
        Self::with_id(new_id(), title, clock)
    }

    pub fn with_id(id: impl Into<String>, title: &str, clock: &dyn Clock) -> ModelResult<Self> {
        let title = require_name("Page", title)?;
        let now = clock.now();
        Ok(Self {
            id: id.into(),
            created_at: now,
            updated_at: now,
            title,
            content: String::new(),
        })
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn touch(&mut self, clock: &dyn Clock) {
        self.updated_at = refreshed(self.updated_at, clock);
    }
}
