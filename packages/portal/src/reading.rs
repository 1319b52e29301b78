//! Reading view of one published project

use crate::{PortalError, PortalResult};
use folio_model::{Asset, Chapter, Page, Project};
use folio_references::{Activation, Rendered, Renderer};
use serde::Serialize;

/// Chapter heading in the table of contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TocChapter<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub pages: Vec<TocPage<'a>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TocPage<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub active: bool,
}

/// A reference whose asset is missing from the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DanglingReference<'a> {
    pub chapter_id: &'a str,
    pub page_id: &'a str,
    pub asset_id: &'a str,
    pub display_name: &'a str,
}

#[derive(Debug, Clone)]
pub struct ReadingView<'a> {
    project: &'a Project,
    renderer: Renderer<'a>,
    active: Option<(usize, usize)>,
}

impl<'a> ReadingView<'a> {
    /// Opens on the first page of the first chapter, if there is one
    pub fn new(project: &'a Project, assets: &'a [Asset]) -> Self {
        let active = project
            .chapters
            .first()
            .filter(|chapter| !chapter.pages.is_empty())
            .map(|_| (0, 0));

        Self {
            project,
            renderer: Renderer::new(assets),
            active,
        }
    }

    pub fn project(&self) -> &'a Project {
        self.project
    }

    pub fn renderer(&self) -> &Renderer<'a> {
        &self.renderer
    }

    pub fn active_page(&self) -> Option<&'a Page> {
        let (c, p) = self.active?;
        let project = self.project;
        Some(&project.chapters[c].pages[p])
    }

    pub fn active_chapter(&self) -> Option<&'a Chapter> {
        let (c, _) = self.active?;
        let project = self.project;
        Some(&project.chapters[c])
    }

    pub fn select_page(&mut self, page_id: &str) -> PortalResult<&'a Page> {
        let project = self.project;
        for (c, chapter) in project.chapters.iter().enumerate() {
            if let Some(p) = chapter.pages.iter().position(|page| page.id == page_id) {
                self.active = Some((c, p));
                return Ok(&chapter.pages[p]);
            }
        }
        Err(PortalError::PageNotFound(page_id.to_string()))
    }

    pub fn table_of_contents(&self) -> Vec<TocChapter<'a>> {
        let project = self.project;
        let active_id = self.active_page().map(|page| page.id.as_str());
        project
            .chapters
            .iter()
            .map(|chapter| TocChapter {
                id: &chapter.id,
                title: &chapter.title,
                pages: chapter
                    .pages
                    .iter()
                    .map(|page| TocPage {
                        id: &page.id,
                        title: &page.title,
                        active: Some(page.id.as_str()) == active_id,
                    })
                    .collect(),
            })
            .collect()
    }

    /// Segments of the active page's content
    pub fn render_active(&self) -> Option<Rendered<'_, 'a, 'a>> {
        self.active_page()
            .map(|page| self.renderer.render(&page.content))
    }

    /// What activating a mention shows
    pub fn open_asset(&self, asset_id: &str) -> Activation<'a> {
        let activation = self.renderer.activate(asset_id);
        if activation.is_not_found() {
            tracing::warn!(asset_id, project_id = %self.project.id, "Mention points at a missing asset");
        }
        activation
    }

    /// Every unresolved mention across the project, in reading order
    pub fn dangling_references(&self) -> Vec<DanglingReference<'a>> {
        let project = self.project;
        let mut found = Vec::new();
        for chapter in &project.chapters {
            for page in &chapter.pages {
                for reference in folio_references::references(&page.content) {
                    if !self.renderer.index().contains(reference.id) {
                        found.push(DanglingReference {
                            chapter_id: &chapter.id,
                            page_id: &page.id,
                            asset_id: reference.id,
                            display_name: reference.name,
                        });
                    }
                }
            }
        }
        found
    }
}
