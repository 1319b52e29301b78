//! Published listing and project resolution
//!
//! A project is visible to readers only while `isPublished` is set. Resolving
//! anything else, including ids that exist but are unpublished, yields the
//! same not-found state so readers cannot probe for drafts.

use crate::reading::ReadingView;
use folio_model::{Asset, Project};
use serde::Serialize;

/// Shown when nothing is published
pub const EMPTY_LIBRARY_MESSAGE: &str = "No works have been published yet.";

pub const NOT_FOUND_MESSAGE: &str = "Project not found or not published.";

/// Route of the library listing
pub const LIBRARY_HREF: &str = "/";

/// One card in the listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingEntry<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub description: &'a str,
}

impl<'a> ListingEntry<'a> {
    /// Route that opens this project
    pub fn href(&self) -> String {
        format!("/project/{}", self.id)
    }
}

/// Not-found state with a way back to the listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotFoundView {
    pub project_id: String,
    pub message: &'static str,
    pub back_href: &'static str,
    pub back_label: &'static str,
}

impl NotFoundView {
    fn new(project_id: &str) -> Self {
        Self {
            project_id: project_id.to_string(),
            message: NOT_FOUND_MESSAGE,
            back_href: LIBRARY_HREF,
            back_label: "Return to library",
        }
    }
}

#[derive(Debug, Clone)]
pub enum Resolution<'a> {
    Found(ReadingView<'a>),
    NotFound(NotFoundView),
}

impl<'a> Resolution<'a> {
    pub fn view(&self) -> Option<&ReadingView<'a>> {
        match self {
            Resolution::Found(view) => Some(view),
            Resolution::NotFound(_) => None,
        }
    }

    pub fn into_view(self) -> Option<ReadingView<'a>> {
        match self {
            Resolution::Found(view) => Some(view),
            Resolution::NotFound(_) => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Resolution::NotFound(_))
    }
}

/// Reader-facing view over a library snapshot
#[derive(Debug, Clone, Copy)]
pub struct Library<'a> {
    projects: &'a [Project],
    assets: &'a [Asset],
}

impl<'a> Library<'a> {
    pub fn new(projects: &'a [Project], assets: &'a [Asset]) -> Self {
        Self { projects, assets }
    }

    /// Published projects in library order
    pub fn published(&self) -> impl Iterator<Item = &'a Project> {
        self.projects.iter().filter(|project| project.is_published)
    }

    pub fn listing(&self) -> Vec<ListingEntry<'a>> {
        self.published()
            .map(|project| ListingEntry {
                id: &project.id,
                title: &project.title,
                description: &project.description,
            })
            .collect()
    }

    /// Message to show instead of the listing, if any
    pub fn empty_message(&self) -> Option<&'static str> {
        match self.published().next() {
            Some(_) => None,
            None => Some(EMPTY_LIBRARY_MESSAGE),
        }
    }

    pub fn resolve(&self, project_id: &str) -> Resolution<'a> {
        match self.published().find(|project| project.id == project_id) {
            Some(project) => Resolution::Found(ReadingView::new(project, self.assets)),
            None => {
                tracing::debug!(project_id, "Project is missing or unpublished");
                Resolution::NotFound(NotFoundView::new(project_id))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_common::ManualClock;

    fn project(title: &str, published: bool) -> Project {
        let clock = ManualClock::default();
        let mut project = Project::new(title, &clock).unwrap();
        project.is_published = published;
        project
    }

    #[test]
    fn test_listing_only_shows_published() {
        let projects = vec![project("Draft", false), project("Out Now", true)];
        let library = Library::new(&projects, &[]);

        let listing = library.listing();
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].title, "Out Now");
        assert_eq!(listing[0].href(), format!("/project/{}", projects[1].id));
        assert!(library.empty_message().is_none());
    }

    #[test]
    fn test_empty_library_message() {
        let projects = vec![project("Draft", false)];
        let library = Library::new(&projects, &[]);
        assert_eq!(library.empty_message(), Some("No works have been published yet."));
    }

    #[test]
    fn test_unpublished_project_is_not_found() {
        let projects = vec![project("Draft", false)];
        let library = Library::new(&projects, &[]);

        match library.resolve(&projects[0].id) {
            Resolution::NotFound(view) => {
                assert_eq!(view.message, "Project not found or not published.");
                assert_eq!(view.back_href, "/");
                assert_eq!(view.back_label, "Return to library");
            }
            Resolution::Found(_) => panic!("draft should not resolve"),
        }
    }

    #[test]
    fn test_unknown_project_is_not_found() {
        let library = Library::new(&[], &[]);
        assert!(library.resolve("nope").is_not_found());
    }
}
