//! # Edit Session
//!
//! Everything one editor instance holds: the document store, the item open
//! for editing, its autosave controller, the current text selection, the
//! inline-edit guard and pending notices.
//!
//! Content edits from any source (typing, AI splices, asset insertion) go
//! through the same autosave path. Title, description and publication edits
//! are written immediately.

use crate::autosave::{AutosaveConfig, AutosaveController, SaveReport, SaveStatus};
use crate::document::{DocumentStore, Located};
use crate::inline_edit::{EditTicket, InlineEditGuard, InlineEditOutcome};
use crate::mutations::ItemUpdate;
use crate::notice::Notice;
use crate::{EditorError, EditorResult};
use folio_ai::{AiBackend, AiResult, EditAction};
use folio_model::{selection, Asset, AssetType, Chapter, ItemKind, Page, Project, Selection};
use folio_references::encode;
use folio_storage::BackingStore;
use std::time::Instant;

/// Longest prompt prefix used to name a generated image asset
const IMAGE_NAME_CHARS: usize = 30;

pub struct EditSession<S: BackingStore> {
    store: DocumentStore<S>,
    autosave: AutosaveController,
    active: Option<String>,
    selection: Option<Selection>,
    inline: InlineEditGuard,
    notices: Vec<Notice>,
}

impl<S: BackingStore> EditSession<S> {
    pub fn new(store: DocumentStore<S>, config: AutosaveConfig) -> Self {
        Self {
            store,
            autosave: AutosaveController::new(config),
            active: None,
            selection: None,
            inline: InlineEditGuard::new(),
            notices: Vec::new(),
        }
    }

    pub fn store(&self) -> &DocumentStore<S> {
        &self.store
    }

    /// Direct store access for edits that bypass the open item
    pub fn store_mut(&mut self) -> &mut DocumentStore<S> {
        &mut self.store
    }

    pub fn active_item(&self) -> Option<Located<'_>> {
        self.active.as_deref().and_then(|id| self.store.find_item(id))
    }

    /// Editor content of the open page, including unsaved edits
    pub fn content(&self) -> Option<&str> {
        match self.active_item()?.kind() {
            ItemKind::Page => Some(self.autosave.content()),
            _ => None,
        }
    }

    pub fn status(&self) -> SaveStatus {
        self.autosave.status()
    }

    pub fn status_text(&self) -> String {
        self.autosave
            .status_text(self.active_item().map(|item| item.updated_at()))
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.autosave.next_deadline()
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn is_edit_in_flight(&self) -> bool {
        self.inline.is_in_flight()
    }

    /// Take every notice raised since the last drain
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Open an item, abandoning any unsaved edit to the previous one
    pub fn select_item(&mut self, id: &str) -> EditorResult<ItemKind> {
        let located = self
            .store
            .find_item(id)
            .ok_or_else(|| EditorError::NotFound(id.to_string()))?;
        let kind = located.kind();
        let content = located.page().map(|page| page.content.clone()).unwrap_or_default();

        self.autosave.bind(Some(id), &content);
        self.active = Some(id.to_string());
        self.selection = None;
        self.inline.cancel();

        tracing::debug!(item_id = id, %kind, "Selected item");
        Ok(kind)
    }

    /// Replace the open page's content as a keystroke would
    pub fn type_content(&mut self, content: impl Into<String>, now: Instant) -> EditorResult<()> {
        self.require_page()?;
        self.selection = None;
        self.autosave.on_content_change(content.into(), now);
        Ok(())
    }

    /// Advance autosave timers
    pub fn poll(&mut self, now: Instant) -> EditorResult<Option<SaveReport>> {
        self.autosave.poll(now, &mut self.store)
    }

    /// Commit a pending edit without waiting for the debounce
    pub fn flush(&mut self, now: Instant) -> EditorResult<Option<SaveReport>> {
        self.autosave.flush(now, &mut self.store)
    }

    /// Rename the open item, written immediately
    pub fn rename(&mut self, title: &str) -> EditorResult<()> {
        let (id, kind) = self.require_active()?;
        self.store.update_item(&id, ItemUpdate::title(kind, title))
    }

    pub fn set_description(&mut self, project_id: &str, description: &str) -> EditorResult<()> {
        self.store
            .update_item(project_id, ItemUpdate::project_description(description))
    }

    pub fn set_published(&mut self, project_id: &str, is_published: bool) -> EditorResult<()> {
        self.store
            .update_item(project_id, ItemUpdate::publish(is_published))
    }

    pub fn create_project(&mut self, title: &str) -> EditorResult<Project> {
        let project = Project::new(title, self.store.clock())?;
        self.store.add_project(project.clone())?;
        self.notices
            .push(Notice::success(format!("Project \"{}\" created", project.title)));
        Ok(project)
    }

    pub fn create_chapter(&mut self, project_id: &str, title: &str) -> EditorResult<Chapter> {
        let chapter = Chapter::new(title, self.store.clock())?;
        self.store.add_chapter(project_id, chapter.clone())?;
        Ok(chapter)
    }

    pub fn create_page(&mut self, project_id: &str, chapter_id: &str, title: &str) -> EditorResult<Page> {
        let page = Page::new(title, self.store.clock())?;
        self.store.add_page(project_id, chapter_id, page.clone())?;
        Ok(page)
    }

    pub fn create_asset(&mut self, name: &str, asset_type: AssetType, description: &str) -> EditorResult<Asset> {
        let asset = Asset::new(name, asset_type, self.store.clock())?.with_description(description);
        self.store.add_asset(asset.clone())?;
        self.notices
            .push(Notice::success(format!("Asset \"{}\" created.", asset.name)));
        Ok(asset)
    }

    /// Store a generated JPEG as an image asset named after its prompt
    pub fn save_generated_image(&mut self, prompt: &str, jpeg: &[u8]) -> EditorResult<Asset> {
        let name: String = prompt.trim().chars().take(IMAGE_NAME_CHARS).collect();
        let name = if name.trim().is_empty() {
            "Generated Image".to_string()
        } else {
            name
        };
        let url = format!(
            "data:image/jpeg;base64,{}",
            folio_ai::audio::encode_base64(jpeg)
        );

        let asset = Asset::new(&name, AssetType::Image, self.store.clock())?
            .with_description(prompt)
            .with_image_url(url);
        self.store.add_asset(asset.clone())?;
        self.notices.push(Notice::success("Image saved to assets!"));
        Ok(asset)
    }

    /// Capture a selection of the open page's current content
    pub fn select_text(&mut self, start: usize, end: usize) -> EditorResult<&Selection> {
        let content = self.require_page_content()?;
        let selection = Selection::capture(content, start, end)?;
        Ok(self.selection.insert(selection))
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Insert a reference token for `asset_id` at byte `offset`
    pub fn insert_asset_reference(&mut self, asset_id: &str, offset: usize, now: Instant) -> EditorResult<()> {
        let asset = self
            .store
            .find_asset(asset_id)
            .ok_or_else(|| EditorError::NotFound(asset_id.to_string()))?;
        let token = encode(&asset.id, &asset.name)?;

        let content = selection::insert_at(self.require_page_content()?, offset, &token)?;
        self.type_content(content, now)
    }

    /// Start an inline edit of the current selection
    pub fn begin_inline_edit(&mut self, action: EditAction) -> EditorResult<EditTicket> {
        let (id, _) = self.require_active()?;
        self.require_page()?;
        let selection = self.selection.clone().ok_or(EditorError::NoSelection)?;

        self.inline
            .begin(&id, self.autosave.revision(), selection, action)
    }

    /// Give up on the outstanding inline edit so another can start
    ///
    /// A reply that still arrives for it is discarded as stale.
    pub fn cancel_inline_edit(&mut self) -> bool {
        self.inline.cancel()
    }

    /// Apply or discard the response to a ticket
    ///
    /// The selection is cleared whatever the outcome.
    pub fn finish_inline_edit(
        &mut self,
        ticket: &EditTicket,
        response: AiResult<String>,
        now: Instant,
    ) -> EditorResult<InlineEditOutcome> {
        let outcome = self.inline.resolve(
            ticket,
            response,
            self.active.as_deref(),
            self.autosave.revision(),
            self.autosave.content(),
        );

        self.notices.push(outcome.notice(ticket.action));
        self.selection = None;

        if let InlineEditOutcome::Applied { content } = &outcome {
            self.autosave.on_content_change(content.clone(), now);
        }
        Ok(outcome)
    }

    /// Run an inline edit of the current selection against `backend`
    pub async fn run_inline_edit(
        &mut self,
        backend: &dyn AiBackend,
        action: EditAction,
    ) -> EditorResult<InlineEditOutcome> {
        let ticket = self.begin_inline_edit(action)?;

        // Dropping this future before the reply arrives releases the guard
        let pending = self.inline.release_on_drop();
        let response = backend.edit_text(&ticket.selection.text, action).await;
        pending.disarm();

        self.finish_inline_edit(&ticket, response, Instant::now())
    }

    fn require_active(&self) -> EditorResult<(String, ItemKind)> {
        let item = self
            .active_item()
            .ok_or_else(|| EditorError::NotFound("no item is open".to_string()))?;
        Ok((item.id().to_string(), item.kind()))
    }

    fn require_page(&self) -> EditorResult<()> {
        let (_, kind) = self.require_active()?;
        match kind {
            ItemKind::Page => Ok(()),
            other => Err(EditorError::NotEditable(other)),
        }
    }

    fn require_page_content(&self) -> EditorResult<&str> {
        self.require_page()?;
        Ok(self.autosave.content())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_common::ManualClock;
    use folio_storage::MemoryStore;
    use std::sync::Arc;
    use std::time::Duration;

    fn session() -> EditSession<MemoryStore> {
        let clock = Arc::new(ManualClock::at_seconds(1_700_000_000));
        let store = DocumentStore::open(MemoryStore::with_clock(clock.clone()), clock).unwrap();
        EditSession::new(store, AutosaveConfig::default())
    }

    #[test]
    fn test_select_page_loads_content() {
        let mut session = session();
        assert_eq!(session.select_item("page-1").unwrap(), ItemKind::Page);
        assert!(session.content().unwrap().contains("[[asset:asset-1:Kael]]"));
        assert_eq!(session.status(), SaveStatus::Idle);
    }

    #[test]
    fn test_chapter_has_no_content() {
        let mut session = session();
        session.select_item("chap-1").unwrap();

        assert!(session.content().is_none());
        let err = session.type_content("x", Instant::now()).unwrap_err();
        assert!(matches!(err, EditorError::NotEditable(ItemKind::Chapter)));
    }

    #[test]
    fn test_rename_is_immediate() {
        let mut session = session();
        session.select_item("chap-1").unwrap();
        session.rename("The Loud Signal").unwrap();

        assert_eq!(session.active_item().unwrap().title(), "The Loud Signal");
        assert_eq!(session.store().backing().project_writes(), 1);
        assert_eq!(session.status(), SaveStatus::Idle);
    }

    #[test]
    fn test_insert_asset_reference_goes_through_autosave() {
        let mut session = session();
        session.select_item("page-1").unwrap();
        let t0 = Instant::now();

        session.insert_asset_reference("asset-1", 0, t0).unwrap();
        assert_eq!(session.status(), SaveStatus::Unsaved);
        assert!(session.content().unwrap().starts_with("[[asset:asset-1:Kael]]The rain"));

        session.poll(t0 + Duration::from_millis(1500)).unwrap();
        let page = session.active_item().and_then(|l| l.page()).unwrap();
        assert!(page.content.starts_with("[[asset:asset-1:Kael]]"));
    }

    #[test]
    fn test_insert_unknown_asset() {
        let mut session = session();
        session.select_item("page-1").unwrap();
        let err = session
            .insert_asset_reference("nope", 0, Instant::now())
            .unwrap_err();
        assert!(matches!(err, EditorError::NotFound(_)));
    }

    #[test]
    fn test_inline_edit_requires_selection() {
        let mut session = session();
        session.select_item("page-1").unwrap();
        let err = session.begin_inline_edit(EditAction::Improve).unwrap_err();
        assert!(matches!(err, EditorError::NoSelection));
    }

    #[test]
    fn test_generated_image_asset() {
        let mut session = session();
        let asset = session
            .save_generated_image("A rain-soaked neon alley at midnight, cinematic", &[0xff, 0xd8])
            .unwrap();

        assert_eq!(asset.asset_type, AssetType::Image);
        assert_eq!(asset.name, "A rain-soaked neon alley at mi");
        assert_eq!(asset.data.image_url.as_deref(), Some("data:image/jpeg;base64,/9g="));
        assert_eq!(session.store().backing().asset_writes(), 1);
        assert_eq!(session.drain_notices(), vec![Notice::success("Image saved to assets!")]);
    }

    #[test]
    fn test_generated_image_without_prompt_gets_default_name() {
        let mut session = session();
        let asset = session.save_generated_image("   ", &[]).unwrap();
        assert_eq!(asset.name, "Generated Image");
    }
}
