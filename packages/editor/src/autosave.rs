//! # Autosave Controller
//!
//! Save-status state machine for the item open in the editor.
//!
//! ```text
//!            keystroke               debounce due             display due
//!   Idle ─────────────▶ Unsaved ─────────────────▶ Saving ──▶ Saved ─────────▶ Idle
//!    ▲                    │  ▲ keystroke                        │ keystroke
//!    │                    └──┘ (reschedules commit)             └──────▶ Unsaved
//!    └── bind (switch item): timers dropped, pending edit discarded
//! ```
//!
//! Time never advances on its own. Hosts feed keystrokes and `poll` with the
//! instant they happened and drive `poll` from [`AutosaveController::next_deadline`].

use crate::document::DocumentStore;
use crate::mutations::ItemUpdate;
use crate::timer::DeferredAction;
use crate::{EditorError, EditorResult};
use chrono::{DateTime, Local, Utc};
use folio_storage::BackingStore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutosaveConfig {
    /// Input inactivity before a commit
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// How long "saved" stays visible before returning to idle
    #[serde(default = "default_saved_display_ms")]
    pub saved_display_ms: u64,
}

fn default_debounce_ms() -> u64 {
    1500
}

fn default_saved_display_ms() -> u64 {
    2000
}

impl AutosaveConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn saved_display(&self) -> Duration {
        Duration::from_millis(self.saved_display_ms)
    }
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            saved_display_ms: default_saved_display_ms(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveStatus {
    Idle,
    Unsaved,
    Saving,
    Saved,
}

impl fmt::Display for SaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SaveStatus::Idle => "idle",
            SaveStatus::Unsaved => "unsaved",
            SaveStatus::Saving => "saving",
            SaveStatus::Saved => "saved",
        };
        f.write_str(name)
    }
}

/// Outcome of a debounced commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    pub item_id: String,
    /// False when the content already matched what was persisted
    pub wrote: bool,
}

pub struct AutosaveController {
    config: AutosaveConfig,
    item_id: Option<String>,
    status: SaveStatus,
    content: String,
    revision: u64,
    commit: DeferredAction<String>,
    reset: DeferredAction<()>,
}

impl AutosaveController {
    pub fn new(config: AutosaveConfig) -> Self {
        Self {
            config,
            item_id: None,
            status: SaveStatus::Idle,
            content: String::new(),
            revision: 0,
            commit: DeferredAction::new(),
            reset: DeferredAction::new(),
        }
    }

    pub fn config(&self) -> &AutosaveConfig {
        &self.config
    }

    pub fn status(&self) -> SaveStatus {
        self.status
    }

    pub fn item_id(&self) -> Option<&str> {
        self.item_id.as_deref()
    }

    /// Latest editor content, including edits not yet committed
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Bumps on every content change and every rebind
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Earliest instant at which `poll` has something to do
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.commit.deadline(), self.reset.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Rebind to another item, abandoning any uncommitted edit
    pub fn bind(&mut self, item_id: Option<&str>, content: &str) {
        if let Some(abandoned) = self.commit.cancel() {
            tracing::warn!(
                item_id = self.item_id.as_deref().unwrap_or_default(),
                bytes = abandoned.len(),
                "Discarding edit that was still waiting to be saved"
            );
        }
        self.reset.cancel();

        self.item_id = item_id.map(str::to_string);
        self.content = content.to_string();
        self.revision += 1;
        self.transition(SaveStatus::Idle);
    }

    /// Record a keystroke's resulting content
    pub fn on_content_change(&mut self, content: String, now: Instant) {
        self.revision += 1;
        self.content.clone_from(&content);
        self.reset.cancel();
        self.commit.schedule(content, now, self.config.debounce());
        self.transition(SaveStatus::Unsaved);
    }

    /// Advance timers to `now`
    ///
    /// A commit that fails to persist still ends in `Saved`; the error is
    /// returned so the host can report it.
    pub fn poll<S: BackingStore>(
        &mut self,
        now: Instant,
        store: &mut DocumentStore<S>,
    ) -> EditorResult<Option<SaveReport>> {
        let mut result = Ok(None);

        if let Some(content) = self.commit.take_due(now) {
            if self.status == SaveStatus::Unsaved {
                result = self.commit_content(&content, now, store).map(Some);
            }
        }

        if self.reset.take_due(now).is_some() && self.status == SaveStatus::Saved {
            self.transition(SaveStatus::Idle);
        }

        result
    }

    /// Commit any pending edit immediately
    pub fn flush<S: BackingStore>(
        &mut self,
        now: Instant,
        store: &mut DocumentStore<S>,
    ) -> EditorResult<Option<SaveReport>> {
        match self.commit.cancel() {
            Some(content) if self.status == SaveStatus::Unsaved => {
                self.commit_content(&content, now, store).map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Status line shown next to the editor
    pub fn status_text(&self, last_updated: Option<DateTime<Utc>>) -> String {
        match self.status {
            SaveStatus::Unsaved => "Unsaved changes...".to_string(),
            SaveStatus::Saving => "Saving...".to_string(),
            SaveStatus::Saved => "All changes saved.".to_string(),
            SaveStatus::Idle => match last_updated {
                Some(at) => format!(
                    "Last updated: {}",
                    at.with_timezone(&Local).format("%-I:%M:%S %p")
                ),
                None => String::new(),
            },
        }
    }

    fn commit_content<S: BackingStore>(
        &mut self,
        content: &str,
        now: Instant,
        store: &mut DocumentStore<S>,
    ) -> EditorResult<SaveReport> {
        self.transition(SaveStatus::Saving);
        let result = self.write_if_changed(content, store);
        self.transition(SaveStatus::Saved);
        self.reset.schedule((), now, self.config.saved_display());
        result
    }

    fn write_if_changed<S: BackingStore>(
        &self,
        content: &str,
        store: &mut DocumentStore<S>,
    ) -> EditorResult<SaveReport> {
        let item_id = self
            .item_id
            .clone()
            .ok_or_else(|| EditorError::NotFound("no item is bound".to_string()))?;

        let persisted = store
            .find_item(&item_id)
            .ok_or_else(|| EditorError::NotFound(item_id.clone()))?;
        let Some(page) = persisted.page() else {
            return Err(EditorError::NotEditable(persisted.kind()));
        };

        if page.content == content {
            return Ok(SaveReport {
                item_id,
                wrote: false,
            });
        }

        store.update_item(&item_id, ItemUpdate::page_content(content))?;
        Ok(SaveReport {
            item_id,
            wrote: true,
        })
    }

    fn transition(&mut self, next: SaveStatus) {
        if self.status != next {
            tracing::debug!(
                item_id = self.item_id.as_deref().unwrap_or_default(),
                from = %self.status,
                status = %next,
                revision = self.revision,
                "Autosave transition"
            );
            self.status = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_common::ManualClock;
    use folio_storage::MemoryStore;
    use std::sync::Arc;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn setup() -> (AutosaveController, DocumentStore<MemoryStore>) {
        let clock = Arc::new(ManualClock::at_seconds(1_700_000_000));
        let store = DocumentStore::open(MemoryStore::with_clock(clock.clone()), clock).unwrap();
        let mut autosave = AutosaveController::new(AutosaveConfig::default());
        let content = store.find_item("page-1").and_then(|l| l.page()).unwrap().content.clone();
        autosave.bind(Some("page-1"), &content);
        (autosave, store)
    }

    #[test]
    fn test_keystroke_enters_unsaved_immediately() {
        let (mut autosave, _store) = setup();
        autosave.on_content_change("a".into(), Instant::now());
        assert_eq!(autosave.status(), SaveStatus::Unsaved);
        assert_eq!(autosave.status_text(None), "Unsaved changes...");
    }

    #[test]
    fn test_full_cycle_back_to_idle() {
        let (mut autosave, mut store) = setup();
        let t0 = Instant::now();

        autosave.on_content_change("Draft".into(), t0);
        assert_eq!(autosave.next_deadline(), Some(t0 + ms(1500)));

        let report = autosave.poll(t0 + ms(1500), &mut store).unwrap();
        assert_eq!(
            report,
            Some(SaveReport {
                item_id: "page-1".into(),
                wrote: true
            })
        );
        assert_eq!(autosave.status(), SaveStatus::Saved);
        assert_eq!(autosave.status_text(None), "All changes saved.");

        autosave.poll(t0 + ms(3499), &mut store).unwrap();
        assert_eq!(autosave.status(), SaveStatus::Saved);
        autosave.poll(t0 + ms(3500), &mut store).unwrap();
        assert_eq!(autosave.status(), SaveStatus::Idle);
        assert!(autosave.next_deadline().is_none());
    }

    #[test]
    fn test_unchanged_content_skips_write_but_reports_saved() {
        let (mut autosave, mut store) = setup();
        let t0 = Instant::now();
        let original = autosave.content().to_string();

        autosave.on_content_change(format!("{original}!"), t0);
        autosave.on_content_change(original, t0 + ms(100));
        let report = autosave.poll(t0 + ms(1600), &mut store).unwrap().unwrap();

        assert!(!report.wrote);
        assert_eq!(autosave.status(), SaveStatus::Saved);
        assert_eq!(store.backing().project_writes(), 0);
    }

    #[test]
    fn test_keystroke_while_saved_returns_to_unsaved() {
        let (mut autosave, mut store) = setup();
        let t0 = Instant::now();

        autosave.on_content_change("one".into(), t0);
        autosave.poll(t0 + ms(1500), &mut store).unwrap();
        assert_eq!(autosave.status(), SaveStatus::Saved);
        autosave.on_content_change("one two".into(), t0 + ms(3000));

        assert_eq!(autosave.status(), SaveStatus::Unsaved);
        // The saved display timer (due at 3500) was cancelled along with the status
        autosave.poll(t0 + ms(3600), &mut store).unwrap();
        assert_eq!(autosave.status(), SaveStatus::Unsaved);
        autosave.poll(t0 + ms(4499), &mut store).unwrap();
        assert_eq!(autosave.status(), SaveStatus::Unsaved);

        // The new debounce deadline commits the second edit
        autosave.poll(t0 + ms(4500), &mut store).unwrap();
        assert_eq!(autosave.status(), SaveStatus::Saved);
    }

    #[test]
    fn test_flush_commits_pending_edit() {
        let (mut autosave, mut store) = setup();
        let t0 = Instant::now();

        autosave.on_content_change("Flushed".into(), t0);
        let report = autosave.flush(t0, &mut store).unwrap().unwrap();

        assert!(report.wrote);
        assert_eq!(store.find_item("page-1").and_then(|l| l.page()).unwrap().content, "Flushed");
        assert!(autosave.flush(t0, &mut store).unwrap().is_none());
    }

    #[test]
    fn test_idle_text_shows_last_updated() {
        let (autosave, store) = setup();
        let updated = store.find_item("page-1").map(|l| l.updated_at());
        assert!(autosave.status_text(updated).starts_with("Last updated: "));
    }

    #[test]
    fn test_config_defaults_from_partial_json() {
        let config: AutosaveConfig = serde_json::from_str(r#"{ "debounceMs": 500 }"#).unwrap();
        assert_eq!(config.debounce(), ms(500));
        assert_eq!(config.saved_display(), ms(2000));
    }
}
