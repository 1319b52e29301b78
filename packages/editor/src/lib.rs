//! # Folio Editor
//!
//! Document state management for the authoring surface.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ EditSession                                 │
//! │  - open item + text selection               │
//! │  - AutosaveController (debounced commits)   │
//! │  - InlineEditGuard (AI splice, one at once) │
//! │  - notices for the host                     │
//! └─────────────────────────────────────────────┘
//!                     ↓ ItemUpdate
//! ┌─────────────────────────────────────────────┐
//! │ DocumentStore                               │
//! │  - project tree + asset catalog             │
//! │  - snapshots published to subscribers       │
//! │  - one whole-collection write per mutation  │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ BackingStore (folio-storage)                │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use folio_editor::{AutosaveConfig, DocumentStore, EditSession};
//!
//! let store = DocumentStore::open(JsonFileStore::new(".folio"), Arc::new(SystemClock))?;
//! let mut session = EditSession::new(store, AutosaveConfig::default());
//!
//! session.select_item("page-1")?;
//! session.type_content("The rain fell.", Instant::now())?;
//!
//! // later, from the host's timer
//! session.poll(Instant::now())?;
//! ```

mod autosave;
mod document;
mod errors;
mod inline_edit;
mod mutations;
mod notice;
mod session;
mod timer;

pub use autosave::{AutosaveConfig, AutosaveController, SaveReport, SaveStatus};
pub use document::{DocumentStore, Located, Snapshot};
pub use errors::{EditorError, EditorResult};
pub use inline_edit::{EditTicket, InlineEditGuard, InlineEditOutcome};
pub use mutations::ItemUpdate;
pub use notice::{Notice, NoticeLevel};
pub use session::EditSession;
pub use timer::DeferredAction;

// Re-export common types for convenience
pub use folio_model::{Selection, SelectionError};
