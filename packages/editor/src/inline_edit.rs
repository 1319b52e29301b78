//! # Selection-Scoped AI Edits
//!
//! ```text
//! select (start, end) ─▶ begin: ticket {item, revision, selection, action}
//!                                  │  AI round trip
//!                                  ▼
//!                        resolve(ticket, response, current state)
//!                          ├─ error response        → Failed, nothing spliced
//!                          ├─ cancelled meanwhile   → Stale, nothing spliced
//!                          ├─ item/revision moved   → Stale, nothing spliced
//!                          └─ otherwise             → Applied(content[..start] + reply + content[end..])
//! ```
//!
//! The offsets in a ticket are only valid against the content revision they
//! were captured from, so a response is spliced only when both the active
//! item and its content revision still match the ticket. Switching items or
//! dropping the round trip cancels the request, freeing the guard.

use crate::notice::Notice;
use crate::{EditorError, EditorResult};
use folio_ai::{AiResult, EditAction};
use folio_model::Selection;

/// Tag carried by an outstanding edit request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditTicket {
    /// Unique per guard, so a cancelled request never matches a later one
    pub sequence: u64,
    pub item_id: String,
    pub revision: u64,
    pub selection: Selection,
    pub action: EditAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineEditOutcome {
    /// New full content after the splice
    Applied { content: String },
    Failed { message: String },
    /// Discarded because the document moved on during the round trip
    Stale,
}

impl InlineEditOutcome {
    pub fn notice(&self, action: EditAction) -> Notice {
        match self {
            InlineEditOutcome::Applied { .. } => {
                Notice::success(format!("Text has been {}.", action.past_tense()))
            }
            InlineEditOutcome::Failed { message } => {
                Notice::error(format!("AI action failed: {message}"))
            }
            InlineEditOutcome::Stale => Notice::warning(format!(
                "AI {action} result was discarded because the text changed while it was being generated."
            )),
        }
    }
}

/// Allows a single outstanding edit per editor
#[derive(Debug, Default)]
pub struct InlineEditGuard {
    in_flight: Option<u64>,
    next_sequence: u64,
}

impl InlineEditGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn begin(
        &mut self,
        item_id: &str,
        revision: u64,
        selection: Selection,
        action: EditAction,
    ) -> EditorResult<EditTicket> {
        if self.in_flight.is_some() {
            return Err(EditorError::EditInFlight);
        }
        self.next_sequence += 1;
        let sequence = self.next_sequence;
        self.in_flight = Some(sequence);

        tracing::info!(item_id, revision, sequence, %action, bytes = selection.len(), "Dispatching inline edit");
        Ok(EditTicket {
            sequence,
            item_id: item_id.to_string(),
            revision,
            selection,
            action,
        })
    }

    /// Forget the outstanding request; its reply will resolve as stale
    pub fn cancel(&mut self) -> bool {
        match self.in_flight.take() {
            Some(sequence) => {
                tracing::info!(sequence, "Cancelled inline edit");
                true
            }
            None => false,
        }
    }

    /// Handle that cancels the outstanding request unless disarmed first
    pub(crate) fn release_on_drop(&mut self) -> PendingEdit<'_> {
        PendingEdit {
            guard: self,
            armed: true,
        }
    }

    /// Decide what a response means for the current document state
    pub fn resolve(
        &mut self,
        ticket: &EditTicket,
        response: AiResult<String>,
        active_item: Option<&str>,
        revision: u64,
        content: &str,
    ) -> InlineEditOutcome {
        let outstanding = self.in_flight == Some(ticket.sequence);
        if outstanding {
            self.in_flight = None;
        }

        let replacement = match response {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(item_id = %ticket.item_id, action = %ticket.action, error = %e, "Inline edit failed");
                return InlineEditOutcome::Failed {
                    message: e.to_string(),
                };
            }
        };

        if !outstanding || active_item != Some(ticket.item_id.as_str()) || revision != ticket.revision {
            tracing::warn!(
                item_id = %ticket.item_id,
                sequence = ticket.sequence,
                revision = ticket.revision,
                current_revision = revision,
                "Discarding stale inline edit"
            );
            return InlineEditOutcome::Stale;
        }

        match ticket.selection.splice(content, &replacement) {
            Ok(content) => {
                tracing::info!(item_id = %ticket.item_id, action = %ticket.action, "Applied inline edit");
                InlineEditOutcome::Applied { content }
            }
            Err(e) => InlineEditOutcome::Failed {
                message: e.to_string(),
            },
        }
    }
}

/// Outstanding request owned by an in-progress round trip
pub(crate) struct PendingEdit<'g> {
    guard: &'g mut InlineEditGuard,
    armed: bool,
}

impl PendingEdit<'_> {
    /// The reply arrived; leave the request for `resolve`
    pub(crate) fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for PendingEdit<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.guard.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_ai::AiError;

    fn ticket(guard: &mut InlineEditGuard) -> EditTicket {
        let selection = Selection::capture("Hello world", 6, 11).unwrap();
        guard
            .begin("page-1", 7, selection, EditAction::Improve)
            .unwrap()
    }

    #[test]
    fn test_applies_splice() {
        let mut guard = InlineEditGuard::new();
        let t = ticket(&mut guard);

        let outcome = guard.resolve(&t, Ok("earth".into()), Some("page-1"), 7, "Hello world");

        assert_eq!(
            outcome,
            InlineEditOutcome::Applied {
                content: "Hello earth".into()
            }
        );
        assert!(!guard.is_in_flight());
        assert_eq!(outcome.notice(t.action).message, "Text has been improved.");
    }

    #[test]
    fn test_second_request_rejected_while_in_flight() {
        let mut guard = InlineEditGuard::new();
        let _t = ticket(&mut guard);

        let selection = Selection::capture("Hello world", 0, 5).unwrap();
        let err = guard
            .begin("page-1", 7, selection, EditAction::Expand)
            .unwrap_err();
        assert!(matches!(err, EditorError::EditInFlight));
    }

    #[test]
    fn test_failure_does_not_splice() {
        let mut guard = InlineEditGuard::new();
        let t = ticket(&mut guard);

        let outcome = guard.resolve(
            &t,
            Err(AiError::Api {
                status: 500,
                message: "boom".into(),
            }),
            Some("page-1"),
            7,
            "Hello world",
        );

        assert!(matches!(outcome, InlineEditOutcome::Failed { .. }));
        assert_eq!(
            outcome.notice(EditAction::Improve).message,
            "AI action failed: API error (500): boom"
        );
        assert!(!guard.is_in_flight());
    }

    #[test]
    fn test_revision_change_is_stale() {
        let mut guard = InlineEditGuard::new();
        let t = ticket(&mut guard);

        let outcome = guard.resolve(&t, Ok("earth".into()), Some("page-1"), 8, "Hello world!");
        assert_eq!(outcome, InlineEditOutcome::Stale);
    }

    #[test]
    fn test_cancel_releases_guard_and_late_reply_is_stale() {
        let mut guard = InlineEditGuard::new();
        let old = ticket(&mut guard);

        assert!(guard.cancel());
        assert!(!guard.cancel());

        let fresh = ticket(&mut guard);
        assert_ne!(old.sequence, fresh.sequence);

        let outcome = guard.resolve(&old, Ok("earth".into()), Some("page-1"), 7, "Hello world");
        assert_eq!(outcome, InlineEditOutcome::Stale);
        // The newer request is still outstanding
        assert!(guard.is_in_flight());
    }

    #[test]
    fn test_dropped_pending_edit_cancels() {
        let mut guard = InlineEditGuard::new();
        let _t = ticket(&mut guard);

        drop(guard.release_on_drop());
        assert!(!guard.is_in_flight());

        let t = ticket(&mut guard);
        guard.release_on_drop().disarm();
        assert!(guard.is_in_flight());
        let outcome = guard.resolve(&t, Ok("earth".into()), Some("page-1"), 7, "Hello world");
        assert!(matches!(outcome, InlineEditOutcome::Applied { .. }));
    }

    #[test]
    fn test_item_change_is_stale() {
        let mut guard = InlineEditGuard::new();
        let t = ticket(&mut guard);

        let outcome = guard.resolve(&t, Ok("earth".into()), Some("page-2"), 7, "Hello world");
        assert_eq!(outcome, InlineEditOutcome::Stale);
    }
}
