//! # Folio Portal
//!
//! Read-only surface for published projects.
//!
//! ```text
//! Library ── resolve(id) ──▶ Found(ReadingView) ──▶ toc, active page, mentions
//!                        └─▶ NotFound(message + link back to "/")
//! ```
//!
//! Everything here borrows a library snapshot and never mutates it.

mod error;
pub mod html;
mod library;
mod reading;

pub use error::{PortalError, PortalResult};
pub use html::HtmlOptions;
pub use library::{
    Library, ListingEntry, NotFoundView, Resolution, EMPTY_LIBRARY_MESSAGE, LIBRARY_HREF,
    NOT_FOUND_MESSAGE,
};
pub use reading::{DanglingReference, ReadingView, TocChapter, TocPage};
