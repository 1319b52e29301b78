//! # Folio References
//!
//! Inline asset mentions embedded in page content:
//!
//! ```text
//! The rain fell. [[asset:asset-1:Kael]] adjusted his collar.
//! └─ Text ─────┘ └─ Reference(id, name) ┘└─ Text ──────────┘
//! ```
//!
//! - [`codec`] writes and scans tokens. It never looks at the asset catalog.
//! - [`renderer`] pairs decoded segments with the catalog so a reading
//!   surface can show mentions and open asset details, tolerating ids that no
//!   longer resolve.

pub mod codec;
mod error;
pub mod renderer;

pub use codec::{decode, display_text, encode, references, Reference, Segment, Segments};
pub use error::{ReferenceError, ReferenceResult};
pub use renderer::{Activation, AssetDetail, AssetIndex, Rendered, RenderedSegment, Renderer};
