//! `themesync-model` defines the in-memory tabular store used by the theme
//! synchronization engine.
//!
//! A [`Document`] is a named, ordered collection of [`Sheet`]s. Every sheet is a
//! plain grid of strings where row 0 is the header. Numeric and boolean meaning
//! is left to callers; the model never interprets cell text.
//!
//! The crate is intentionally self-contained so it can be reused by:
//! - the synchronization engine (`themesync-engine`)
//! - file-backed stores (`themesync-io`)
//! - JSON boundaries via `serde` ([`DocumentShape`])

mod document;
mod error;
mod sheet;
mod store;

pub use document::{Document, DocumentShape};
pub use error::DocumentError;
pub use sheet::Sheet;
pub use store::DocumentStore;
