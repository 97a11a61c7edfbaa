//! Theme propagation engine.
//!
//! Given a hand-authored source color document and two row-aligned stores (the
//! primary attributes store and the companion customization store), the engine
//! finds or creates a theme record, resolves its color channels, synchronizes
//! every configured field group and keeps the stores aligned so consumers can
//! join them by row position.
//!
//! A run is a one-shot batch over fully loaded [`Document`]s:
//!
//! ```text
//! detect mode -> locate row -> channels -> field groups -> series reuse
//!             -> sorted insertion -> assemble -> commit (primary, companion)
//! ```
//!
//! All state lives in a [`SyncSession`] constructed per run.
//!
//! [`Document`]: themesync_model::Document

pub mod alias;
pub mod assemble;
pub mod channels;
pub mod color;
mod commit;
pub mod config;
pub mod detect;
mod error;
pub mod fields;
pub mod locator;
pub mod mapping;
pub mod ordering;
mod report;
pub mod series;
mod session;
pub mod status;
pub mod sync;

pub use commit::{CommitError, PendingCommit};
pub use config::{StoreKind, StoreLayout, SyncConfig};
pub use detect::{detect_mapping_mode, MappingMode};
pub use error::SyncError;
pub use report::{OrderingOutcome, SyncReport, SyncWarning};
pub use session::{AssembledStores, SyncRequest, SyncSession, UpsertMode};
