use themesync_model::DocumentError;
use thiserror::Error;

use crate::StoreKind;

/// Failures that abort a synchronization run.
///
/// Recoverable conditions (missing optional columns, invalid colors, short
/// sheets, ordering fallbacks) are reported as [`crate::SyncWarning`]s instead.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("theme name cannot be empty")]
    EmptyThemeName,
    #[error("{0} store has no sheets")]
    EmptyStore(StoreKind),
    #[error("{store} store has no sheet named `{sheet}`")]
    MissingSheet { store: StoreKind, sheet: String },
    #[error("sheet `{sheet}` has no `{column}` column")]
    MissingKeyColumn { sheet: String, column: String },
    #[error("theme `{0}` does not exist")]
    ThemeNotFound(String),
    /// A new theme's row index already holds another theme in some sheet.
    #[error("{store} sheet `{sheet}` row {row} already holds `{occupant}`")]
    RowOccupied {
        store: StoreKind,
        sheet: String,
        row: usize,
        occupant: String,
    },
    #[error(transparent)]
    Document(#[from] DocumentError),
}
