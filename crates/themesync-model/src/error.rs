use thiserror::Error;

/// Errors raised by structural document operations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("sheet `{0}` already exists")]
    DuplicateSheet(String),
    #[error("sheet `{0}` not found")]
    SheetNotFound(String),
    #[error("sheet name cannot be empty")]
    EmptySheetName,
    #[error("row {row} is out of bounds for sheet `{sheet}` ({len} rows)")]
    RowOutOfBounds { sheet: String, row: usize, len: usize },
    #[error("the header row of sheet `{0}` is read-only")]
    HeaderIsReadOnly(String),
    #[error("sheet `{0}` is listed in `sheetNames` but has no data")]
    MissingSheetData(String),
    #[error("sheet `{0}` has data but is not listed in `sheetNames`")]
    UnlistedSheet(String),
}
