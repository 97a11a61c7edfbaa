use std::path::PathBuf;

use themesync_model::DocumentError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreIoError {
    #[error("unsupported store format: `{}`", .0.display())]
    UnsupportedFormat(PathBuf),
    #[error("failed to read spreadsheet `{}`: {source}", path.display())]
    Spreadsheet {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },
    #[error("failed to write `{}`: {source}", path.display())]
    Xlsx {
        path: PathBuf,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },
    #[error("I/O error on `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON document `{}`: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("sheet `{sheet}` has a cell beyond spreadsheet limits (row {row}, column {col})")]
    OutOfBounds {
        sheet: String,
        row: usize,
        col: usize,
    },
    #[error("no store named `{name}` under `{}`", root.display())]
    NotFound { name: String, root: PathBuf },
    #[error(transparent)]
    Document(#[from] DocumentError),
}
