//! File-backed [`DocumentStore`] for theme stores.
//!
//! Spreadsheets (`.xlsx`, `.xlsm`, `.xls`, `.xlsb`, `.ods`) are read through
//! `calamine` and written as `.xlsx` through `rust_xlsxwriter`. The JSON
//! document shape (`{ "sheetNames": [...], "sheets": {...} }`) is supported as a
//! plain-text alternative.
//!
//! Only `.xlsx` is written. Saving a store opened from `.xlsm`, `.xls`,
//! `.xlsb` or `.ods` produces an `.xlsx` next to the original, which is left
//! untouched (so a macro-enabled workbook keeps its VBA project).

use std::path::{Path, PathBuf};

use themesync_model::{Document, DocumentStore};

mod error;
mod json;
mod locate;
mod read;
mod write;

pub use error::StoreIoError;
pub use locate::{find_document, STORE_EXTENSIONS};

/// On-disk format of a store, derived from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreFormat {
    Xlsx,
    Xlsm,
    Xls,
    Xlsb,
    Ods,
    Json,
}

impl StoreFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        Some(match ext.as_str() {
            "xlsx" => StoreFormat::Xlsx,
            "xlsm" => StoreFormat::Xlsm,
            "xls" => StoreFormat::Xls,
            "xlsb" => StoreFormat::Xlsb,
            "ods" => StoreFormat::Ods,
            "json" => StoreFormat::Json,
            _ => return None,
        })
    }

    /// Extension used when saving a document opened from this format.
    pub const fn default_save_extension(self) -> &'static str {
        match self {
            StoreFormat::Json => "json",
            StoreFormat::Xlsx
            | StoreFormat::Xlsm
            | StoreFormat::Xls
            | StoreFormat::Xlsb
            | StoreFormat::Ods => "xlsx",
        }
    }
}

/// Path a document read from `path` is saved to.
pub fn save_path(path: &Path) -> Result<PathBuf, StoreIoError> {
    let format = format_of(path)?;
    let ext = format.default_save_extension();
    if path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
    {
        Ok(path.to_path_buf())
    } else {
        Ok(path.with_extension(ext))
    }
}

fn format_of(path: &Path) -> Result<StoreFormat, StoreIoError> {
    StoreFormat::from_path(path).ok_or_else(|| StoreIoError::UnsupportedFormat(path.to_path_buf()))
}

/// Name a document gets when loaded from `path`.
pub fn document_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Reads and writes documents on the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileStore;

impl FileStore {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentStore for FileStore {
    type Handle = Path;
    type Error = StoreIoError;

    fn read_document(&self, path: &Path) -> Result<Document, StoreIoError> {
        let document = match format_of(path)? {
            StoreFormat::Json => json::read_json(path)?,
            _ => read::read_spreadsheet(path)?,
        };
        log::debug!(
            "loaded `{}` ({} sheet(s))",
            path.display(),
            document.sheets().len()
        );
        Ok(document)
    }

    fn write_document(&self, path: &Path, document: &Document) -> Result<(), StoreIoError> {
        let target = save_path(path)?;
        if target != path {
            log::info!(
                "`{}` cannot be written in its own format; saving `{}`",
                path.display(),
                target.display()
            );
        }
        match format_of(&target)? {
            StoreFormat::Json => json::write_json(&target, document),
            _ => write::write_xlsx(&target, document),
        }
    }
}
