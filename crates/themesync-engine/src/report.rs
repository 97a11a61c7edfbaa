use core::fmt;

use serde::Serialize;

use crate::channels::ChannelOutcome;
use crate::config::StoreKind;
use crate::detect::MappingMode;
use crate::series::{SeriesCopy, SiblingCandidate};
use crate::sync::FieldOutcome;

/// Non-fatal conditions encountered during a run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SyncWarning {
    /// An expected column is absent; the field was skipped.
    #[serde(rename_all = "camelCase")]
    MissingKeyColumn { sheet: String, column: String },
    /// A source color could not be interpreted; the default was used.
    #[serde(rename_all = "camelCase")]
    InvalidColorValue { channel: String, source_code: String },
    /// A sheet was shorter than the theme row and was padded.
    #[serde(rename_all = "camelCase")]
    RowAlignmentShortfall { sheet: String, padded_rows: usize },
    /// The predecessor order value was not found; the entry stays appended.
    #[serde(rename_all = "camelCase")]
    SortedInsertionTargetMissing { sheet: String, predecessor: i64 },
    /// Sorted insertion was refused; the entry stays appended.
    #[serde(rename_all = "camelCase")]
    SortedInsertionRejected { sheet: String, reason: String },
    /// The source `Status` sheet could not be read; indirect mode was used.
    #[serde(rename_all = "camelCase")]
    StatusUnreadable { reason: String },
    /// A configured sheet does not exist in its store.
    #[serde(rename_all = "camelCase")]
    MissingSheet { store: StoreKind, sheet: String },
    /// The two stores' primary sheets have different row counts.
    #[serde(rename_all = "camelCase")]
    StoreMisaligned { primary_rows: usize, companion_rows: usize },
}

impl fmt::Display for SyncWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncWarning::MissingKeyColumn { sheet, column } => {
                write!(f, "sheet `{sheet}` has no `{column}` column")
            }
            SyncWarning::InvalidColorValue {
                channel,
                source_code,
            } => write!(
                f,
                "color `{source_code}` for `{channel}` is invalid; default used"
            ),
            SyncWarning::RowAlignmentShortfall { sheet, padded_rows } => {
                write!(f, "sheet `{sheet}` padded with {padded_rows} row(s)")
            }
            SyncWarning::SortedInsertionTargetMissing { sheet, predecessor } => write!(
                f,
                "order value {predecessor} not found in `{sheet}`; appended instead"
            ),
            SyncWarning::SortedInsertionRejected { sheet, reason } => {
                write!(f, "sorted insertion into `{sheet}` refused ({reason}); appended instead")
            }
            SyncWarning::StatusUnreadable { reason } => {
                write!(f, "Status sheet unreadable ({reason}); indirect mode used")
            }
            SyncWarning::MissingSheet { store, sheet } => {
                write!(f, "{store} store has no sheet `{sheet}`")
            }
            SyncWarning::StoreMisaligned {
                primary_rows,
                companion_rows,
            } => write!(
                f,
                "primary store has {primary_rows} rows but companion store has {companion_rows}"
            ),
        }
    }
}

/// What happened to the ordering sheet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum OrderingOutcome {
    /// Appended at the end.
    #[serde(rename_all = "camelCase")]
    Appended { row_index: usize, order: i64 },
    /// Moved right after the sibling's entry.
    #[serde(rename_all = "camelCase")]
    Inserted { row_index: usize, order: i64, predecessor: i64 },
    /// Nothing to do (update, no ordering sheet, no id).
    Skipped,
}

/// Everything a run did, for callers and the CLI.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub theme_name: String,
    pub mode: MappingMode,
    pub row_index: usize,
    pub is_new: bool,
    pub record_id: Option<i64>,
    pub channels: Vec<ChannelOutcome>,
    pub fields: Vec<FieldOutcome>,
    pub sibling: Option<SiblingCandidate>,
    pub series: Vec<SeriesCopy>,
    pub ordering: OrderingOutcome,
    pub warnings: Vec<SyncWarning>,
}

impl SyncReport {
    pub fn default_channel_count(&self) -> usize {
        self.channels.iter().filter(|c| c.is_default).count()
    }

    pub fn corrected_field_count(&self) -> usize {
        self.fields.iter().filter(|f| f.was_corrected).count()
    }
}
