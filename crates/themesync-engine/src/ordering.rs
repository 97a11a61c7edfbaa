//! Sorted insertion into a dense ordering sheet.
//!
//! The ordering sheet pairs an integer order column with a label column and
//! expresses display ranking by row position. New records are appended first;
//! [`insert_sorted`] then moves the appended entry right after its predecessor
//! by shifting the tail down one slot.

use serde::Deserialize;
use themesync_model::{DocumentError, Sheet};
use thiserror::Error;

use crate::config::StoreKind;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OrderingConfig {
    pub store: StoreKind,
    pub sheet: String,
    pub order_column: String,
    pub label_column: String,
    /// Index of the first ordered row.
    pub header_offset: usize,
}

impl Default for OrderingConfig {
    fn default() -> Self {
        Self {
            store: StoreKind::Companion,
            sheet: "ThemeSort".to_string(),
            order_column: "SortId".to_string(),
            label_column: "SortNotes".to_string(),
            header_offset: 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum OrderingError {
    #[error("ordering sheet `{sheet}` has no `{column}` column")]
    MissingColumn { sheet: String, column: String },
    #[error("predecessor order value {0} not found")]
    PredecessorMissing(i64),
    #[error("order value {0} appears more than once")]
    DuplicateOrder(i64),
    #[error("order value {0} is already taken")]
    OrderTaken(i64),
    #[error("ordering sheet has no appended row to move")]
    NothingAppended,
    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Parse an order cell; blank or non-integral cells are `None`.
pub fn parse_order(cell: &str) -> Option<i64> {
    let cell = cell.trim();
    if let Ok(v) = cell.parse::<i64>() {
        return Some(v);
    }
    let v = cell.parse::<f64>().ok()?;
    (v.is_finite() && v.fract() == 0.0).then_some(v as i64)
}

fn columns(sheet: &Sheet, cfg: &OrderingConfig) -> Result<(usize, usize), OrderingError> {
    let find = |column: &str| {
        sheet
            .column_index(column)
            .ok_or_else(|| OrderingError::MissingColumn {
                sheet: sheet.name().to_string(),
                column: column.to_string(),
            })
    };
    Ok((find(&cfg.order_column)?, find(&cfg.label_column)?))
}

/// Append `(order, label)` as a new last row. Returns its index.
///
/// The row is a copy of the current last data row so columns other than the
/// order/label pair keep their structural defaults.
pub fn append_order_row(
    sheet: &mut Sheet,
    cfg: &OrderingConfig,
    order: i64,
    label: &str,
) -> Result<usize, OrderingError> {
    let (order_col, label_col) = columns(sheet, cfg)?;
    let template = if sheet.data_len() > 0 {
        sheet.rows().last().cloned().unwrap_or_default()
    } else {
        Vec::new()
    };
    let index = sheet.push_row(template);
    sheet.set_cell(index, order_col, order.to_string())?;
    sheet.set_cell(index, label_col, label)?;
    Ok(index)
}

/// Move the freshly appended last row right after the row holding
/// `predecessor`.
///
/// The last row must already hold `(order, label)` from
/// [`append_order_row`]. Rows between the predecessor and the end shift down one
/// slot, tail first; only the order and label columns are touched. On error the
/// sheet is left unchanged, so the appended row stays where it is.
pub fn insert_sorted(
    sheet: &mut Sheet,
    cfg: &OrderingConfig,
    order: i64,
    label: &str,
    predecessor: i64,
) -> Result<usize, OrderingError> {
    let (order_col, label_col) = columns(sheet, cfg)?;
    let last = match sheet.last_index() {
        Some(last) if last > cfg.header_offset => last,
        _ => return Err(OrderingError::NothingAppended),
    };

    let mut seen: Vec<i64> = Vec::new();
    let mut found = None;
    for idx in cfg.header_offset..last {
        let Some(value) = parse_order(sheet.cell(idx, order_col)) else {
            continue;
        };
        if seen.contains(&value) {
            return Err(OrderingError::DuplicateOrder(value));
        }
        seen.push(value);
        if value == predecessor && found.is_none() {
            found = Some(idx);
        }
    }
    if seen.contains(&order) {
        return Err(OrderingError::OrderTaken(order));
    }
    let found = found.ok_or(OrderingError::PredecessorMissing(predecessor))?;

    for i in (found + 2..=last).rev() {
        let prev_order = sheet.cell(i - 1, order_col).to_string();
        let prev_label = sheet.cell(i - 1, label_col).to_string();
        sheet.set_cell(i, order_col, prev_order)?;
        sheet.set_cell(i, label_col, prev_label)?;
    }
    let slot = found + 1;
    sheet.set_cell(slot, order_col, order.to_string())?;
    sheet.set_cell(slot, label_col, label)?;
    log::debug!(
        "inserted order {order} for `{label}` at row {slot} of `{}`",
        sheet.name()
    );
    Ok(slot)
}
