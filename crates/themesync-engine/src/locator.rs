//! Find-or-create of theme rows keyed by a unique name column.

use serde::Serialize;
use themesync_model::Sheet;

use crate::SyncError;

/// Position of a theme on a store's primary sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Located {
    pub index: usize,
    pub is_new: bool,
    /// Id of the record when the sheet has an id column.
    pub id: Option<i64>,
}

/// Row index of the first data row whose `key_column` equals `name` exactly.
pub fn find_theme(sheet: &Sheet, key_column: &str, name: &str) -> Option<usize> {
    let col = sheet.column_index(key_column)?;
    sheet
        .data_rows()
        .find(|(_, row)| row.get(col).map(String::as_str) == Some(name))
        .map(|(idx, _)| idx)
}

/// Integer prefix of a cell, or 0 when there is none (`"12abc"` is 12).
pub fn parse_id(cell: &str) -> i64 {
    let cell = cell.trim();
    let (sign, digits) = match cell.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, cell.strip_prefix('+').unwrap_or(cell)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().map(|v| sign * v).unwrap_or(0)
}

/// `max(id) + 1` over the data rows of `id_column`, or 1 for an empty sheet.
pub fn next_id(sheet: &Sheet, id_column: &str) -> Option<i64> {
    let col = sheet.column_index(id_column)?;
    let max = sheet
        .data_rows()
        .map(|(_, row)| row.get(col).map(|c| parse_id(c)).unwrap_or(0))
        .max()
        .unwrap_or(0);
    Some(max + 1)
}

/// Locate `name` on `sheet`, appending a fresh row when it is absent.
///
/// The new row is empty except for the id (`max + 1`, when the sheet has an id
/// column) and the key. Calling this again with the same name finds the row
/// created by the first call.
pub fn locate_theme(
    sheet: &mut Sheet,
    key_column: &str,
    id_column: &str,
    name: &str,
) -> Result<Located, SyncError> {
    let Some(key_col) = sheet.column_index(key_column) else {
        return Err(SyncError::MissingKeyColumn {
            sheet: sheet.name().to_string(),
            column: key_column.to_string(),
        });
    };
    let id_col = sheet.column_index(id_column);

    if let Some(index) = find_theme(sheet, key_column, name) {
        let id = id_col.map(|col| parse_id(sheet.cell(index, col)));
        log::debug!("theme `{name}` found at row {index} of `{}`", sheet.name());
        return Ok(Located {
            index,
            is_new: false,
            id,
        });
    }

    let id = next_id(sheet, id_column);
    let index = sheet.push_empty_row();
    if let (Some(col), Some(id)) = (id_col, id) {
        sheet.set_cell(index, col, id.to_string())?;
    }
    sheet.set_cell(index, key_col, name)?;
    log::info!(
        "created theme `{name}` at row {index} of `{}` (id {})",
        sheet.name(),
        id.map_or_else(|| "-".to_string(), |id| id.to_string())
    );

    Ok(Located {
        index,
        is_new: true,
        id,
    })
}
