//! Writing validated field groups onto aligned rows.

use serde::Serialize;
use themesync_model::Sheet;

use crate::fields::FieldSpec;
use crate::status::Selection;
use crate::SyncError;

/// Where a written field value came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueOrigin {
    Source,
    Existing,
    Default,
}

impl ValueOrigin {
    pub const fn as_str(self) -> &'static str {
        match self {
            ValueOrigin::Source => "source",
            ValueOrigin::Existing => "existing",
            ValueOrigin::Default => "default",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldOutcome {
    pub group: String,
    pub sheet: String,
    pub field: String,
    pub value: String,
    pub was_corrected: bool,
    pub origin: ValueOrigin,
}

/// Result of synchronizing one field group.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GroupSync {
    pub outcomes: Vec<FieldOutcome>,
    /// Fields skipped because the target header lacks their column.
    pub missing_columns: Vec<String>,
}

/// Write every field of `group` onto `row` of `sheet`.
///
/// `select` decides each field's raw value. Values go through the field's
/// validator. Fields without an opinion keep the row's structural value (the
/// template copied by [`align_row`]) when it validates, and otherwise receive
/// the validated default. A field whose column is missing from the header is
/// logged and skipped.
pub fn synchronize_fields<F>(
    sheet: &mut Sheet,
    row: usize,
    group: &str,
    specs: &[FieldSpec],
    mut select: F,
) -> Result<GroupSync, SyncError>
where
    F: FnMut(&FieldSpec) -> Selection,
{
    let mut result = GroupSync::default();
    for spec in specs {
        let Some(col) = sheet.column_index(&spec.column) else {
            log::warn!(
                "sheet `{}` has no `{}` column; skipping field of group `{group}`",
                sheet.name(),
                spec.column
            );
            result.missing_columns.push(spec.column.clone());
            continue;
        };

        let (corrected, origin) = match select(spec) {
            Selection::Source(raw) => (spec.validator.apply(&raw, &spec.default), ValueOrigin::Source),
            Selection::Existing(raw) => (
                spec.validator.apply(&raw, &spec.default),
                ValueOrigin::Existing,
            ),
            Selection::NoOpinion => {
                let current = sheet.cell(row, col).trim();
                let kept = if current.is_empty() {
                    None
                } else {
                    spec.validator.check(current)
                };
                match kept {
                    Some(kept) => (kept, ValueOrigin::Existing),
                    None => {
                        let mut corrected = spec.validator.apply(&spec.default, &spec.default);
                        corrected.was_corrected = !current.is_empty();
                        (corrected, ValueOrigin::Default)
                    }
                }
            }
        };

        if corrected.was_corrected {
            log::debug!(
                "corrected `{}` on `{}` row {row} to `{}`",
                spec.column,
                sheet.name(),
                corrected.value
            );
        }
        sheet.set_cell(row, col, corrected.value.clone())?;
        result.outcomes.push(FieldOutcome {
            group: group.to_string(),
            sheet: sheet.name().to_string(),
            field: spec.column.clone(),
            value: corrected.value,
            was_corrected: corrected.was_corrected,
            origin,
        });
    }
    Ok(result)
}

/// Identity written onto rows created for a theme.
#[derive(Clone, Copy, Debug)]
pub struct RowStamp<'a> {
    pub key_column: &'a str,
    pub id_column: &'a str,
    pub name: &'a str,
    pub id: Option<i64>,
}

/// What [`align_row`] had to do.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Alignment {
    /// Rows appended to reach the target index.
    pub appended: usize,
    /// The target row did not exist and was created.
    pub created_target: bool,
}

impl Alignment {
    /// Rows padded in front of the target row.
    pub fn shortfall(&self) -> usize {
        self.appended.saturating_sub(1)
    }
}

/// Make sure `sheet` has a row at `index`.
///
/// Missing rows are copies of the sheet's last data row (an empty row when the
/// sheet only has a header). A created target row is stamped with the theme's
/// id and key. Sheets without a header are left alone.
pub fn align_row(
    sheet: &mut Sheet,
    index: usize,
    stamp: &RowStamp<'_>,
) -> Result<Alignment, SyncError> {
    if sheet.is_empty() {
        log::warn!("sheet `{}` has no header; cannot align row {index}", sheet.name());
        return Ok(Alignment::default());
    }

    let template = if sheet.data_len() > 0 {
        sheet.rows().last().cloned().unwrap_or_default()
    } else {
        Vec::new()
    };

    let mut appended = 0;
    while sheet.len() <= index {
        sheet.push_row(template.clone());
        appended += 1;
    }

    let alignment = Alignment {
        appended,
        created_target: appended > 0,
    };
    if alignment.shortfall() > 0 {
        log::warn!(
            "sheet `{}` was {} row(s) short of row {index}; padded with copies of the last row",
            sheet.name(),
            alignment.shortfall()
        );
    }
    if alignment.created_target {
        stamp_row(sheet, index, stamp)?;
    }
    Ok(alignment)
}

/// Write the theme's id and key onto `row`, for whichever columns exist.
pub fn stamp_row(sheet: &mut Sheet, row: usize, stamp: &RowStamp<'_>) -> Result<(), SyncError> {
    if let (Some(col), Some(id)) = (sheet.column_index(stamp.id_column), stamp.id) {
        sheet.set_cell(row, col, id.to_string())?;
    }
    if let Some(col) = sheet.column_index(stamp.key_column) {
        sheet.set_cell(row, col, stamp.name)?;
    }
    Ok(())
}
