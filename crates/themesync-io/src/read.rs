use std::path::Path;

use calamine::{open_workbook_auto, Data, ExcelDateTime, Reader};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use themesync_model::{Document, Sheet};

use crate::{document_name, StoreIoError};

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";
pub(crate) const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Load every sheet of a spreadsheet as a grid of strings.
///
/// Cells keep their absolute positions, so a used range starting at `B3`
/// yields two blank rows and a blank first column. Formula cells contribute
/// their cached value only.
pub(crate) fn read_spreadsheet(path: &Path) -> Result<Document, StoreIoError> {
    let spreadsheet_err = |source| StoreIoError::Spreadsheet {
        path: path.to_path_buf(),
        source,
    };

    let mut workbook = open_workbook_auto(path).map_err(spreadsheet_err)?;
    let sheet_names = workbook.sheet_names();

    let mut document = Document::new(document_name(path));
    for sheet_name in sheet_names {
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(spreadsheet_err)?;

        let mut rows: Vec<Vec<String>> = Vec::new();
        if let Some((start_row, start_col)) = range.start() {
            rows.resize(start_row as usize, Vec::new());
            for data in range.rows() {
                let mut cells = vec![String::new(); start_col as usize];
                cells.extend(data.iter().map(cell_text));
                while cells.last().is_some_and(String::is_empty) {
                    cells.pop();
                }
                rows.push(cells);
            }
        }

        if let Ok(formulas) = workbook.worksheet_formula(&sheet_name) {
            let count = formulas
                .used_cells()
                .filter(|(_, _, formula)| !formula.is_empty())
                .count();
            if count > 0 {
                log::warn!(
                    "sheet `{sheet_name}` of `{}` has {count} formula cell(s); saving keeps only their cached values",
                    path.display()
                );
            }
        }

        log::debug!("sheet `{sheet_name}`: {} row(s)", rows.len());
        document.add_sheet(Sheet::from_rows(sheet_name, rows))?;
    }
    Ok(document)
}

/// Text form of a cell. Integral numbers print without a fractional part so
/// ids read back as `7`, not `7.0`.
pub(crate) fn cell_text(value: &Data) -> String {
    match value {
        Data::Empty => String::new(),
        Data::String(v) => v.clone(),
        Data::Int(v) => v.to_string(),
        Data::Float(v) => format_float(*v),
        Data::Bool(v) => if *v { "TRUE" } else { "FALSE" }.to_string(),
        Data::DateTime(v) => format_datetime(v),
        Data::DateTimeIso(v) | Data::DurationIso(v) => v.clone(),
        Data::Error(e) => e.to_string(),
    }
}

pub(crate) fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Dates print as `2024-03-15`, date-times as `2024-03-15T08:30:00`. Durations
/// and serials outside the calendar keep the raw serial number.
fn format_datetime(value: &ExcelDateTime) -> String {
    let serial = value.as_f64();
    if value.is_duration() {
        return format_float(serial);
    }
    match serial_to_datetime(serial) {
        Some(dt) if dt.num_seconds_from_midnight() == 0 => dt.format(DATE_FORMAT).to_string(),
        Some(dt) => dt.format(DATETIME_FORMAT).to_string(),
        None => format_float(serial),
    }
}

fn excel_epoch() -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)
}

/// 1900-system serial to a calendar date-time, rounded to the second.
pub(crate) fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 1.0 || serial > 2_958_466.0 {
        return None;
    }
    let seconds = (serial * 86_400.0).round() as i64;
    excel_epoch()?.checked_add_signed(TimeDelta::try_seconds(seconds)?)
}

/// Inverse of [`serial_to_datetime`].
pub(crate) fn datetime_to_serial(dt: NaiveDateTime) -> Option<f64> {
    let elapsed = dt.signed_duration_since(excel_epoch()?);
    Some(elapsed.num_seconds() as f64 / 86_400.0)
}
