use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use rust_xlsxwriter::{Format, Workbook};
use themesync_model::Document;

use crate::read::{datetime_to_serial, format_float, DATETIME_FORMAT, DATE_FORMAT};
use crate::StoreIoError;

/// Typed form a cell's text is written as.
#[derive(Debug, Clone, Copy, PartialEq)]
enum CellValue<'a> {
    Number(f64),
    Boolean(bool),
    Date(f64),
    DateTime(f64),
    Text(&'a str),
}

fn classify(text: &str) -> CellValue<'_> {
    match text {
        "TRUE" => return CellValue::Boolean(true),
        "FALSE" => return CellValue::Boolean(false),
        _ => {}
    }
    if let Some(number) = as_number(text) {
        return CellValue::Number(number);
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, DATE_FORMAT) {
        if date.format(DATE_FORMAT).to_string() == text {
            if let Some(serial) = date.and_hms_opt(0, 0, 0).and_then(datetime_to_serial) {
                return CellValue::Date(serial);
            }
        }
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, DATETIME_FORMAT) {
        if dt.format(DATETIME_FORMAT).to_string() == text {
            if let Some(serial) = datetime_to_serial(dt) {
                return CellValue::DateTime(serial);
            }
        }
    }
    CellValue::Text(text)
}

/// Save `document` as an `.xlsx` workbook at `path`.
///
/// Cells whose text is the canonical form of a number, a boolean (`TRUE`,
/// `FALSE`) or a date are written as typed cells, the inverse of how they are
/// read. Everything else (ids with leading zeros, hex colors, names) stays text.
pub(crate) fn write_xlsx(path: &Path, document: &Document) -> Result<(), StoreIoError> {
    let xlsx_err = |source| StoreIoError::Xlsx {
        path: path.to_path_buf(),
        source,
    };

    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let datetime_format = Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");

    let mut workbook = Workbook::new();
    for sheet in document.sheets() {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet.name()).map_err(xlsx_err)?;

        for (r, row) in sheet.rows().iter().enumerate() {
            for (c, text) in row.iter().enumerate() {
                if text.is_empty() {
                    continue;
                }
                let (Ok(row_idx), Ok(col_idx)) = (u32::try_from(r), u16::try_from(c)) else {
                    return Err(StoreIoError::OutOfBounds {
                        sheet: sheet.name().to_string(),
                        row: r,
                        col: c,
                    });
                };
                match classify(text) {
                    CellValue::Number(number) => worksheet.write_number(row_idx, col_idx, number),
                    CellValue::Boolean(flag) => worksheet.write_boolean(row_idx, col_idx, flag),
                    CellValue::Date(serial) => {
                        worksheet.write_number_with_format(row_idx, col_idx, serial, &date_format)
                    }
                    CellValue::DateTime(serial) => worksheet.write_number_with_format(
                        row_idx,
                        col_idx,
                        serial,
                        &datetime_format,
                    ),
                    CellValue::Text(text) => worksheet.write_string(row_idx, col_idx, text),
                }
                .map_err(xlsx_err)?;
            }
        }
    }

    workbook.save(path).map_err(xlsx_err)?;
    log::info!("wrote `{}`", path.display());
    Ok(())
}

fn as_number(text: &str) -> Option<f64> {
    let value = text.parse::<f64>().ok()?;
    (value.is_finite() && format_float(value) == text).then_some(value)
}
