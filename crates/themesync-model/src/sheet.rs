use crate::DocumentError;

/// A sheet: an ordered list of rows where row 0 is the header.
///
/// Rows may be shorter than the header; missing trailing cells read as empty
/// strings. The header is fixed once the sheet is constructed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sheet {
    name: String,
    rows: Vec<Vec<String>>,
}

impl Sheet {
    /// Create a sheet containing only a header row.
    pub fn new(name: impl Into<String>, header: Vec<String>) -> Self {
        Self {
            name: name.into(),
            rows: vec![header],
        }
    }

    /// Create a sheet from raw rows (row 0 is the header).
    ///
    /// An empty `rows` vector produces a sheet without a header.
    pub fn from_rows(name: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Header cells; empty when the sheet has no rows at all.
    pub fn header(&self) -> &[String] {
        self.rows.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of header columns.
    pub fn width(&self) -> usize {
        self.header().len()
    }

    /// Total number of rows, header included.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true when the sheet has no rows (not even a header).
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of data rows (rows after the header).
    pub fn data_len(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }

    /// Index of the last row, header included. `None` for a sheet without rows.
    pub fn last_index(&self) -> Option<usize> {
        self.rows.len().checked_sub(1)
    }

    /// Index of the first header column named exactly `column`.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.header().iter().position(|name| name == column)
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Iterate `(row_index, row)` over data rows.
    pub fn data_rows(&self) -> impl Iterator<Item = (usize, &[String])> + '_ {
        self.rows
            .iter()
            .enumerate()
            .skip(1)
            .map(|(idx, row)| (idx, row.as_slice()))
    }

    /// Read a cell, treating out-of-range positions as empty.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Write a data cell, padding the row with empty cells if it is short.
    pub fn set_cell(
        &mut self,
        row: usize,
        col: usize,
        value: impl Into<String>,
    ) -> Result<(), DocumentError> {
        if row == 0 {
            return Err(DocumentError::HeaderIsReadOnly(self.name.clone()));
        }
        let len = self.rows.len();
        let Some(cells) = self.rows.get_mut(row) else {
            return Err(DocumentError::RowOutOfBounds {
                sheet: self.name.clone(),
                row,
                len,
            });
        };
        if cells.len() <= col {
            cells.resize(col + 1, String::new());
        }
        cells[col] = value.into();
        Ok(())
    }

    /// Append a data row, padded to the header width. Returns its index.
    pub fn push_row(&mut self, mut row: Vec<String>) -> usize {
        let width = self.width();
        if row.len() < width {
            row.resize(width, String::new());
        }
        self.rows.push(row);
        self.rows.len() - 1
    }

    /// Append a row of empty cells (header width). Returns its index.
    pub fn push_empty_row(&mut self) -> usize {
        self.push_row(Vec::new())
    }

    pub fn into_rows(self) -> Vec<Vec<String>> {
        self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn short_rows_read_as_empty() {
        let sheet = Sheet::from_rows(
            "Theme",
            vec![strings(&["id", "notes", "P1"]), strings(&["1"])],
        );
        assert_eq!(sheet.cell(1, 0), "1");
        assert_eq!(sheet.cell(1, 2), "");
        assert_eq!(sheet.cell(9, 9), "");
    }

    #[test]
    fn set_cell_pads_short_rows() {
        let mut sheet = Sheet::from_rows(
            "Theme",
            vec![strings(&["id", "notes", "P1"]), strings(&["1"])],
        );
        sheet.set_cell(1, 2, "FF0000").unwrap();
        assert_eq!(sheet.row(1).unwrap(), strings(&["1", "", "FF0000"]).as_slice());
    }

    #[test]
    fn header_is_read_only() {
        let mut sheet = Sheet::new("Theme", strings(&["id"]));
        assert_eq!(
            sheet.set_cell(0, 0, "x"),
            Err(DocumentError::HeaderIsReadOnly("Theme".to_string()))
        );
    }

    #[test]
    fn push_row_pads_to_header_width() {
        let mut sheet = Sheet::new("Theme", strings(&["id", "notes"]));
        let idx = sheet.push_empty_row();
        assert_eq!(idx, 1);
        assert_eq!(sheet.row(1).unwrap().len(), 2);
    }
}
