use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{DocumentError, Sheet};

/// A named collection of sheets representing one persisted tabular file.
///
/// The name is the document identity (usually the file name) and never
/// changes; the sheets are freely mutable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    name: String,
    sheets: Vec<Sheet>,
}

/// JSON-friendly document layout exchanged with store collaborators:
/// `{ "sheetNames": [...], "sheets": { name: [[cell, ...], ...] } }`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentShape {
    pub sheet_names: Vec<String>,
    #[serde(default)]
    pub sheets: BTreeMap<String, Vec<Vec<String>>>,
}

impl Document {
    /// Create an empty document.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sheets: Vec::new(),
        }
    }

    /// Create a document from sheets, rejecting duplicate or empty names.
    pub fn with_sheets(
        name: impl Into<String>,
        sheets: impl IntoIterator<Item = Sheet>,
    ) -> Result<Self, DocumentError> {
        let mut doc = Self::new(name);
        for sheet in sheets {
            doc.add_sheet(sheet)?;
        }
        Ok(doc)
    }

    /// Build a document from its [`DocumentShape`].
    ///
    /// Every listed sheet must have data and every sheet with data must be
    /// listed, so the sheet order is always unambiguous.
    pub fn from_shape(name: impl Into<String>, shape: DocumentShape) -> Result<Self, DocumentError> {
        let DocumentShape {
            sheet_names,
            mut sheets,
        } = shape;

        let mut doc = Self::new(name);
        for sheet_name in sheet_names {
            let rows = sheets
                .remove(&sheet_name)
                .ok_or_else(|| DocumentError::MissingSheetData(sheet_name.clone()))?;
            doc.add_sheet(Sheet::from_rows(sheet_name, rows))?;
        }
        if let Some(extra) = sheets.into_keys().next() {
            return Err(DocumentError::UnlistedSheet(extra));
        }
        Ok(doc)
    }

    /// Snapshot the document as a [`DocumentShape`].
    pub fn to_shape(&self) -> DocumentShape {
        DocumentShape {
            sheet_names: self.sheet_names().map(str::to_string).collect(),
            sheets: self
                .sheets
                .iter()
                .map(|sheet| (sheet.name().to_string(), sheet.rows().to_vec()))
                .collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sheet names in document order.
    pub fn sheet_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.sheets.iter().map(Sheet::name)
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn first_sheet(&self) -> Option<&Sheet> {
        self.sheets.first()
    }

    pub fn contains_sheet(&self, name: &str) -> bool {
        self.sheet(name).is_some()
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|sheet| sheet.name() == name)
    }

    pub fn sheet_mut(&mut self, name: &str) -> Option<&mut Sheet> {
        self.sheets.iter_mut().find(|sheet| sheet.name() == name)
    }

    /// Append a sheet at the end of the document.
    pub fn add_sheet(&mut self, sheet: Sheet) -> Result<(), DocumentError> {
        if sheet.name().is_empty() {
            return Err(DocumentError::EmptySheetName);
        }
        if self.contains_sheet(sheet.name()) {
            return Err(DocumentError::DuplicateSheet(sheet.name().to_string()));
        }
        self.sheets.push(sheet);
        Ok(())
    }

    /// Replace the sheet with the same name in place, returning the previous one.
    pub fn replace_sheet(&mut self, sheet: Sheet) -> Result<Sheet, DocumentError> {
        let slot = self
            .sheets
            .iter_mut()
            .find(|existing| existing.name() == sheet.name())
            .ok_or_else(|| DocumentError::SheetNotFound(sheet.name().to_string()))?;
        Ok(std::mem::replace(slot, sheet))
    }
}
