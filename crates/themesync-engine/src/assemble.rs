//! Allow-listed working copies of a store's sheets.
//!
//! Sheets are checked out lazily for mutation and written back into the
//! document only when the run is assembled. Sheets outside the allow-list can
//! be read but never checked out, so they are never rewritten.

use std::collections::BTreeMap;

use themesync_model::{Document, Sheet};

use crate::config::StoreKind;
use crate::SyncError;

#[derive(Clone, Debug)]
pub struct StoreWorkspace {
    kind: StoreKind,
    document: Document,
    primary_sheet: String,
    allow_list: Vec<String>,
    working: BTreeMap<String, Sheet>,
}

impl StoreWorkspace {
    /// Wrap `document`. `primary_sheet` must exist; it is always allow-listed.
    pub fn new(
        kind: StoreKind,
        document: Document,
        primary_sheet: String,
        extra_sheets: impl IntoIterator<Item = String>,
    ) -> Result<Self, SyncError> {
        if !document.contains_sheet(&primary_sheet) {
            return Err(SyncError::MissingSheet {
                store: kind,
                sheet: primary_sheet,
            });
        }
        let mut allow_list = vec![primary_sheet.clone()];
        for sheet in extra_sheets {
            if !allow_list.contains(&sheet) {
                allow_list.push(sheet);
            }
        }
        Ok(Self {
            kind,
            document,
            primary_sheet,
            allow_list,
            working: BTreeMap::new(),
        })
    }

    pub fn kind(&self) -> StoreKind {
        self.kind
    }

    pub fn document_name(&self) -> &str {
        self.document.name()
    }

    pub fn primary_sheet_name(&self) -> &str {
        &self.primary_sheet
    }

    pub fn is_allowed(&self, name: &str) -> bool {
        self.allow_list.iter().any(|allowed| allowed == name)
    }

    /// Current contents of `name`: the working copy if checked out, else the
    /// document's sheet.
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.working.get(name).or_else(|| self.document.sheet(name))
    }

    pub fn primary(&self) -> Option<&Sheet> {
        self.sheet(&self.primary_sheet)
    }

    /// Check `name` out for mutation. `None` for sheets that are missing or
    /// not allow-listed.
    pub fn sheet_mut(&mut self, name: &str) -> Option<&mut Sheet> {
        if !self.is_allowed(name) {
            log::debug!("{} sheet `{name}` is not allow-listed; not writable", self.kind);
            return None;
        }
        if !self.working.contains_key(name) {
            let original = self.document.sheet(name)?.clone();
            self.working.insert(name.to_string(), original);
        }
        self.working.get_mut(name)
    }

    /// Names of the sheets checked out so far.
    pub fn touched(&self) -> impl Iterator<Item = &str> + '_ {
        self.working.keys().map(String::as_str)
    }

    /// Write every checked-out sheet back into the document.
    pub fn assemble(self) -> Result<Document, SyncError> {
        let Self {
            mut document,
            working,
            kind,
            ..
        } = self;
        for (name, sheet) in working {
            log::debug!("reserializing {kind} sheet `{name}`");
            document.replace_sheet(sheet)?;
        }
        Ok(document)
    }
}
