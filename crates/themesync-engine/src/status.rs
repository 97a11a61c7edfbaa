//! Typed `Status` flags and the direct-mode field selector.
//!
//! The `Status` sheet is a two-row table: row 0 names field groups, row 1 holds
//! a `0`/`1` flag per group. `1` makes the source document authoritative for
//! that group, `0` makes the engine ignore the source entirely.

use serde::Serialize;
use themesync_model::Sheet;
use thiserror::Error;

/// Name of the sheet holding the flags in a source document.
pub const STATUS_SHEET: &str = "Status";

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StatusError {
    #[error("status sheet has an empty header row")]
    EmptyHeader,
    #[error("status sheet has no flags row")]
    MissingFlagsRow,
    #[error("status flag for `{group}` must be 0 or 1, found `{value}`")]
    InvalidFlag { group: String, value: String },
    #[error("status sheet lists `{0}` more than once")]
    DuplicateGroup(String),
}

/// Parsed `Status` sheet, in header order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StatusFlags {
    entries: Vec<(String, bool)>,
}

impl StatusFlags {
    /// Parse a `Status` sheet.
    ///
    /// Columns with a blank header are ignored. Every named column must carry
    /// exactly `0` or `1` in row 1; anything else is an error rather than a
    /// silent default.
    pub fn parse(sheet: &Sheet) -> Result<Self, StatusError> {
        let header = sheet.header();
        if header.iter().all(|name| name.trim().is_empty()) {
            return Err(StatusError::EmptyHeader);
        }
        if sheet.len() < 2 {
            return Err(StatusError::MissingFlagsRow);
        }

        let mut entries: Vec<(String, bool)> = Vec::new();
        for (col, name) in header.iter().enumerate() {
            let group = name.trim();
            if group.is_empty() {
                continue;
            }
            if entries
                .iter()
                .any(|(existing, _)| existing.eq_ignore_ascii_case(group))
            {
                return Err(StatusError::DuplicateGroup(group.to_string()));
            }
            let value = sheet.cell(1, col).trim();
            let flag = match value {
                "1" => true,
                "0" => false,
                _ => {
                    return Err(StatusError::InvalidFlag {
                        group: group.to_string(),
                        value: value.to_string(),
                    })
                }
            };
            entries.push((group.to_string(), flag));
        }
        Ok(Self { entries })
    }

    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, bool)>,
        S: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(group, flag)| (group.into(), flag))
                .collect(),
        }
    }

    /// `Some(flag)` when `group` is listed (ignoring ASCII case), `None`
    /// otherwise.
    pub fn flag(&self, group: &str) -> Option<bool> {
        self.entries
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(group))
            .map(|(_, flag)| *flag)
    }

    pub fn groups(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Where a direct-mode field value should come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    /// Take this value from the source document.
    Source(String),
    /// Keep this value already present in the target store.
    Existing(String),
    /// No opinion; the caller applies structural defaults.
    NoOpinion,
}

/// Inputs for one selector query.
#[derive(Clone, Copy, Debug)]
pub struct SelectionContext<'a> {
    /// The source document's sheet for this field group, if any.
    pub source: Option<&'a Sheet>,
    /// The target store sheet for this field group, if any.
    pub target: Option<&'a Sheet>,
    /// Row of the theme in `target`.
    pub row_index: usize,
    pub is_new: bool,
}

/// Decide where `field` of `group` comes from.
///
/// Source values are read from the first data row of the source sheet. Existing
/// values are only consulted for updates, at the theme's aligned row.
pub fn select_field(
    flags: &StatusFlags,
    group: &str,
    field: &str,
    ctx: &SelectionContext<'_>,
) -> Selection {
    match flags.flag(group) {
        Some(true) => match source_value(ctx.source, field) {
            Some(value) => Selection::Source(value),
            None => existing_value(ctx, field),
        },
        Some(false) | None => existing_value(ctx, field),
    }
}

fn source_value(source: Option<&Sheet>, field: &str) -> Option<String> {
    let sheet = source?;
    let col = sheet.column_index(field)?;
    let value = sheet.cell(1, col).trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn existing_value(ctx: &SelectionContext<'_>, field: &str) -> Selection {
    if ctx.is_new {
        return Selection::NoOpinion;
    }
    let Some(sheet) = ctx.target else {
        return Selection::NoOpinion;
    };
    let Some(col) = sheet.column_index(field) else {
        return Selection::NoOpinion;
    };
    let value = sheet.cell(ctx.row_index, col).trim();
    if value.is_empty() {
        Selection::NoOpinion
    } else {
        Selection::Existing(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(name: &str, rows: &[&[&str]]) -> Sheet {
        Sheet::from_rows(
            name,
            rows.iter()
                .map(|row| row.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn parses_flags_in_header_order() {
        let status = sheet(STATUS_SHEET, &[&["Color", "", "Light"], &["1", "x", "0"]]);
        let flags = StatusFlags::parse(&status).unwrap();
        assert_eq!(flags.groups().collect::<Vec<_>>(), vec!["Color", "Light"]);
        assert_eq!(flags.flag("Color"), Some(true));
        assert_eq!(flags.flag("Light"), Some(false));
        assert_eq!(flags.flag("Fog"), None);
    }

    #[test]
    fn group_names_match_ignoring_case() {
        let status = sheet(STATUS_SHEET, &[&["COLOR", "light"], &["1", "0"]]);
        let flags = StatusFlags::parse(&status).unwrap();
        assert_eq!(flags.flag("Color"), Some(true));
        assert_eq!(flags.flag("Light"), Some(false));
        assert_eq!(
            StatusFlags::parse(&sheet(STATUS_SHEET, &[&["Fog", "FOG"], &["1", "0"]])),
            Err(StatusError::DuplicateGroup("FOG".to_string()))
        );
    }

    #[test]
    fn malformed_sheets_fail_loudly() {
        assert_eq!(
            StatusFlags::parse(&sheet(STATUS_SHEET, &[&["", " "], &["1", "0"]])),
            Err(StatusError::EmptyHeader)
        );
        assert_eq!(
            StatusFlags::parse(&sheet(STATUS_SHEET, &[&["Color"]])),
            Err(StatusError::MissingFlagsRow)
        );
        assert_eq!(
            StatusFlags::parse(&sheet(STATUS_SHEET, &[&["Color"], &["yes"]])),
            Err(StatusError::InvalidFlag {
                group: "Color".to_string(),
                value: "yes".to_string()
            })
        );
        assert_eq!(
            StatusFlags::parse(&sheet(STATUS_SHEET, &[&["Fog", "Fog"], &["1", "1"]])),
            Err(StatusError::DuplicateGroup("Fog".to_string()))
        );
    }

    #[test]
    fn valid_flag_prefers_source_then_existing() {
        let flags = StatusFlags::from_entries([("Light", true)]);
        let source = sheet("Light", &[&["LightIntensity", "LightColor"], &["2", ""]]);
        let target = sheet(
            "Light",
            &[&["notes", "LightIntensity", "LightColor"], &["Forest", "1", "00FF00"]],
        );
        let ctx = SelectionContext {
            source: Some(&source),
            target: Some(&target),
            row_index: 1,
            is_new: false,
        };
        assert_eq!(
            select_field(&flags, "Light", "LightIntensity", &ctx),
            Selection::Source("2".to_string())
        );
        assert_eq!(
            select_field(&flags, "Light", "LightColor", &ctx),
            Selection::Existing("00FF00".to_string())
        );
    }

    #[test]
    fn invalid_flag_ignores_source() {
        let flags = StatusFlags::from_entries([("Light", false)]);
        let source = sheet("Light", &[&["LightIntensity"], &["2"]]);
        let target = sheet("Light", &[&["LightIntensity"], &["5"]]);
        let mut ctx = SelectionContext {
            source: Some(&source),
            target: Some(&target),
            row_index: 1,
            is_new: false,
        };
        assert_eq!(
            select_field(&flags, "Light", "LightIntensity", &ctx),
            Selection::Existing("5".to_string())
        );
        ctx.is_new = true;
        assert_eq!(
            select_field(&flags, "Light", "LightIntensity", &ctx),
            Selection::NoOpinion
        );
    }

    #[test]
    fn unlisted_group_has_no_opinion_for_new_themes() {
        let flags = StatusFlags::default();
        let source = sheet("Fog", &[&["FogStart"], &["10"]]);
        let ctx = SelectionContext {
            source: Some(&source),
            target: None,
            row_index: 1,
            is_new: true,
        };
        assert_eq!(
            select_field(&flags, "Fog", "FogStart", &ctx),
            Selection::NoOpinion
        );
    }
}
