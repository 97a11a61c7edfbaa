//! Mapping-mode detection and source color sheet selection.

use serde::Serialize;
use themesync_model::{Document, Sheet};

use crate::status::{StatusError, StatusFlags, STATUS_SHEET};

/// Legacy "complete color table" sheet name.
pub const LEGACY_COLOR_SHEET: &str = "完整配色表";

/// How channel values are resolved for a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MappingMode {
    /// Channel values come from the legacy color table through the mapping table.
    Indirect,
    /// Field groups are read from same-named source sheets, gated by `Status`.
    Direct,
}

impl MappingMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            MappingMode::Indirect => "indirect",
            MappingMode::Direct => "direct",
        }
    }
}

/// Outcome of [`detect`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Detection {
    pub mode: MappingMode,
    /// Parsed flags, present in direct mode only.
    pub status: Option<StatusFlags>,
    /// Why a present `Status` sheet was not used.
    pub fallback_reason: Option<StatusError>,
}

/// Inspect `source` and decide the mapping mode.
///
/// Pure: recomputed per call, nothing is cached.
pub fn detect(source: &Document) -> Detection {
    let indirect = |fallback_reason| Detection {
        mode: MappingMode::Indirect,
        status: None,
        fallback_reason,
    };

    if source.contains_sheet(LEGACY_COLOR_SHEET) {
        log::debug!("source has `{LEGACY_COLOR_SHEET}`; using indirect mode");
        return indirect(None);
    }

    let Some(status) = source.sheet(STATUS_SHEET) else {
        log::debug!("source has no `{STATUS_SHEET}` sheet; using indirect mode");
        return indirect(None);
    };

    match StatusFlags::parse(status) {
        Ok(flags) => {
            log::debug!("source `{STATUS_SHEET}` parsed; using direct mode");
            Detection {
                mode: MappingMode::Direct,
                status: Some(flags),
                fallback_reason: None,
            }
        }
        Err(err) => {
            log::warn!("unreadable `{STATUS_SHEET}` sheet ({err}); falling back to indirect mode");
            indirect(Some(err))
        }
    }
}

pub fn detect_mapping_mode(source: &Document) -> MappingMode {
    detect(source).mode
}

/// Sheet holding the legacy color rows: `完整配色表`, else the first sheet
/// whose name mentions `配色` or `颜色`, else the first sheet.
pub fn source_color_sheet(source: &Document) -> Option<&Sheet> {
    if let Some(sheet) = source.sheet(LEGACY_COLOR_SHEET) {
        return Some(sheet);
    }
    if let Some(sheet) = source
        .sheets()
        .iter()
        .find(|sheet| sheet.name().contains("配色") || sheet.name().contains("颜色"))
    {
        return Some(sheet);
    }
    let first = source.first_sheet()?;
    log::warn!(
        "no color sheet found in `{}`; reading colors from first sheet `{}`",
        source.name(),
        first.name()
    );
    Some(first)
}
