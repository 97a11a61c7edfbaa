//! Run configuration.
//!
//! Every field has a default so a JSON config file only needs the keys it
//! overrides. Nested structs fall back to their own `Default` when partially
//! specified.

use core::fmt;

use serde::{Deserialize, Serialize};
use themesync_model::Document;

use crate::fields::{default_field_groups, FieldGroup};
use crate::mapping::{builtin_channel_mapping, ChannelMapping};
use crate::ordering::OrderingConfig;
use crate::series::SeriesConfig;

/// Which of the two persisted stores an operation targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    /// The attributes store (`RSC_Theme`), owner of record ids and names.
    Primary,
    /// The customization store (`UGCTheme`), row-aligned with the primary store.
    Companion,
}

impl StoreKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            StoreKind::Primary => "primary",
            StoreKind::Companion => "companion",
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sheet layout of one store.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreLayout {
    /// Sheet holding one row per theme. `None` selects the first sheet.
    pub primary_sheet: Option<String>,
    /// Unique theme-name column.
    pub key_column: String,
    /// Integer id column (optional in the sheet).
    pub id_column: String,
    /// Additional sheets the engine may rewrite. Nothing else is touched.
    pub auxiliary_sheets: Vec<String>,
}

impl Default for StoreLayout {
    fn default() -> Self {
        Self {
            primary_sheet: None,
            key_column: "notes".to_string(),
            id_column: "id".to_string(),
            auxiliary_sheets: Vec::new(),
        }
    }
}

impl StoreLayout {
    fn with_auxiliary(sheets: &[&str]) -> Self {
        Self {
            auxiliary_sheets: sheets.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    /// Name of the primary sheet within `document`.
    pub fn primary_sheet_name(&self, document: &Document) -> Option<String> {
        match &self.primary_sheet {
            Some(name) => Some(name.clone()),
            None => document.first_sheet().map(|sheet| sheet.name().to_string()),
        }
    }
}

/// Everything a run needs besides the documents themselves.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub primary: StoreLayout,
    pub companion: StoreLayout,
    pub channel_mapping: Vec<ChannelMapping>,
    pub field_groups: Vec<FieldGroup>,
    pub series: SeriesConfig,
    pub ordering: Option<OrderingConfig>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            primary: StoreLayout::with_auxiliary(&["ColorInfo", "Light", "FloodLight", "Fog"]),
            companion: StoreLayout::with_auxiliary(&[
                "Custom_Ground_Color",
                "Custom_Fragile_Color",
                "Custom_Fragile_Active_Color",
                "Custom_Jump_Color",
                "Custom_Jump_Active_Color",
            ]),
            channel_mapping: builtin_channel_mapping(),
            field_groups: default_field_groups(),
            series: SeriesConfig::default(),
            ordering: Some(OrderingConfig::default()),
        }
    }
}

impl SyncConfig {
    pub fn layout(&self, store: StoreKind) -> &StoreLayout {
        match store {
            StoreKind::Primary => &self.primary,
            StoreKind::Companion => &self.companion,
        }
    }
}
