//! Static channel mapping table for indirect mode.

use serde::{Deserialize, Serialize};

/// Sentinel `targetChannel` meaning "do not import this source code".
pub const DO_NOT_IMPORT: &str = "暂不导入";

/// Historical misspelling of [`DO_NOT_IMPORT`] still present in older tables.
pub const DO_NOT_IMPORT_LEGACY: &str = "占不导入";

/// One rule translating a source color code into a target channel column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelMapping {
    pub target_channel: String,
    #[serde(default)]
    pub purpose: String,
    #[serde(default)]
    pub source_code: String,
}

impl ChannelMapping {
    pub fn new(target: &str, purpose: &str, code: &str) -> Self {
        Self {
            target_channel: target.to_string(),
            purpose: purpose.to_string(),
            source_code: code.to_string(),
        }
    }

    pub fn is_do_not_import(&self) -> bool {
        is_do_not_import(&self.target_channel)
    }
}

pub fn is_do_not_import(target: &str) -> bool {
    let target = target.trim();
    target == DO_NOT_IMPORT || target == DO_NOT_IMPORT_LEGACY
}

/// The legacy 17-entry table, in application order.
pub fn builtin_channel_mapping() -> Vec<ChannelMapping> {
    [
        ("P1", "地板颜色", "P1"),
        ("P5", "跳板颜色", "P2"),
        ("G1", "装饰颜色1", "G1"),
        ("G2", "装饰颜色2", "G2"),
        ("G3", "装饰颜色3", "G3"),
        ("G4", "装饰颜色4", "G4"),
        ("P2", "地板描边颜色", "P1-1"),
        ("P9", "地板侧面颜色", "P1-2"),
        ("P6", "跳板描边颜色", "P2-1"),
        ("P10", "跳板侧面颜色", "P2-2"),
        ("G5", "装饰颜色5", "G5"),
        ("G6", "装饰颜色6", "G6"),
        ("G7", "装饰颜色7", "G7"),
        ("P3", "预留颜色通道3", "P3"),
        ("P4", "预留颜色通道4", "P4"),
        ("P7", "预留颜色通道7", "P7"),
        ("P8", "预留颜色通道8", "P8"),
    ]
    .into_iter()
    .map(|(target, purpose, code)| ChannelMapping::new(target, purpose, code))
    .collect()
}
