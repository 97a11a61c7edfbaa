//! Indirect-mode color channel resolution.
//!
//! After [`resolve_channels`] and [`fill_channel_defaults`] every channel
//! column (`P*`/`G*`) of the target row holds a valid uppercase hex value.

use serde::Serialize;
use themesync_model::Sheet;

use crate::alias::{AliasTable, LogicalField, SOURCE_COLOR_ALIASES};
use crate::color::{is_channel_column, is_valid_hex, parse_color_text, parse_component, rgb_to_hex, DEFAULT_HEX};
use crate::mapping::ChannelMapping;
use crate::SyncError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelOutcome {
    pub channel: String,
    pub source_code: String,
    pub value: String,
    pub is_default: bool,
    /// Nothing was written for this entry.
    pub skipped: bool,
    /// Written by the completeness pass rather than a mapping entry.
    pub implicit: bool,
}

/// A source row whose color could not be interpreted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvalidColor {
    pub channel: String,
    pub source_code: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChannelResolution {
    pub outcomes: Vec<ChannelOutcome>,
    pub invalid_colors: Vec<InvalidColor>,
    /// Target channels named by the mapping but absent from the header.
    pub missing_columns: Vec<String>,
}

/// Rows of a legacy color sheet, looked up by color code.
#[derive(Clone, Copy, Debug)]
pub struct ColorSource<'a> {
    sheet: &'a Sheet,
    aliases: &'a AliasTable,
}

impl<'a> ColorSource<'a> {
    pub fn new(sheet: &'a Sheet) -> Self {
        Self::with_aliases(sheet, &SOURCE_COLOR_ALIASES)
    }

    pub fn with_aliases(sheet: &'a Sheet, aliases: &'a AliasTable) -> Self {
        Self { sheet, aliases }
    }

    /// First row whose code equals `code`, ignoring ASCII case.
    ///
    /// Rows without any aliased code value are keyed by their first non-empty
    /// cell.
    pub fn find_row(&self, code: &str) -> Option<&'a [String]> {
        let code = code.trim();
        let header = self.sheet.header();
        self.sheet
            .data_rows()
            .map(|(_, row)| row)
            .find(|row| {
                let key = self
                    .aliases
                    .value(header, row, LogicalField::Code)
                    .or_else(|| row.iter().map(|c| c.trim()).find(|c| !c.is_empty()));
                key.is_some_and(|key| key.eq_ignore_ascii_case(code))
            })
    }

    /// Color of `row` as uppercase hex: the hex field first, then an R/G/B
    /// triple.
    pub fn color_of(&self, row: &[String]) -> Option<String> {
        let header = self.sheet.header();
        if let Some(hex) = self
            .aliases
            .value(header, row, LogicalField::Hex)
            .and_then(parse_color_text)
        {
            return Some(hex);
        }
        let [r, g, b] = self.aliases.resolve_rgb(header)?;
        let component = |col: usize| row.get(col).and_then(|c| parse_component(c));
        rgb_to_hex(component(r)?, component(g)?, component(b)?)
    }
}

/// Apply `mapping` to `row` of `target`.
///
/// Entries with an empty source code are skipped entirely. Every other entry
/// yields one outcome; only entries with a real target column write a cell.
pub fn resolve_channels(
    target: &mut Sheet,
    row: usize,
    mapping: &[ChannelMapping],
    source: &ColorSource<'_>,
) -> Result<ChannelResolution, SyncError> {
    let mut resolution = ChannelResolution::default();

    for entry in mapping {
        let code = entry.source_code.trim();
        if code.is_empty() {
            continue;
        }
        let channel = entry.target_channel.trim();

        let source_row = source.find_row(code);
        let resolved = source_row.and_then(|r| source.color_of(r));
        if source_row.is_some() && resolved.is_none() && !entry.is_do_not_import() {
            log::warn!("color `{code}` has no valid value; `{channel}` falls back to {DEFAULT_HEX}");
            resolution.invalid_colors.push(InvalidColor {
                channel: channel.to_string(),
                source_code: code.to_string(),
            });
        }
        let is_default = resolved.is_none();
        let value = resolved.unwrap_or_else(|| DEFAULT_HEX.to_string());

        let mut outcome = ChannelOutcome {
            channel: channel.to_string(),
            source_code: code.to_string(),
            value,
            is_default,
            skipped: false,
            implicit: false,
        };

        if entry.is_do_not_import() {
            outcome.value = DEFAULT_HEX.to_string();
            outcome.is_default = true;
            outcome.skipped = true;
        } else if channel.is_empty() {
            outcome.skipped = true;
        } else if let Some(col) = target.column_index(channel) {
            target.set_cell(row, col, outcome.value.clone())?;
        } else {
            log::warn!(
                "sheet `{}` has no `{channel}` column; mapping for `{code}` not written",
                target.name()
            );
            resolution.missing_columns.push(channel.to_string());
            outcome.skipped = true;
        }
        resolution.outcomes.push(outcome);
    }

    Ok(resolution)
}

/// Give every channel column of `row` a valid hex value.
///
/// Empty or invalid cells get [`DEFAULT_HEX`] and an implicit outcome; valid
/// lowercase values are uppercased in place.
pub fn fill_channel_defaults(target: &mut Sheet, row: usize) -> Result<Vec<ChannelOutcome>, SyncError> {
    let channels: Vec<(usize, String)> = target
        .header()
        .iter()
        .enumerate()
        .filter(|(_, name)| is_channel_column(name))
        .map(|(col, name)| (col, name.clone()))
        .collect();

    let mut outcomes = Vec::new();
    for (col, channel) in channels {
        let current = target.cell(row, col).trim().to_string();
        if is_valid_hex(&current) {
            let upper = current.to_ascii_uppercase();
            if upper != target.cell(row, col) {
                target.set_cell(row, col, upper)?;
            }
            continue;
        }
        log::debug!("channel `{channel}` empty or invalid; writing {DEFAULT_HEX}");
        target.set_cell(row, col, DEFAULT_HEX)?;
        outcomes.push(ChannelOutcome {
            channel,
            source_code: String::new(),
            value: DEFAULT_HEX.to_string(),
            is_default: true,
            skipped: false,
            implicit: true,
        });
    }
    Ok(outcomes)
}
