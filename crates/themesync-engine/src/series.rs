//! Theme-series detection and configuration reuse.
//!
//! Themes such as `Sunset`, `Sunset2` and `Sunset Pro` belong to one series.
//! A brand-new theme that joins an existing series inherits a few identifiers
//! from a sibling instead of requiring fresh manual input.

use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use themesync_model::Sheet;

use crate::locator::parse_id;
use crate::SyncError;

static NUMERAL_RE: OnceLock<Regex> = OnceLock::new();
static ROMAN_RE: OnceLock<Regex> = OnceLock::new();
static VERSION_RE: OnceLock<Regex> = OnceLock::new();
static QUALIFIER_RE: OnceLock<Regex> = OnceLock::new();

fn numeral_re() -> &'static Regex {
    NUMERAL_RE.get_or_init(|| {
        Regex::new(r"[\s_\-.·]*[0-9０-９零〇一二三四五六七八九十百]+$").expect("valid regex")
    })
}

fn roman_re() -> &'static Regex {
    ROMAN_RE.get_or_init(|| Regex::new(r"([\s_\-.·]*)([IVX]+)$").expect("valid regex"))
}

fn version_re() -> &'static Regex {
    VERSION_RE.get_or_init(|| {
        Regex::new(r"(?i)([\s_\-.·]*)(version|ver|v)\.?\s*[0-9]*(?:\.[0-9]+)*$")
            .expect("valid regex")
    })
}

fn qualifier_re() -> &'static Regex {
    QUALIFIER_RE.get_or_init(|| {
        Regex::new(
            r"(?i)([\s_\-.·]*)(upgraded|upgrade|remastered|remake|classic|deluxe|plus|new|old|pro|hd|ex|新版|旧版|升级版|升级|重制版|重制|新|旧)$",
        )
        .expect("valid regex")
    })
}

/// Normalized series key of a theme name.
///
/// Strips, in order: a trailing run of digits or CJK numerals, trailing roman
/// numerals, a trailing version token, a trailing qualifier word, then any
/// trailing punctuation or whitespace. Roman numerals, versions and qualifiers
/// are only stripped at a word boundary, so `ForestCanyon` and `Complex` stay
/// intact.
pub fn base_name(name: &str) -> String {
    let mut base = trim_trailing(name.trim());
    base = numeral_re()
        .find(base)
        .map_or(base, |m| &base[..m.start()]);
    base = strip_token(base, roman_re());
    base = strip_token(base, version_re());
    base = strip_token(base, qualifier_re());
    trim_trailing(base).to_string()
}

fn trim_trailing(name: &str) -> &str {
    name.trim_end_matches(|c: char| !c.is_alphanumeric())
}

/// Both names have the same non-empty [`base_name`].
pub fn same_series(a: &str, b: &str) -> bool {
    let base = base_name(a);
    !base.is_empty() && base == base_name(b)
}

fn strip_token<'a>(name: &'a str, re: &Regex) -> &'a str {
    match re.captures(name) {
        Some(caps) if at_boundary(name, &caps) => caps
            .get(0)
            .map_or(name, |whole| &name[..whole.start()]),
        _ => name,
    }
}

/// A token counts as a separate word when it follows a separator, follows a
/// non-Latin character, is itself non-ASCII, or starts a camel-case hump.
fn at_boundary(name: &str, caps: &Captures<'_>) -> bool {
    let (Some(whole), Some(sep), Some(token)) = (caps.get(0), caps.get(1), caps.get(2)) else {
        return false;
    };
    let head = &name[..whole.start()];
    let Some(prev) = head.chars().next_back() else {
        return false;
    };
    if !sep.as_str().is_empty() {
        return true;
    }
    let Some(first) = token.as_str().chars().next() else {
        return false;
    };
    !first.is_ascii()
        || !prev.is_ascii_alphanumeric()
        || (prev.is_lowercase() && first.is_uppercase())
}

/// An existing theme of the same series.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiblingCandidate {
    pub row_index: usize,
    pub name: String,
    pub id: Option<i64>,
}

/// Chooses which same-series theme to reuse when several exist.
pub trait SiblingPolicy {
    fn choose<'a>(&self, candidates: &'a [SiblingCandidate]) -> Option<&'a SiblingCandidate>;
}

/// Built-in tie-break rules. `First` matches historical behaviour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SiblingTieBreak {
    /// First match in sheet order.
    #[default]
    First,
    /// Last match in sheet order.
    Last,
    /// Match with the highest id; sheet order breaks ties.
    HighestId,
}

impl SiblingPolicy for SiblingTieBreak {
    fn choose<'a>(&self, candidates: &'a [SiblingCandidate]) -> Option<&'a SiblingCandidate> {
        match self {
            SiblingTieBreak::First => candidates.first(),
            SiblingTieBreak::Last => candidates.last(),
            SiblingTieBreak::HighestId => candidates
                .iter()
                .rev()
                .max_by_key(|c| c.id.unwrap_or(i64::MIN)),
        }
    }
}

/// Same-series rows of `sheet`, in sheet order, excluding `exclude_row`.
pub fn find_siblings(
    sheet: &Sheet,
    key_column: &str,
    id_column: &str,
    name: &str,
    exclude_row: usize,
) -> Vec<SiblingCandidate> {
    let Some(key_col) = sheet.column_index(key_column) else {
        return Vec::new();
    };
    let base = base_name(name);
    if base.is_empty() {
        return Vec::new();
    }
    let id_col = sheet.column_index(id_column);

    sheet
        .data_rows()
        .filter(|(idx, _)| *idx != exclude_row)
        .filter_map(|(idx, row)| {
            let candidate = row.get(key_col)?.trim();
            (base_name(candidate) == base).then(|| SiblingCandidate {
                row_index: idx,
                name: candidate.to_string(),
                id: id_col.map(|col| parse_id(sheet.cell(idx, col))),
            })
        })
        .collect()
}

/// A companion column inherited from the sibling.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SeriesColumn {
    pub column: String,
    /// Written when the sibling's own value is empty.
    pub default: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SeriesConfig {
    pub columns: Vec<SeriesColumn>,
    pub tie_break: SiblingTieBreak,
}

impl Default for SeriesConfig {
    fn default() -> Self {
        let column = |column: &str, default: &str| SeriesColumn {
            column: column.to_string(),
            default: default.to_string(),
        };
        Self {
            columns: vec![
                column("MultilingualId", "0"),
                column("LevelId", "1"),
                column("BgLevelId", "1"),
            ],
            tie_break: SiblingTieBreak::First,
        }
    }
}

/// One inherited value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesCopy {
    pub column: String,
    pub value: String,
    pub from_sibling: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SeriesTransfer {
    pub copied: Vec<SeriesCopy>,
    pub missing_columns: Vec<String>,
}

/// Copy `columns` from `from_row` to `to_row`, each independently.
pub fn copy_series_columns(
    sheet: &mut Sheet,
    from_row: usize,
    to_row: usize,
    columns: &[SeriesColumn],
) -> Result<SeriesTransfer, SyncError> {
    let mut transfer = SeriesTransfer::default();
    for spec in columns {
        let Some(col) = sheet.column_index(&spec.column) else {
            log::warn!(
                "sheet `{}` has no `{}` column; not inherited",
                sheet.name(),
                spec.column
            );
            transfer.missing_columns.push(spec.column.clone());
            continue;
        };
        let inherited = sheet.cell(from_row, col).trim().to_string();
        let (value, from_sibling) = if inherited.is_empty() {
            (spec.default.clone(), false)
        } else {
            (inherited, true)
        };
        sheet.set_cell(to_row, col, value.clone())?;
        transfer.copied.push(SeriesCopy {
            column: spec.column.clone(),
            value,
            from_sibling,
        });
    }
    Ok(transfer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn strips_numeric_suffixes() {
        assert_eq!(base_name("Forest2"), "Forest");
        assert_eq!(base_name("Forest"), "Forest");
        assert_eq!(base_name("Forest_02"), "Forest");
        assert_eq!(base_name("森林三"), "森林");
        assert_ne!(base_name("ForestCanyon"), "Forest");
    }

    #[test]
    fn strips_roman_version_and_qualifiers() {
        assert_eq!(base_name("Sunset II"), "Sunset");
        assert_eq!(base_name("SunsetIV"), "Sunset");
        assert_eq!(base_name("Sunset v2.1"), "Sunset");
        assert_eq!(base_name("Sunset-ver3"), "Sunset");
        assert_eq!(base_name("Sunset Pro"), "Sunset");
        assert_eq!(base_name("SunsetDeluxe"), "Sunset");
        assert_eq!(base_name("日落升级版"), "日落");
        assert_eq!(base_name("Sunset (new)"), "Sunset");
    }

    #[test]
    fn keeps_words_that_merely_end_like_suffixes() {
        assert_eq!(base_name("Complex"), "Complex");
        assert_eq!(base_name("Canvas"), "Canvas");
        assert_eq!(base_name("Pro"), "Pro");
        assert_eq!(base_name("MAX"), "MAX");
    }

    #[test]
    fn same_series_requires_non_empty_base() {
        assert!(same_series("Sunset3", "Sunset"));
        assert!(same_series("Sunset3", "Sunset2"));
        assert!(!same_series("2", "3"));
        assert!(!same_series("Sunset", "Sunrise"));
    }

    fn candidates() -> Vec<SiblingCandidate> {
        vec![
            SiblingCandidate {
                row_index: 1,
                name: "Sunset".into(),
                id: Some(4),
            },
            SiblingCandidate {
                row_index: 2,
                name: "Sunset2".into(),
                id: Some(9),
            },
            SiblingCandidate {
                row_index: 3,
                name: "Sunset Pro".into(),
                id: Some(6),
            },
        ]
    }

    #[test]
    fn tie_break_policies() {
        let c = candidates();
        assert_eq!(SiblingTieBreak::First.choose(&c).unwrap().row_index, 1);
        assert_eq!(SiblingTieBreak::Last.choose(&c).unwrap().row_index, 3);
        assert_eq!(SiblingTieBreak::HighestId.choose(&c).unwrap().row_index, 2);
        assert_eq!(SiblingTieBreak::First.choose(&[]), None);
    }

    #[test]
    fn copies_each_column_independently() {
        let mut sheet = Sheet::from_rows(
            "UGCTheme",
            vec![
                vec!["id".into(), "notes".into(), "MultilingualId".into(), "LevelId".into()],
                vec!["1".into(), "Sunset".into(), "1001".into(), "".into()],
                vec!["2".into(), "Sunset3".into(), "".into(), "".into()],
            ],
        );
        let transfer =
            copy_series_columns(&mut sheet, 1, 2, &SeriesConfig::default().columns).unwrap();
        assert_eq!(sheet.row(2).unwrap(), ["2", "Sunset3", "1001", "1"]);
        assert_eq!(transfer.missing_columns, vec!["BgLevelId".to_string()]);
        assert!(transfer.copied[0].from_sibling);
        assert!(!transfer.copied[1].from_sibling);
    }
}
