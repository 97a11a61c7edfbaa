//! Field groups and their validators.
//!
//! Validators are pure and idempotent: feeding a validated value back through
//! the same validator returns it unchanged with `was_corrected == false`.

use core::fmt;

use regex::Regex;
use serde::{Deserialize, Deserializer};

use crate::color::{is_channel_column, parse_color_text, DEFAULT_HEX};
use crate::config::StoreKind;

/// A validated value and whether validation had to change it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Corrected {
    pub value: String,
    pub was_corrected: bool,
}

impl Corrected {
    fn new(value: String, was_corrected: bool) -> Self {
        Self {
            value,
            was_corrected,
        }
    }
}

/// A compiled regular expression loaded from configuration.
#[derive(Clone)]
pub struct PatternRule(Regex);

impl PatternRule {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(Self)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.0.is_match(value)
    }
}

impl fmt::Debug for PatternRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PatternRule").field(&self.as_str()).finish()
    }
}

impl PartialEq for PatternRule {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl<'de> Deserialize<'de> for PatternRule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pattern = String::deserialize(deserializer)?;
        PatternRule::new(&pattern).map_err(serde::de::Error::custom)
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Validator {
    /// Float clamp.
    Range { min: f64, max: f64 },
    /// Rounded integer clamp.
    Integer { min: i64, max: i64 },
    /// Six-digit uppercase hex.
    Hex,
    /// Whole value must match the pattern.
    Pattern { regex: PatternRule },
}

impl Validator {
    /// Validate `raw`, or `None` when it cannot be interpreted at all.
    pub fn check(&self, raw: &str) -> Option<Corrected> {
        match self {
            Validator::Range { min, max } => clamp(raw, *min, *max),
            Validator::Integer { min, max } => clamp_integer(raw, *min, *max),
            Validator::Hex => {
                let raw = raw.trim();
                let hex = parse_color_text(raw)?;
                let corrected = hex != raw;
                Some(Corrected::new(hex, corrected))
            }
            Validator::Pattern { regex } => {
                let raw = raw.trim();
                regex
                    .is_match(raw)
                    .then(|| Corrected::new(raw.to_string(), false))
            }
        }
    }

    /// Validate `raw`, substituting the (validated) default when it is unusable.
    pub fn apply(&self, raw: &str, default: &str) -> Corrected {
        match self.check(raw) {
            Some(corrected) => corrected,
            None => {
                let value = self
                    .check(default)
                    .map(|c| c.value)
                    .unwrap_or_else(|| default.to_string());
                Corrected::new(value, true)
            }
        }
    }
}

/// Clamp a numeric value into `min..=max`.
///
/// Returns `None` for text that is not a finite number.
pub fn clamp(raw: &str, min: f64, max: f64) -> Option<Corrected> {
    let parsed = parse_finite(raw)?;
    let clamped = clamp_f64(parsed, min, max);
    Some(Corrected::new(format_number(clamped), clamped != parsed))
}

/// Round to the nearest integer and clamp into `min..=max`.
pub fn clamp_integer(raw: &str, min: i64, max: i64) -> Option<Corrected> {
    let parsed = parse_finite(raw)?;
    let rounded = parsed.round();
    let clamped = clamp_f64(rounded, min as f64, max as f64) as i64;
    Some(Corrected::new(
        clamped.to_string(),
        clamped as f64 != parsed,
    ))
}

/// Normalize a color to uppercase hex, falling back to `default`.
pub fn normalize_hex(raw: &str, default: &str) -> Corrected {
    Validator::Hex.apply(raw, default)
}

fn parse_finite(raw: &str) -> Option<f64> {
    let value = raw.trim().parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}

fn clamp_f64(value: f64, min: f64, max: f64) -> f64 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Integral values print without a fractional part (and never as `-0`).
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// One validated column of a field group.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct FieldSpec {
    pub column: String,
    pub validator: Validator,
    pub default: String,
}

impl FieldSpec {
    pub fn new(column: &str, validator: Validator, default: &str) -> Self {
        Self {
            column: column.to_string(),
            validator,
            default: default.to_string(),
        }
    }

    pub fn hex(column: &str) -> Self {
        Self::new(column, Validator::Hex, DEFAULT_HEX)
    }
}

/// A named configuration category written onto one target sheet.
///
/// `name` doubles as the `Status` column and the source sheet name in direct
/// mode.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct FieldGroup {
    pub name: String,
    pub store: StoreKind,
    /// Target sheet; `None` means the store's primary sheet.
    #[serde(default)]
    pub sheet: Option<String>,
    /// Also treat every channel column (`P*`/`G*`) of the target header as a
    /// hex field of this group.
    #[serde(default)]
    pub channel_columns: bool,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

impl FieldGroup {
    /// Fields of this group as laid out in `header`.
    pub fn specs(&self, header: &[String]) -> Vec<FieldSpec> {
        let mut specs = self.fields.clone();
        if self.channel_columns {
            for column in header.iter().filter(|c| is_channel_column(c)) {
                if !specs.iter().any(|spec| &spec.column == column) {
                    specs.push(FieldSpec::hex(column));
                }
            }
        }
        specs
    }
}

fn range(column: &str, min: f64, max: f64, default: &str) -> FieldSpec {
    FieldSpec::new(column, Validator::Range { min, max }, default)
}

fn byte(column: &str, default: &str) -> FieldSpec {
    FieldSpec::new(column, Validator::Integer { min: 0, max: 255 }, default)
}

fn group(name: &str, store: StoreKind, sheet: Option<&str>, fields: Vec<FieldSpec>) -> FieldGroup {
    FieldGroup {
        name: name.to_string(),
        store,
        sheet: sheet.map(str::to_string),
        channel_columns: false,
        fields,
    }
}

/// The stock catalog for `RSC_Theme`/`UGCTheme` stores.
pub fn default_field_groups() -> Vec<FieldGroup> {
    let mut groups = vec![FieldGroup {
        channel_columns: true,
        ..group("Color", StoreKind::Primary, None, Vec::new())
    }];

    groups.push(group(
        "ColorInfo",
        StoreKind::Primary,
        Some("ColorInfo"),
        vec![
            byte("BgColorR", "255"),
            byte("BgColorG", "255"),
            byte("BgColorB", "255"),
            byte("FloorColorR", "255"),
            byte("FloorColorG", "255"),
            byte("FloorColorB", "255"),
        ],
    ));
    groups.push(group(
        "Light",
        StoreKind::Primary,
        Some("Light"),
        vec![
            range("LightOffsetX", -10.0, 10.0, "0"),
            range("LightOffsetY", -10.0, 10.0, "0"),
            range("LightOffsetZ", -10.0, 10.0, "0"),
            range("LightIntensity", 0.0, 8.0, "1"),
            FieldSpec::hex("LightColor"),
        ],
    ));
    groups.push(group(
        "FloodLight",
        StoreKind::Primary,
        Some("FloodLight"),
        vec![
            FieldSpec::hex("FloodLightColor"),
            range("FloodLightIntensity", 0.0, 8.0, "0"),
            range("FloodLightRange", 0.0, 100.0, "10"),
        ],
    ));
    groups.push(group(
        "Fog",
        StoreKind::Primary,
        Some("Fog"),
        vec![
            range("FogStart", 0.0, 1000.0, "0"),
            range("FogEnd", 0.0, 1000.0, "100"),
            range("FogDensity", 0.0, 1.0, "0"),
            FieldSpec::hex("FogColor"),
        ],
    ));

    for name in [
        "Custom_Ground_Color",
        "Custom_Fragile_Color",
        "Custom_Fragile_Active_Color",
        "Custom_Jump_Color",
        "Custom_Jump_Active_Color",
    ] {
        groups.push(group(
            name,
            StoreKind::Companion,
            Some(name),
            vec![FieldSpec::hex("Color"), range("Emission", 0.0, 4.0, "0")],
        ));
    }

    groups
}
