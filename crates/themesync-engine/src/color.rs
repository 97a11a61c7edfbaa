//! Hex color parsing and channel-column recognition.

use std::sync::OnceLock;

use regex::Regex;

/// Value written whenever a channel has no usable color.
pub const DEFAULT_HEX: &str = "FFFFFF";

static HEX_RE: OnceLock<Regex> = OnceLock::new();
static RGB_FN_RE: OnceLock<Regex> = OnceLock::new();
static CHANNEL_RE: OnceLock<Regex> = OnceLock::new();

fn hex_re() -> &'static Regex {
    HEX_RE.get_or_init(|| Regex::new(r"^[0-9A-Fa-f]{6}$").expect("valid regex"))
}

fn rgb_fn_re() -> &'static Regex {
    RGB_FN_RE.get_or_init(|| {
        Regex::new(r"(?i)^\s*rgba?\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*(?:,[^)]*)?\)\s*$")
            .expect("valid regex")
    })
}

fn channel_re() -> &'static Regex {
    CHANNEL_RE.get_or_init(|| Regex::new(r"(?i)^[PG][0-9]+$").expect("valid regex"))
}

/// Returns true for a bare 6-digit hex string (either case, no `#`).
pub fn is_valid_hex(value: &str) -> bool {
    hex_re().is_match(value)
}

/// Returns true when `column` names a color channel (`P1`, `G12`, ...).
pub fn is_channel_column(column: &str) -> bool {
    channel_re().is_match(column)
}

/// Build an uppercase hex string from 0-255 components.
pub fn rgb_to_hex(r: u32, g: u32, b: u32) -> Option<String> {
    if r > 255 || g > 255 || b > 255 {
        return None;
    }
    Some(format!("{r:02X}{g:02X}{b:02X}"))
}

/// Parse a textual component (`"255"`, `" 12 "`, `"12.0"`) into 0..=255.
pub fn parse_component(text: &str) -> Option<u32> {
    let text = text.trim();
    if let Ok(v) = text.parse::<u32>() {
        return (v <= 255).then_some(v);
    }
    let v = text.parse::<f64>().ok()?;
    if v.fract() != 0.0 || !(0.0..=255.0).contains(&v) {
        return None;
    }
    Some(v as u32)
}

/// Normalize free-form color text into uppercase 6-digit hex.
///
/// Accepts `rgb(r,g,b)` / `rgba(...)`, `#rrggbb` and hex with stray non-hex
/// characters. Returns `None` when the cleaned text is not exactly six hex
/// digits.
pub fn parse_color_text(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Some(caps) = rgb_fn_re().captures(raw) {
        let component = |i: usize| caps.get(i).and_then(|m| parse_component(m.as_str()));
        return rgb_to_hex(component(1)?, component(2)?, component(3)?);
    }

    let cleaned: String = raw
        .trim_start_matches('#')
        .chars()
        .filter(char::is_ascii_hexdigit)
        .collect::<String>()
        .to_ascii_uppercase();
    is_valid_hex(&cleaned).then_some(cleaned)
}
