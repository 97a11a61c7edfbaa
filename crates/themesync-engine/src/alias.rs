//! Declarative alias table for source color sheets.
//!
//! Hand-authored color sheets spell the same logical field many ways. All the
//! known spellings live in [`SOURCE_COLOR_ALIASES`], tried in priority order.

/// A logical single-column field of a source color row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LogicalField {
    /// The color code (`P1`, `G3`, `P1-1`, ...).
    Code,
    /// A hex (or `rgb(r,g,b)`) color value.
    Hex,
}

/// Accepted header spellings, highest priority first.
#[derive(Clone, Copy, Debug)]
pub struct AliasTable {
    pub code: &'static [&'static str],
    pub hex: &'static [&'static str],
    /// Red/green/blue column triples. A triple only matches when all three
    /// columns are present.
    pub rgb: &'static [[&'static str; 3]],
}

pub const SOURCE_COLOR_ALIASES: AliasTable = AliasTable {
    code: &["颜色代码", "colorCode", "code", "代码", "Color Code", "ColorCode"],
    hex: &[
        "16进制值", "颜色值", "hex", "HEX", "hexValue", "16进制", "color", "Color", "Hex Value",
    ],
    rgb: &[
        ["R值", "G值", "B值"],
        ["R", "G", "B"],
        ["r", "g", "b"],
        ["red", "green", "blue"],
        ["Red", "Green", "Blue"],
    ],
};

impl AliasTable {
    pub fn aliases(&self, field: LogicalField) -> &'static [&'static str] {
        match field {
            LogicalField::Code => self.code,
            LogicalField::Hex => self.hex,
        }
    }

    /// Column index of the first alias of `field` present in `header`.
    pub fn resolve_alias(&self, header: &[String], field: LogicalField) -> Option<usize> {
        self.aliases(field)
            .iter()
            .find_map(|alias| column(header, alias))
    }

    /// Value of the first alias of `field` that holds a non-blank value in `row`.
    ///
    /// Unlike [`AliasTable::resolve_alias`] this skips aliases whose column
    /// exists but is empty for this particular row.
    pub fn value<'a>(
        &self,
        header: &[String],
        row: &'a [String],
        field: LogicalField,
    ) -> Option<&'a str> {
        self.aliases(field).iter().find_map(|alias| {
            let idx = column(header, alias)?;
            let value = row.get(idx)?.trim();
            (!value.is_empty()).then_some(value)
        })
    }

    /// Column indices of the first complete red/green/blue triple in `header`.
    pub fn resolve_rgb(&self, header: &[String]) -> Option<[usize; 3]> {
        self.rgb.iter().find_map(|[r, g, b]| {
            Some([column(header, r)?, column(header, g)?, column(header, b)?])
        })
    }
}

fn column(header: &[String], name: &str) -> Option<usize> {
    header.iter().position(|h| h == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn resolves_in_priority_order() {
        let h = header(&["code", "颜色代码", "hex"]);
        assert_eq!(
            SOURCE_COLOR_ALIASES.resolve_alias(&h, LogicalField::Code),
            Some(1)
        );
        assert_eq!(
            SOURCE_COLOR_ALIASES.resolve_alias(&h, LogicalField::Hex),
            Some(2)
        );
    }

    #[test]
    fn spaced_hex_header_is_recognised() {
        let h = header(&["Color Code", "Hex Value"]);
        assert_eq!(
            SOURCE_COLOR_ALIASES.resolve_alias(&h, LogicalField::Code),
            Some(0)
        );
        assert_eq!(
            SOURCE_COLOR_ALIASES.resolve_alias(&h, LogicalField::Hex),
            Some(1)
        );
    }

    #[test]
    fn value_skips_blank_aliases() {
        let h = header(&["颜色代码", "code"]);
        let row = header(&["  ", "P1"]);
        assert_eq!(
            SOURCE_COLOR_ALIASES.value(&h, &row, LogicalField::Code),
            Some("P1")
        );
    }

    #[test]
    fn rgb_requires_a_complete_triple() {
        let h = header(&["R值", "G值", "R", "G", "B"]);
        assert_eq!(SOURCE_COLOR_ALIASES.resolve_rgb(&h), Some([2, 3, 4]));
        assert_eq!(SOURCE_COLOR_ALIASES.resolve_rgb(&header(&["R", "G"])), None);
    }
}
