#![allow(dead_code)]

use themesync_model::{Document, Sheet};

pub fn strings(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|s| s.to_string()).collect()
}

pub fn sheet(name: &str, rows: &[&[&str]]) -> Sheet {
    Sheet::from_rows(name, rows.iter().map(|row| strings(row)).collect())
}

pub fn document(name: &str, sheets: Vec<Sheet>) -> Document {
    Document::with_sheets(name, sheets).expect("valid fixture document")
}

/// Legacy source color table with a couple of codes.
pub fn legacy_source() -> Document {
    document(
        "colors.xlsx",
        vec![sheet(
            "完整配色表",
            &[
                &["颜色代码", "16进制值", "作用"],
                &["P1", "#ff0000", "地板"],
                &["P2", "rgb(0, 0, 255)", "跳板"],
                &["G1", "#00ff00", "装饰"],
            ],
        )],
    )
}

/// Primary store: a theme sheet plus the four auxiliary sheets.
pub fn primary_store() -> Document {
    document(
        "RSC_Theme.xlsx",
        vec![
            sheet(
                "Theme",
                &[
                    &["id", "notes", "P1", "P5", "G1", "P7", "Other"],
                    &["1", "Forest", "111111", "222222", "333333", "444444", "keep"],
                    &["2", "Sunset", "AAAAAA", "BBBBBB", "CCCCCC", "DDDDDD", "keep"],
                    &["3", "Sunset2", "ABCDEF", "ABCDEF", "ABCDEF", "ABCDEF", "keep"],
                ],
            ),
            sheet(
                "ColorInfo",
                &[
                    &["id", "notes", "BgColorR", "BgColorG", "BgColorB"],
                    &["1", "Forest", "10", "20", "30"],
                    &["2", "Sunset", "40", "50", "60"],
                    &["3", "Sunset2", "70", "80", "90"],
                ],
            ),
            sheet(
                "Light",
                &[
                    &["id", "notes", "LightOffsetX", "LightIntensity", "LightColor"],
                    &["1", "Forest", "1", "2", "FFEEDD"],
                    &["2", "Sunset", "3", "4", "CCBBAA"],
                    &["3", "Sunset2", "5", "6", "998877"],
                ],
            ),
            sheet(
                "FloodLight",
                &[
                    &["id", "notes", "FloodLightIntensity"],
                    &["1", "Forest", "1"],
                    &["2", "Sunset", "1"],
                    &["3", "Sunset2", "1"],
                ],
            ),
            sheet(
                "Fog",
                &[
                    &["id", "notes", "FogStart", "FogEnd"],
                    &["1", "Forest", "0", "100"],
                    &["2", "Sunset", "0", "100"],
                    &["3", "Sunset2", "0", "100"],
                ],
            ),
            sheet("Unrelated", &[&["x"], &["do not touch"]]),
        ],
    )
}

/// Companion store, row-aligned with [`primary_store`].
pub fn companion_store() -> Document {
    document(
        "UGCTheme.xlsx",
        vec![
            sheet(
                "UGCTheme",
                &[
                    &["id", "notes", "MultilingualId", "LevelId", "BgLevelId"],
                    &["1", "Forest", "1001", "3", "4"],
                    &["2", "Sunset", "2002", "5", ""],
                    &["3", "Sunset2", "2003", "6", "7"],
                ],
            ),
            sheet(
                "Custom_Ground_Color",
                &[
                    &["id", "notes", "Color", "Emission"],
                    &["1", "Forest", "101010", "1"],
                    &["2", "Sunset", "202020", "2"],
                    &["3", "Sunset2", "303030", "3"],
                ],
            ),
            sheet(
                "Custom_Fragile_Color",
                &[&["id", "notes", "Color", "Emission"], &["1", "Forest", "404040", "0"]],
            ),
            sheet(
                "Custom_Fragile_Active_Color",
                &[
                    &["id", "notes", "Color", "Emission"],
                    &["1", "Forest", "505050", "0"],
                    &["2", "Sunset", "505050", "0"],
                    &["3", "Sunset2", "505050", "0"],
                ],
            ),
            sheet(
                "Custom_Jump_Color",
                &[
                    &["id", "notes", "Color", "Emission"],
                    &["1", "Forest", "606060", "0"],
                    &["2", "Sunset", "606060", "0"],
                    &["3", "Sunset2", "606060", "0"],
                ],
            ),
            sheet(
                "Custom_Jump_Active_Color",
                &[
                    &["id", "notes", "Color", "Emission"],
                    &["1", "Forest", "707070", "0"],
                    &["2", "Sunset", "707070", "0"],
                    &["3", "Sunset2", "707070", "0"],
                ],
            ),
            sheet(
                "ThemeSort",
                &[
                    &["SortId", "SortNotes"],
                    &["0", "Forest"],
                    &["1", "Sunset"],
                    &["2", "Sunset2"],
                ],
            ),
        ],
    )
}
