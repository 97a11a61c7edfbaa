use pretty_assertions::assert_eq;
use themesync_engine::mapping::{ChannelMapping, DO_NOT_IMPORT};
use themesync_engine::series::SiblingTieBreak;
use themesync_engine::{
    MappingMode, OrderingOutcome, StoreKind, SyncConfig, SyncError, SyncRequest, SyncSession,
    SyncWarning,
};
use themesync_model::Document;

mod common;

use common::{companion_store, document, legacy_source, primary_store, sheet, strings};

fn session_with(config: SyncConfig, source: Document) -> SyncSession {
    SyncSession::new(config, source, primary_store(), companion_store()).expect("session")
}

fn session(source: Document) -> SyncSession {
    session_with(SyncConfig::default(), source)
}

fn row(session: &SyncSession, store: StoreKind, sheet: &str, index: usize) -> Vec<String> {
    session
        .sheet(store, sheet)
        .and_then(|s| s.row(index))
        .map(|r| r.to_vec())
        .unwrap_or_default()
}

#[test]
fn creates_theme_from_legacy_color_table() {
    let mut session = session(legacy_source());
    let report = session.run(&SyncRequest::new("Canyon")).unwrap();

    assert_eq!(report.mode, MappingMode::Indirect);
    assert!(report.is_new);
    assert_eq!(report.row_index, 4);
    assert_eq!(report.record_id, Some(4));
    assert_eq!(
        row(&session, StoreKind::Primary, "Theme", 4),
        strings(&["4", "Canyon", "FF0000", "0000FF", "00FF00", "FFFFFF", ""])
    );

    let p1 = report.channels.iter().find(|c| c.channel == "P1").unwrap();
    assert_eq!(p1.value, "FF0000");
    assert!(!p1.is_default);

    // Auxiliary rows are copies of the last row stamped with the new identity.
    assert_eq!(
        row(&session, StoreKind::Primary, "Light", 4),
        strings(&["4", "Canyon", "5", "6", "998877"])
    );
    assert_eq!(
        row(&session, StoreKind::Companion, "UGCTheme", 4),
        strings(&["4", "Canyon", "2003", "6", "7"])
    );
    assert!(report.warnings.contains(&SyncWarning::RowAlignmentShortfall {
        sheet: "Custom_Fragile_Color".to_string(),
        padded_rows: 2,
    }));
    assert_eq!(
        row(&session, StoreKind::Companion, "Custom_Fragile_Color", 4),
        strings(&["4", "Canyon", "404040", "0"])
    );

    assert_eq!(
        report.ordering,
        OrderingOutcome::Appended {
            row_index: 4,
            order: 3
        }
    );
    assert_eq!(
        row(&session, StoreKind::Companion, "ThemeSort", 4),
        strings(&["3", "Canyon"])
    );
}

#[test]
fn do_not_import_entries_are_skipped_but_defaulted() {
    let config = SyncConfig {
        channel_mapping: vec![
            ChannelMapping::new("P1", "", "P1"),
            ChannelMapping::new(DO_NOT_IMPORT, "", "P7"),
        ],
        ..SyncConfig::default()
    };
    let mut session = session_with(config, legacy_source());
    let report = session.run(&SyncRequest::new("Canyon")).unwrap();

    let sentinel = report
        .channels
        .iter()
        .find(|c| c.source_code == "P7")
        .unwrap();
    assert!(sentinel.is_default);
    assert!(sentinel.skipped);

    let theme = session.sheet(StoreKind::Primary, "Theme").unwrap();
    let p7 = theme.column_index("P7").unwrap();
    assert_eq!(theme.cell(4, p7), "FFFFFF");
    assert!(report
        .channels
        .iter()
        .any(|c| c.channel == "P7" && c.implicit));
}

#[test]
fn new_series_member_reuses_first_sibling() {
    let mut session = session(legacy_source());
    let report = session.run(&SyncRequest::new("Sunset3")).unwrap();

    let sibling = report.sibling.clone().unwrap();
    assert_eq!(sibling.name, "Sunset");
    assert_eq!(
        row(&session, StoreKind::Companion, "UGCTheme", 4),
        strings(&["4", "Sunset3", "2002", "5", "1"])
    );
    assert_eq!(
        report.series.iter().map(|c| c.from_sibling).collect::<Vec<_>>(),
        vec![true, true, false]
    );

    assert_eq!(
        report.ordering,
        OrderingOutcome::Inserted {
            row_index: 3,
            order: 3,
            predecessor: 1
        }
    );
    let sort = session.sheet(StoreKind::Companion, "ThemeSort").unwrap();
    let pairs: Vec<_> = sort.data_rows().map(|(_, r)| r.to_vec()).collect();
    assert_eq!(
        pairs,
        vec![
            strings(&["0", "Forest"]),
            strings(&["1", "Sunset"]),
            strings(&["3", "Sunset3"]),
            strings(&["2", "Sunset2"]),
        ]
    );
}

#[test]
fn sibling_policy_is_injectable() {
    let mut session = session(legacy_source()).with_sibling_policy(SiblingTieBreak::HighestId);
    let report = session.run(&SyncRequest::new("Sunset3")).unwrap();

    assert_eq!(report.sibling.unwrap().name, "Sunset2");
    assert_eq!(
        row(&session, StoreKind::Companion, "UGCTheme", 4),
        strings(&["4", "Sunset3", "2003", "6", "7"])
    );
    assert_eq!(
        report.ordering,
        OrderingOutcome::Inserted {
            row_index: 4,
            order: 3,
            predecessor: 2
        }
    );
}

#[test]
fn missing_predecessor_falls_back_to_append() {
    let mut companion = companion_store();
    let sort = sheet("ThemeSort", &[&["SortId", "SortNotes"], &["9", "Other"]]);
    companion.replace_sheet(sort).unwrap();

    let mut session =
        SyncSession::new(SyncConfig::default(), legacy_source(), primary_store(), companion)
            .unwrap();
    let report = session.run(&SyncRequest::new("Sunset3")).unwrap();

    assert_eq!(
        report.ordering,
        OrderingOutcome::Appended {
            row_index: 2,
            order: 3
        }
    );
    assert!(report
        .warnings
        .contains(&SyncWarning::SortedInsertionTargetMissing {
            sheet: "ThemeSort".to_string(),
            predecessor: 1,
        }));
}

fn direct_source() -> Document {
    document(
        "direct.xlsx",
        vec![
            sheet("Status", &[&["Light", "Color"], &["1", "0"]]),
            sheet(
                "Light",
                &[
                    &["LightOffsetX", "LightIntensity", "LightColor"],
                    &["2", "20", "#010203"],
                ],
            ),
            sheet("Color", &[&["P1"], &["000000"]]),
        ],
    )
}

#[test]
fn direct_update_overwrites_flagged_group_in_place() {
    let mut session = session(direct_source());
    let before: Vec<usize> = ["Theme", "Light", "Fog"]
        .iter()
        .map(|name| session.sheet(StoreKind::Primary, name).unwrap().len())
        .collect();

    let report = session.run(&SyncRequest::new("Sunset2")).unwrap();

    assert_eq!(report.mode, MappingMode::Direct);
    assert!(!report.is_new);
    assert_eq!(report.row_index, 3);
    assert_eq!(
        row(&session, StoreKind::Primary, "Light", 3),
        strings(&["3", "Sunset2", "2", "8", "010203"])
    );
    // Color is flagged 0: the source value is ignored.
    assert_eq!(
        row(&session, StoreKind::Primary, "Theme", 3),
        strings(&["3", "Sunset2", "ABCDEF", "ABCDEF", "ABCDEF", "ABCDEF", "keep"])
    );
    let after: Vec<usize> = ["Theme", "Light", "Fog"]
        .iter()
        .map(|name| session.sheet(StoreKind::Primary, name).unwrap().len())
        .collect();
    assert_eq!(before, after);
    assert_eq!(report.ordering, OrderingOutcome::Skipped);

    let intensity = report
        .fields
        .iter()
        .find(|f| f.field == "LightIntensity")
        .unwrap();
    assert!(intensity.was_corrected);
}

#[test]
fn unreadable_status_falls_back_to_indirect() {
    let source = document(
        "broken.xlsx",
        vec![sheet("Status", &[&["Light"], &["maybe"]])],
    );
    let mut session = session(source);
    let report = session.run(&SyncRequest::new("Forest")).unwrap();
    assert_eq!(report.mode, MappingMode::Indirect);
    assert!(report
        .warnings
        .iter()
        .any(|w| matches!(w, SyncWarning::StatusUnreadable { .. })));
}

#[test]
fn update_only_requires_existing_theme() {
    let mut session = session(legacy_source());
    let err = session
        .run(&SyncRequest::new("Nowhere").update_only())
        .unwrap_err();
    assert!(matches!(err, SyncError::ThemeNotFound(name) if name == "Nowhere"));
    assert_eq!(session.primary_sheet(StoreKind::Primary).unwrap().len(), 4);

    let report = session
        .run(&SyncRequest::new("Forest").update_only())
        .unwrap();
    assert!(!report.is_new);
    assert_eq!(report.row_index, 1);
}

#[test]
fn blank_theme_name_is_rejected() {
    let mut session = session(legacy_source());
    assert!(matches!(
        session.run(&SyncRequest::new("   ")),
        Err(SyncError::EmptyThemeName)
    ));
}

#[test]
fn locate_is_idempotent() {
    let mut session = session(legacy_source());
    let first = session.locate("Canyon").unwrap();
    let second = session.locate("Canyon").unwrap();
    assert_eq!(first.index, second.index);
    assert!(first.is_new);
    assert!(!second.is_new);
    assert_eq!(session.primary_sheet(StoreKind::Primary).unwrap().len(), 5);
}

#[test]
fn rerunning_a_theme_updates_instead_of_duplicating() {
    let mut session = session(legacy_source());
    let first = session.run(&SyncRequest::new("Canyon")).unwrap();
    let second = session.run(&SyncRequest::new("Canyon")).unwrap();
    assert!(first.is_new);
    assert!(!second.is_new);
    assert_eq!(first.row_index, second.row_index);
    assert_eq!(session.primary_sheet(StoreKind::Primary).unwrap().len(), 5);
    assert_eq!(session.primary_sheet(StoreKind::Companion).unwrap().len(), 5);
}

#[test]
fn assembled_documents_leave_unlisted_sheets_alone() {
    let mut session = session(legacy_source());
    session.run(&SyncRequest::new("Canyon")).unwrap();
    let stores = session.into_documents().unwrap();

    assert_eq!(
        stores.primary.sheet_names().collect::<Vec<_>>(),
        vec!["Theme", "ColorInfo", "Light", "FloodLight", "Fog", "Unrelated"]
    );
    assert_eq!(
        stores.primary.sheet("Unrelated"),
        primary_store().sheet("Unrelated")
    );
    assert_eq!(stores.primary.sheet("Theme").unwrap().len(), 5);
    assert_eq!(stores.companion.sheet("UGCTheme").unwrap().len(), 5);
}

#[test]
fn misaligned_stores_are_reported() {
    let mut companion = companion_store();
    let mut ugc = companion.sheet("UGCTheme").unwrap().clone();
    ugc.push_row(strings(&["9", "Extra"]));
    companion.replace_sheet(ugc).unwrap();

    let mut session =
        SyncSession::new(SyncConfig::default(), legacy_source(), primary_store(), companion)
            .unwrap();
    let report = session.run(&SyncRequest::new("Forest")).unwrap();
    assert!(report.warnings.contains(&SyncWarning::StoreMisaligned {
        primary_rows: 4,
        companion_rows: 5,
    }));
}

#[test]
fn direct_create_keeps_structural_defaults_of_unflagged_groups() {
    let source = document(
        "direct.xlsx",
        vec![sheet("Status", &[&["Light"], &["0"]])],
    );
    let mut direct = session(source);
    let report = direct.run(&SyncRequest::new("Canyon")).unwrap();
    assert_eq!(report.mode, MappingMode::Direct);
    assert!(report.is_new);

    let mut indirect = session(legacy_source());
    indirect.run(&SyncRequest::new("Canyon")).unwrap();

    for name in ["Light", "ColorInfo", "Fog"] {
        assert_eq!(
            row(&direct, StoreKind::Primary, name, 4),
            row(&indirect, StoreKind::Primary, name, 4),
            "sheet {name}"
        );
    }
    assert_eq!(
        row(&direct, StoreKind::Primary, "Light", 4),
        strings(&["4", "Canyon", "5", "6", "998877"])
    );

    let intensity = report
        .fields
        .iter()
        .find(|f| f.field == "LightIntensity")
        .unwrap();
    assert_eq!(intensity.value, "6");
    assert!(!intensity.was_corrected);
}

#[test]
fn new_theme_never_takes_over_an_occupied_companion_row() {
    let mut companion = companion_store();
    let mut ugc = companion.sheet("UGCTheme").unwrap().clone();
    ugc.push_row(strings(&["9", "Extra", "9009", "9", "9"]));
    companion.replace_sheet(ugc).unwrap();

    let mut session =
        SyncSession::new(SyncConfig::default(), legacy_source(), primary_store(), companion)
            .unwrap();
    let err = session.run(&SyncRequest::new("Canyon")).unwrap_err();

    assert!(
        matches!(
            &err,
            SyncError::RowOccupied { store: StoreKind::Companion, sheet, row: 4, occupant }
                if sheet == "UGCTheme" && occupant == "Extra"
        ),
        "{err:?}"
    );
    assert_eq!(session.primary_sheet(StoreKind::Primary).unwrap().len(), 4);
    assert_eq!(
        row(&session, StoreKind::Companion, "UGCTheme", 4),
        strings(&["9", "Extra", "9009", "9", "9"])
    );
}
