use std::path::Path;

use clap::Parser;
use pretty_assertions::assert_eq;
use themesync_cli::cli::{run_with_args, Args};
use themesync_io::FileStore;
use themesync_model::{Document, DocumentStore, Sheet};

fn sheet(name: &str, rows: &[&[&str]]) -> Sheet {
    Sheet::from_rows(
        name,
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect(),
    )
}

fn write(path: &Path, sheets: Vec<Sheet>) {
    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    let document = Document::with_sheets(name, sheets).unwrap();
    FileStore::new().write_document(path, &document).unwrap();
}

/// Lays out a project directory with JSON stores and a legacy color table.
fn project(dir: &Path) {
    write(
        &dir.join("colors.json"),
        vec![sheet(
            "完整配色表",
            &[&["颜色代码", "16进制值"], &["P1", "#ff0000"]],
        )],
    );
    write(
        &dir.join("stores/RSC_Theme.json"),
        vec![sheet(
            "Theme",
            &[&["id", "notes", "P1"], &["1", "Forest", "111111"]],
        )],
    );
    write(
        &dir.join("stores/UGCTheme.json"),
        vec![sheet(
            "UGCTheme",
            &[&["id", "notes", "LevelId"], &["1", "Forest", "3"]],
        )],
    );
}

fn args(dir: &Path, extra: &[&str]) -> Args {
    let source = dir.join("colors.json");
    let mut argv = vec![
        "themesync".to_string(),
        source.display().to_string(),
        "--project-dir".to_string(),
        dir.display().to_string(),
    ];
    argv.extend(extra.iter().map(|s| s.to_string()));
    Args::try_parse_from(argv).unwrap()
}

fn theme_rows(dir: &Path) -> Vec<Vec<String>> {
    FileStore::new()
        .read_document(&dir.join("stores/RSC_Theme.json"))
        .unwrap()
        .sheet("Theme")
        .unwrap()
        .clone()
        .into_rows()
}

#[test]
fn creates_theme_and_saves_both_stores() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("stores")).unwrap();
    project(dir.path());

    run_with_args(args(dir.path(), &["--theme", "Meadow", "--format", "json"])).unwrap();

    let rows = theme_rows(dir.path());
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[2], vec!["2", "Meadow", "FF0000"]);

    let companion = FileStore::new()
        .read_document(&dir.path().join("stores/UGCTheme.json"))
        .unwrap();
    let companion_rows = companion.sheet("UGCTheme").unwrap().rows();
    assert_eq!(companion_rows.len(), 3);
    assert_eq!(companion_rows[2][..2].to_vec(), vec!["2", "Meadow"]);
}

#[test]
fn dry_run_leaves_stores_untouched() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("stores")).unwrap();
    project(dir.path());

    run_with_args(args(dir.path(), &["--theme", "Meadow", "--dry-run"])).unwrap();

    assert_eq!(theme_rows(dir.path()).len(), 2);
}

#[test]
fn update_only_rejects_unknown_theme() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("stores")).unwrap();
    project(dir.path());

    let err = run_with_args(args(dir.path(), &["--theme", "Meadow", "--update-only"]))
        .unwrap_err();
    assert!(format!("{err:#}").contains("Meadow"), "{err:#}");
    assert_eq!(theme_rows(dir.path()).len(), 2);
}

#[test]
fn missing_store_without_project_dir_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("colors.json");
    let args = Args::try_parse_from([
        "themesync".to_string(),
        source.display().to_string(),
        "--theme".to_string(),
        "Meadow".to_string(),
    ])
    .unwrap();

    let err = run_with_args(args).unwrap_err();
    assert!(err.to_string().contains("RSC_Theme"), "{err}");
}
