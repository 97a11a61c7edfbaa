use std::path::{Path, PathBuf};

use crate::StoreIoError;

/// Extensions considered when looking for a store, in preference order.
pub const STORE_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "xlsb", "ods", "json"];

const PROGRESS_EVERY: usize = 512;

/// Find the store file named `stem` (e.g. `RSC_Theme`) under `root`.
///
/// Stems match case-insensitively. Office lock files (`~$...`) are ignored.
/// When several files match, the preferred extension wins, then the
/// shallowest and lexically first path.
pub fn find_document(root: &Path, stem: &str) -> Result<PathBuf, StoreIoError> {
    let mut matches: Vec<(usize, usize, PathBuf)> = Vec::new();
    let mut scanned = 0usize;

    for entry in walkdir::WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        scanned += 1;
        if scanned % PROGRESS_EVERY == 0 {
            log::debug!("scanned {scanned} entries under `{}`", root.display());
        }
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let Some(file_stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if file_stem.starts_with("~$") || !file_stem.eq_ignore_ascii_case(stem) {
            continue;
        }
        let Some(rank) = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(|ext| {
                STORE_EXTENSIONS
                    .iter()
                    .position(|known| known.eq_ignore_ascii_case(ext))
            })
        else {
            continue;
        };
        matches.push((rank, entry.depth(), path.to_path_buf()));
    }

    log::debug!(
        "found {} candidate(s) for `{stem}` after scanning {scanned} entries",
        matches.len()
    );
    matches.sort();
    matches
        .into_iter()
        .next()
        .map(|(_, _, path)| path)
        .ok_or_else(|| StoreIoError::NotFound {
            name: stem.to_string(),
            root: root.to_path_buf(),
        })
}
