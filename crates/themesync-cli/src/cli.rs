use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use themesync_engine::series::SiblingTieBreak;
use themesync_engine::{PendingCommit, SyncConfig, SyncReport, SyncRequest, SyncSession};
use themesync_io::{find_document, save_path, FileStore};
use themesync_model::DocumentStore;
use tracing_subscriber::EnvFilter;

use crate::render_text;

/// File stem of the primary attributes store.
pub const PRIMARY_STORE_STEM: &str = "RSC_Theme";
/// File stem of the companion customization store.
pub const COMPANION_STORE_STEM: &str = "UGCTheme";

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TieBreak {
    First,
    Last,
    HighestId,
}

impl From<TieBreak> for SiblingTieBreak {
    fn from(value: TieBreak) -> Self {
        match value {
            TieBreak::First => SiblingTieBreak::First,
            TieBreak::Last => SiblingTieBreak::Last,
            TieBreak::HighestId => SiblingTieBreak::HighestId,
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Propagate one theme from a source color document into the theme stores.")]
pub struct Args {
    /// Source color document (spreadsheet or JSON document shape).
    source: PathBuf,

    /// Theme name (value of the key column).
    #[arg(long)]
    theme: String,

    /// Primary store (`RSC_Theme`). Looked up under `--project-dir` when omitted.
    #[arg(long, value_name = "PATH")]
    primary: Option<PathBuf>,

    /// Companion store (`UGCTheme`). Looked up under `--project-dir` when omitted.
    #[arg(long, value_name = "PATH")]
    companion: Option<PathBuf>,

    /// Directory searched for stores not given explicitly.
    #[arg(long, value_name = "DIR")]
    project_dir: Option<PathBuf>,

    /// JSON configuration; absent keys keep their defaults.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Fail instead of creating the theme when it does not exist yet.
    #[arg(long)]
    update_only: bool,

    /// Overrides the configured sibling tie-break rule.
    #[arg(long, value_enum)]
    sibling_policy: Option<TieBreak>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Run the synchronization but leave both stores untouched.
    #[arg(long)]
    dry_run: bool,

    /// Extra attempts when persisting a store fails.
    #[arg(long, default_value_t = 0)]
    commit_retries: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonOutput<'a> {
    primary: String,
    companion: String,
    committed: bool,
    report: &'a SyncReport,
}

pub fn run() -> Result<()> {
    init_tracing();
    run_with_args(Args::parse())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // Logs go to stderr so `--format json` output stays parseable.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn run_with_args(args: Args) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(tie_break) = args.sibling_policy {
        config.series.tie_break = tie_break.into();
    }

    let primary_path = resolve_store(
        args.primary.as_deref(),
        args.project_dir.as_deref(),
        PRIMARY_STORE_STEM,
    )?;
    let companion_path = resolve_store(
        args.companion.as_deref(),
        args.project_dir.as_deref(),
        COMPANION_STORE_STEM,
    )?;

    let store = FileStore::new();
    let source = store
        .read_document(&args.source)
        .with_context(|| format!("read source document {}", args.source.display()))?;
    let primary = store
        .read_document(&primary_path)
        .with_context(|| format!("read primary store {}", primary_path.display()))?;
    let companion = store
        .read_document(&companion_path)
        .with_context(|| format!("read companion store {}", companion_path.display()))?;

    let mut session = SyncSession::new(config, source, primary, companion)?;
    let mut request = SyncRequest::new(args.theme.as_str());
    if args.update_only {
        request = request.update_only();
    }
    let report = session
        .run(&request)
        .with_context(|| format!("synchronize theme `{}`", args.theme))?;

    let committed = if args.dry_run {
        log::info!("dry run: stores left untouched");
        false
    } else {
        let mut pending = PendingCommit::new(session.into_documents()?);
        commit_with_retries(
            &mut pending,
            &store,
            &primary_path,
            &companion_path,
            args.commit_retries,
        )?;
        true
    };

    match args.format {
        OutputFormat::Text => {
            print!("{}", render_text(&report));
            if committed {
                println!("saved {}", save_path(&primary_path)?.display());
                println!("saved {}", save_path(&companion_path)?.display());
            }
        }
        OutputFormat::Json => {
            let output = JsonOutput {
                primary: save_path(&primary_path)?.display().to_string(),
                companion: save_path(&companion_path)?.display().to_string(),
                committed,
                report: &report,
            };
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            serde_json::to_writer_pretty(&mut handle, &output)?;
            handle.write_all(b"\n")?;
        }
    }
    Ok(())
}

fn commit_with_retries(
    pending: &mut PendingCommit,
    store: &FileStore,
    primary: &Path,
    companion: &Path,
    retries: usize,
) -> Result<()> {
    let mut attempt = 0;
    loop {
        match pending.commit(store, primary, companion) {
            Ok(()) => return Ok(()),
            Err(err) if attempt < retries => {
                attempt += 1;
                log::warn!("{err}; retrying ({attempt}/{retries})");
            }
            Err(err) => return Err(err.into()),
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<SyncConfig> {
    let Some(path) = path else {
        return Ok(SyncConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse config {}", path.display()))
}

fn resolve_store(explicit: Option<&Path>, project_dir: Option<&Path>, stem: &str) -> Result<PathBuf> {
    match (explicit, project_dir) {
        (Some(path), _) => Ok(path.to_path_buf()),
        (None, Some(dir)) => Ok(find_document(dir, stem)?),
        (None, None) => anyhow::bail!("no `{stem}` store given (pass its path or --project-dir)"),
    }
}
