//! `themesync` command-line front end.
//!
//! Loads a source color document plus the primary (`RSC_Theme`) and companion
//! (`UGCTheme`) stores, runs one [`themesync_engine::SyncSession`] and writes
//! both stores back.

pub mod cli;
mod render;

pub use render::render_text;
