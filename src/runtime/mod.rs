use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::warn;

use tagwright::config::Settings;
use tagwright::cover::RasterCodec;
use tagwright::error::{ArchiveError, StateError};
use tagwright::library::{TagStats, tag_stats};
use tagwright::state::{StateFile, resolve_state_path};
use tagwright::store::LoftyTagStore;
use tagwright::{AlbumArchive, ArtistArchive, ArtistOptions, PassOutcome, Watermark};

mod cli;
mod logging;
mod settings;

use cli::{Cli, Command};

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let loaded = settings::load_settings();
    logging::init(&loaded.settings.logging, cli.verbose);
    loaded.warn_on_fallback();
    let settings = loaded.settings;

    match cli.command {
        Command::Album { root, name, all } => {
            let root = absolute(root);
            let store = LoftyTagStore::open(&root, &settings.state.index_file_name)?;
            let codec = RasterCodec;
            let archive = AlbumArchive::new(&root, &name, &settings, &store, &codec)?;
            run_pass(&root, &settings, cli.no_state, all, |new_only, mark| {
                archive.update(new_only, mark)
            })?;
        }
        Command::Artist {
            root,
            names,
            ignore_case,
            missed_only,
            all,
        } => {
            let root = absolute(root);
            let store = LoftyTagStore::open(&root, &settings.state.index_file_name)?;
            let options = ArtistOptions {
                case_sensitive: !ignore_case,
                missed_only,
            };
            let archive = ArtistArchive::new(&root, &names, options, &settings.library, &store)?;
            run_pass(&root, &settings, cli.no_state, all, |new_only, mark| {
                archive.update(new_only, mark)
            })?;
        }
        Command::Stats { root, alias } => {
            let root = absolute(root);
            let store = LoftyTagStore::open(&root, &settings.state.index_file_name)?;
            print_stats(&tag_stats(&root, alias, &settings.library, &store));
        }
    }

    Ok(())
}

/// Canonical form of `root` so watermarks do not depend on how the path
/// was typed. Left as given when it cannot be resolved.
fn absolute(root: PathBuf) -> PathBuf {
    fs::canonicalize(&root).unwrap_or(root)
}

fn open_state(settings: &Settings, no_state: bool) -> Result<Option<StateFile>, StateError> {
    if no_state {
        return Ok(None);
    }
    match resolve_state_path(&settings.state) {
        Some(path) => StateFile::load(path).map(Some),
        None => {
            warn!("no state path (HOME unset), watermarks are not kept");
            Ok(None)
        }
    }
}

/// Run one pass with the stored watermark and store the advanced one.
fn run_pass<F>(
    root: &Path,
    settings: &Settings,
    no_state: bool,
    all: bool,
    pass: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnOnce(bool, Option<Watermark>) -> Result<PassOutcome, ArchiveError>,
{
    let mut state = open_state(settings, no_state)?;
    let watermark = state.as_ref().and_then(|s| s.get(root));

    let outcome = pass(!all, watermark)?;

    println!("{}: {}", root.display(), outcome.report);
    for issue in &outcome.report.issues {
        println!("  {issue}");
    }

    if let Some(state) = state.as_mut() {
        state.set(root, outcome.watermark);
        state.save()?;
    }
    Ok(())
}

fn print_stats(stats: &TagStats) {
    println!("{} across {} tracks", stats.alias, stats.total());
    for count in &stats.counts {
        let value = count.value.as_deref().unwrap_or("<none>");
        println!("{:>6}  {value}", count.tracks);
    }
    if !stats.unreadable.is_empty() {
        println!("{} unreadable:", stats.unreadable.len());
        for err in &stats.unreadable {
            println!("  {err}: {}", err.source);
        }
    }
}
