//! Archives: one reconciliation pass over a tree, end to end.
//!
//! An archive scans its root, loads every track, lets the
//! [`UpdateGate`](crate::reconcile::UpdateGate) pick the ones to work on,
//! runs the reconcile steps, writes, renames, and hands back a report with
//! the advanced watermark.

mod album;
mod artist;

pub use album::AlbumArchive;
pub use artist::{ArtistArchive, ArtistOptions};

use std::path::Path;

use tracing::info;

use crate::config::LibrarySettings;
use crate::error::{ArchiveError, PassIssue};
use crate::library::find_tracks;
use crate::reconcile::{PassReport, UpdateGate, Watermark};
use crate::store::TagStore;
use crate::track::Track;

/// Result of a successful pass.
#[derive(Debug)]
pub struct PassOutcome {
    pub report: PassReport,
    /// Watermark to pass to the next incremental pass over the same root.
    pub watermark: Watermark,
}

fn ensure_directory(root: &Path) -> Result<(), ArchiveError> {
    if root.is_dir() {
        Ok(())
    } else {
        Err(ArchiveError::NotADirectory(root.to_path_buf()))
    }
}

/// Scan and load every track under `root`, then split by `gate`. Store
/// bookkeeping for tracks that vanished from the tree is dropped.
fn load_tracks(
    root: &Path,
    settings: &LibrarySettings,
    store: &dyn TagStore,
    gate: &UpdateGate,
    report: &mut PassReport,
) -> (Vec<Track>, Vec<Track>) {
    let paths = find_tracks(root, settings);
    report.scanned = paths.len();
    store.prune(&paths);

    let mut tracks = Vec::with_capacity(paths.len());
    for path in paths {
        match Track::load(path, store) {
            Ok(track) => tracks.push(track),
            Err(e) => report.record(e),
        }
    }

    let (admitted, held) = gate.partition(tracks);
    report.admitted = admitted.len();
    (admitted, held)
}

/// Write every modified track. A failed write is reported and the track
/// stays modified.
fn persist(tracks: &mut [Track], store: &dyn TagStore, report: &mut PassReport) {
    for track in tracks.iter_mut() {
        match track.write(store) {
            Ok(true) => report.written += 1,
            Ok(false) => {}
            Err(source) => report.record(PassIssue::TrackWrite {
                path: track.path().to_path_buf(),
                source,
            }),
        }
    }
}

fn finish(root: &Path, store: &dyn TagStore, report: PassReport) -> Result<PassOutcome, ArchiveError> {
    store.flush()?;
    let watermark = Watermark::now();
    info!(root = %root.display(), %report, %watermark, "pass complete");
    Ok(PassOutcome { report, watermark })
}
