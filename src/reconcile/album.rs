use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use tracing::debug;

use crate::config::CoverSettings;
use crate::cover::{CoverCandidates, ImageCodec};
use crate::error::CoverSourceError;
use crate::library::{by_album_and_directory, by_directory};
use crate::track::{CoverArt, TagAlias, Track};

use super::report::PassReport;

/// Overwrite the album tag wherever it does not already contain `album`.
/// Containment keeps part suffixes like "Album p.2" intact.
pub fn enforce_album(tracks: &mut [Track], album: &str) -> usize {
    let mut changed = 0;
    for track in tracks.iter_mut() {
        let conforms = track
            .get_tag(TagAlias::Album)
            .is_some_and(|current| current.contains(album));
        if !conforms {
            track.set_tag(TagAlias::Album, album);
            changed += 1;
        }
    }
    changed
}

/// Drop `tracknumber` from every track of each album group in which any
/// number repeats. Returns the number of groups invalidated.
pub fn invalidate_duplicate_numbers(tracks: &mut [Track]) -> usize {
    let mut invalidated = 0;
    for (key, members) in by_album_and_directory(tracks) {
        let duplicated = {
            let mut seen = BTreeSet::new();
            members
                .iter()
                .filter_map(|&i| tracks[i].get_tag(TagAlias::TrackNumber))
                .any(|n| !seen.insert(n))
        };
        if duplicated {
            debug!(directory = %key.directory.display(), album = ?key.album, "duplicate track numbers, clearing");
            for i in members {
                tracks[i].remove_tag(TagAlias::TrackNumber);
            }
            invalidated += 1;
        }
    }
    invalidated
}

/// Drop `tracktotal` from every track of each album group holding more than
/// one distinct total. Returns the number of groups invalidated.
pub fn invalidate_conflicting_totals(tracks: &mut [Track]) -> usize {
    let mut invalidated = 0;
    for (key, members) in by_album_and_directory(tracks) {
        let conflicting = {
            let totals: BTreeSet<&str> = members
                .iter()
                .filter_map(|&i| tracks[i].get_tag(TagAlias::TrackTotal))
                .collect();
            if totals.len() > 1 {
                debug!(directory = %key.directory.display(), album = ?key.album, ?totals, "conflicting track totals, clearing");
            }
            totals.len() > 1
        };
        if conflicting {
            for i in members {
                tracks[i].remove_tag(TagAlias::TrackTotal);
            }
            invalidated += 1;
        }
    }
    invalidated
}

/// Embed the selected cover into every track of each directory group.
///
/// Each image is prepared at most once. A directory whose image cannot be
/// prepared is reported and left alone.
pub fn embed_covers(
    tracks: &mut [Track],
    candidates: &CoverCandidates,
    codec: &dyn ImageCodec,
    bounds: &CoverSettings,
    report: &mut PassReport,
) {
    if !candidates.has_images() {
        debug!("no images in tree, covers untouched");
        return;
    }

    let mut prepared: BTreeMap<PathBuf, Result<CoverArt, String>> = BTreeMap::new();
    for (directory, members) in by_directory(tracks) {
        let Some(image) = candidates.select(&directory) else {
            continue;
        };
        let art = prepared.entry(image.clone()).or_insert_with(|| {
            codec
                .prepare_cover(&image, bounds.max_width, bounds.max_height)
                .map_err(|e| e.to_string())
        });
        match art {
            Ok(art) => {
                debug!(directory = %directory.display(), image = %image.display(), "cover selected");
                for i in members {
                    if tracks[i].set_cover(art.clone()) {
                        report.covers_embedded += 1;
                    }
                }
            }
            Err(reason) => report.record(CoverSourceError {
                image,
                directory,
                reason: reason.clone(),
            }),
        }
    }
}

/// Give every untitled track its file stem as title.
pub fn default_titles(tracks: &mut [Track]) -> usize {
    let mut changed = 0;
    for track in tracks.iter_mut() {
        if track.get_tag(TagAlias::Title).is_some() {
            continue;
        }
        if let Some(stem) = track.stem().map(str::to_string) {
            track.set_tag(TagAlias::Title, stem);
            changed += 1;
        }
    }
    changed
}
