use std::collections::{BTreeMap, BTreeSet};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{PassIssue, RenameCollisionError};
use crate::store::TagStore;
use crate::track::{TagAlias, Track};

use super::report::PassReport;

/// Whether the given track numbers can prefix file names: every one
/// present and no two equal.
pub fn numbering_usable<'a>(numbers: impl IntoIterator<Item = Option<&'a str>>) -> bool {
    let mut seen = BTreeSet::new();
    for number in numbers {
        match number {
            Some(n) if seen.insert(n) => {}
            _ => return false,
        }
    }
    true
}

/// Replace characters that cannot appear in a file name.
pub fn sanitize_stem(raw: &str) -> String {
    raw.chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect()
}

/// `"<n>. <title>"` when `numbered`, else the title. `None` for untitled
/// tracks.
pub fn desired_stem(track: &Track, numbered: bool) -> Option<String> {
    let title = track.get_tag(TagAlias::Title)?;
    let stem = match track.get_tag(TagAlias::TrackNumber) {
        Some(n) if numbered => format!("{n}. {title}"),
        _ => title.to_string(),
    };
    Some(sanitize_stem(&stem))
}

fn target_path(from: &Path, stem: &str) -> PathBuf {
    let mut name = OsString::from(stem);
    if let Some(ext) = from.extension() {
        name.push(".");
        name.push(ext);
    }
    from.with_file_name(name)
}

/// Rename `track` on disk to `stem`, keeping its extension. Returns
/// whether a rename happened.
pub fn rename_track(track: &mut Track, stem: &str, store: &dyn TagStore) -> Result<bool, PassIssue> {
    if track.stem() == Some(stem) {
        return Ok(false);
    }
    let from = track.path().to_path_buf();
    let to = target_path(&from, stem);
    if to.exists() {
        return Err(RenameCollisionError { from, to }.into());
    }

    move_track(track, to, store)?;
    info!(from = %from.display(), to = %track.path().display(), "renamed");
    Ok(true)
}

fn move_track(track: &mut Track, to: PathBuf, store: &dyn TagStore) -> Result<(), PassIssue> {
    let from = track.path().to_path_buf();
    fs::rename(&from, &to).map_err(|source| PassIssue::RenameIo {
        from: from.clone(),
        source,
    })?;
    store.relocate(&from, &to);
    track.relocate(to);
    Ok(())
}

/// Move `track` to a free hidden name in its directory, out of the way of a
/// rename that wants its current path.
fn park(track: &mut Track, store: &dyn TagStore) -> Result<(), PassIssue> {
    let stem = track.stem().unwrap_or_default().to_string();
    let mut to = target_path(track.path(), &format!(".{stem}.tagwright-rename"));
    let mut attempt = 1;
    while to.exists() {
        attempt += 1;
        to = target_path(track.path(), &format!(".{stem}.tagwright-rename-{attempt}"));
    }
    debug!(from = %track.path().display(), to = %to.display(), "parked for rename");
    move_track(track, to, store)
}

/// Rename admitted tracks after their persisted tags.
///
/// With `numbered`, a directory gets number prefixes when the numbering of
/// all its tracks, `held` ones included, is usable. Tracks whose write
/// failed keep their name.
///
/// A target still occupied by another track that is about to be renamed is
/// not a collision: that rename is retried once the occupant has moved, and
/// cycles of renames go through a temporary name. Only a target held by a
/// file that stays put is reported.
pub fn apply_filenames(
    admitted: &mut [Track],
    held: &[Track],
    numbered: bool,
    store: &dyn TagStore,
    report: &mut PassReport,
) {
    let mut numbers: BTreeMap<PathBuf, Vec<Option<String>>> = BTreeMap::new();
    for track in admitted.iter().chain(held) {
        numbers
            .entry(track.directory().to_path_buf())
            .or_default()
            .push(track.get_tag(TagAlias::TrackNumber).map(str::to_string));
    }
    let prefixed: BTreeMap<PathBuf, bool> = numbers
        .into_iter()
        .map(|(dir, nums)| {
            let usable = numbered && numbering_usable(nums.iter().map(Option::as_deref));
            debug!(directory = %dir.display(), prefixed = usable, "filename numbering");
            (dir, usable)
        })
        .collect();

    let mut pending: Vec<(usize, String)> = admitted
        .iter()
        .enumerate()
        .filter(|(_, track)| !track.is_modified())
        .filter_map(|(i, track)| {
            let with_number = prefixed.get(track.directory()).copied().unwrap_or(false);
            let stem = desired_stem(track, with_number)?;
            (track.stem() != Some(stem.as_str())).then_some((i, stem))
        })
        .collect();

    while !pending.is_empty() {
        let moving: BTreeSet<PathBuf> = pending
            .iter()
            .map(|(i, _)| admitted[*i].path().to_path_buf())
            .collect();
        let mut deferred = Vec::new();
        let mut progressed = false;

        for (i, stem) in pending {
            let track = &mut admitted[i];
            if moving.contains(&target_path(track.path(), &stem)) {
                deferred.push((i, stem));
                continue;
            }
            match rename_track(track, &stem, store) {
                Ok(true) => {
                    report.renamed += 1;
                    progressed = true;
                }
                Ok(false) => {}
                Err(issue) => report.record(issue),
            }
        }

        if !progressed {
            // Every remaining target is the current path of another
            // remaining track. Park the occupants so the rest can move.
            let targets: BTreeSet<PathBuf> = deferred
                .iter()
                .map(|(i, stem)| target_path(admitted[*i].path(), stem))
                .collect();
            let mut kept = Vec::with_capacity(deferred.len());
            for (i, stem) in deferred {
                let track = &mut admitted[i];
                if targets.contains(track.path()) {
                    if let Err(issue) = park(track, store) {
                        report.record(issue);
                        continue;
                    }
                }
                kept.push((i, stem));
            }
            deferred = kept;
        }
        pending = deferred;
    }
}
