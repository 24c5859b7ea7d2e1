use std::collections::BTreeMap;
use std::path::Path;

use crate::config::LibrarySettings;
use crate::error::TrackFormatError;
use crate::store::TagStore;
use crate::track::{TagAlias, Track};

use super::scan::find_tracks;

/// How many tracks carry one value of an alias. `None` counts tracks where
/// the tag is absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagCount {
    pub value: Option<String>,
    pub tracks: usize,
}

#[derive(Debug)]
pub struct TagStats {
    pub alias: TagAlias,
    pub counts: Vec<TagCount>,
    pub unreadable: Vec<TrackFormatError>,
}

impl TagStats {
    pub fn total(&self) -> usize {
        self.counts.iter().map(|c| c.tracks).sum()
    }
}

/// Count tracks under `root` per value of `alias`, most common first.
pub fn tag_stats(
    root: &Path,
    alias: TagAlias,
    settings: &LibrarySettings,
    store: &dyn TagStore,
) -> TagStats {
    let mut counts: BTreeMap<Option<String>, usize> = BTreeMap::new();
    let mut unreadable = Vec::new();

    for path in find_tracks(root, settings) {
        match Track::load(path, store) {
            Ok(track) => {
                let value = track.get_tag(alias).map(str::to_string);
                *counts.entry(value).or_default() += 1;
            }
            Err(e) => unreadable.push(e),
        }
    }

    let mut counts: Vec<TagCount> = counts
        .into_iter()
        .map(|(value, tracks)| TagCount { value, tracks })
        .collect();
    // Stable sort keeps value order among equal counts.
    counts.sort_by(|a, b| b.tracks.cmp(&a.tracks));

    TagStats {
        alias,
        counts,
        unreadable,
    }
}
