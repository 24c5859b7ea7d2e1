use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::track::{TagAlias, Track};

/// Identity of an album group: the album tag (or its absence) plus the
/// directory. Parts of one album split across tags ("Album p.1" / "Album
/// p.2") in the same directory are distinct groups.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AlbumKey {
    pub album: Option<String>,
    pub directory: PathBuf,
}

/// Indices into `tracks`, grouped by the directory each file lives in.
pub fn by_directory(tracks: &[Track]) -> BTreeMap<PathBuf, Vec<usize>> {
    let mut groups: BTreeMap<PathBuf, Vec<usize>> = BTreeMap::new();
    for (i, track) in tracks.iter().enumerate() {
        groups
            .entry(track.directory().to_path_buf())
            .or_default()
            .push(i);
    }
    groups
}

/// Indices into `tracks`, grouped by (album tag, directory).
pub fn by_album_and_directory(tracks: &[Track]) -> BTreeMap<AlbumKey, Vec<usize>> {
    let mut groups: BTreeMap<AlbumKey, Vec<usize>> = BTreeMap::new();
    for (i, track) in tracks.iter().enumerate() {
        let key = AlbumKey {
            album: track.get_tag(TagAlias::Album).map(str::to_string),
            directory: track.directory().to_path_buf(),
        };
        groups.entry(key).or_default().push(i);
    }
    groups
}
