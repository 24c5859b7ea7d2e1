use tracing::debug;

use crate::error::ArchiveError;
use crate::track::{TagAlias, Track};

/// Accepted spellings of one artist. The first is canonical.
#[derive(Debug, Clone)]
pub struct ArtistNames {
    names: Vec<String>,
    case_sensitive: bool,
}

impl ArtistNames {
    /// Blank names are dropped; at least one must remain.
    pub fn new<I, S>(names: I, case_sensitive: bool) -> Result<Self, ArchiveError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<String> = names
            .into_iter()
            .map(|n| n.as_ref().trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();
        if names.is_empty() {
            return Err(ArchiveError::NoArtistNames);
        }
        Ok(Self {
            names,
            case_sensitive,
        })
    }

    pub fn canonical(&self) -> &str {
        &self.names[0]
    }

    /// Whether `value` contains any accepted name. Collaborations such as
    /// "A & B (feat C)" match on "A".
    pub fn matches(&self, value: &str) -> bool {
        if self.case_sensitive {
            self.names.iter().any(|n| value.contains(n.as_str()))
        } else {
            let value = value.to_lowercase();
            self.names
                .iter()
                .any(|n| value.contains(n.to_lowercase().as_str()))
        }
    }
}

/// Fill in or correct the artist tag of every track. With `missed_only`
/// only absent tags are filled. Returns the number of tracks changed.
pub fn reconcile_artists(tracks: &mut [Track], names: &ArtistNames, missed_only: bool) -> usize {
    let mut changed = 0;
    for track in tracks.iter_mut() {
        let replace = match track.get_tag(TagAlias::Artist) {
            None => true,
            Some(_) if missed_only => false,
            Some(current) => !names.matches(current),
        };
        if replace {
            debug!(path = %track.path().display(), artist = names.canonical(), "artist enforced");
            track.set_tag(TagAlias::Artist, names.canonical());
            changed += 1;
        }
    }
    changed
}
