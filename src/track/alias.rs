use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::TagError;

/// Name of the reserved reconciliation timestamp. Readable, never writable.
pub const RECONCILED_AT: &str = "reconciled_at";

/// The fixed set of tag fields exposed uniformly across container formats.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TagAlias {
    Title,
    Artist,
    Album,
    Date,
    Composer,
    TrackNumber,
    TrackTotal,
    Genre,
}

impl TagAlias {
    pub const ALL: [TagAlias; 8] = [
        TagAlias::Title,
        TagAlias::Artist,
        TagAlias::Album,
        TagAlias::Date,
        TagAlias::Composer,
        TagAlias::TrackNumber,
        TagAlias::TrackTotal,
        TagAlias::Genre,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TagAlias::Title => "title",
            TagAlias::Artist => "artist",
            TagAlias::Album => "album",
            TagAlias::Date => "date",
            TagAlias::Composer => "composer",
            TagAlias::TrackNumber => "tracknumber",
            TagAlias::TrackTotal => "tracktotal",
            TagAlias::Genre => "genre",
        }
    }
}

impl fmt::Display for TagAlias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TagAlias {
    type Err = TagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if name.eq_ignore_ascii_case(RECONCILED_AT) {
            return Err(TagError::ReadOnlyTag(name.to_string()));
        }
        TagAlias::ALL
            .into_iter()
            .find(|alias| alias.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| TagError::InvalidAlias(name.to_string()))
    }
}

/// Present tag values keyed by alias. A missing key means the tag is absent.
pub type TagMap = BTreeMap<TagAlias, String>;

/// Normalize a raw value read from a container: blank means absent.
pub fn normalize_value(raw: &str) -> Option<String> {
    let v = raw.trim();
    if v.is_empty() {
        None
    } else {
        Some(v.to_string())
    }
}
