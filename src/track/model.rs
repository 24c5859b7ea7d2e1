use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::debug;

use super::alias::{RECONCILED_AT, TagAlias, TagMap};
use crate::error::{StoreError, TagError, TrackFormatError};
use crate::store::{TagStore, TrackSnapshot, TrackWrite};

/// Encoded image bytes ready to be embedded as the front cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverArt {
    pub data: Vec<u8>,
    pub mime_type: String,
}

/// What the next write should do with embedded pictures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CoverUpdate {
    #[default]
    Keep,
    /// Drop every embedded picture.
    Clear,
    /// Replace the front cover, leaving other picture types alone.
    Replace(CoverArt),
}

/// One audio file's recognized tags, as seen during a single pass.
#[derive(Debug, Clone)]
pub struct Track {
    path: PathBuf,
    tags: TagMap,
    cover: Option<CoverArt>,
    cover_update: CoverUpdate,
    reconciled_at: Option<DateTime<Utc>>,
    modified: bool,
}

impl Track {
    /// Read the persisted tag state of `path` through `store`.
    pub fn load(path: impl Into<PathBuf>, store: &dyn TagStore) -> Result<Self, TrackFormatError> {
        let path = path.into();
        match store.read(&path) {
            Ok(snapshot) => Ok(Self::from_snapshot(path, snapshot)),
            Err(source) => Err(TrackFormatError { path, source }),
        }
    }

    pub fn from_snapshot(path: impl Into<PathBuf>, snapshot: TrackSnapshot) -> Self {
        Self {
            path: path.into(),
            tags: snapshot.tags,
            cover: snapshot.cover,
            cover_update: CoverUpdate::Keep,
            reconciled_at: snapshot.reconciled_at,
            modified: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory the file lives in.
    pub fn directory(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }

    /// File name without its extension.
    pub fn stem(&self) -> Option<&str> {
        self.path.file_stem().and_then(|s| s.to_str())
    }

    pub fn get_tag(&self, alias: TagAlias) -> Option<&str> {
        self.tags.get(&alias).map(String::as_str)
    }

    /// String-keyed read. The reserved timestamp is readable here in its
    /// RFC 3339 form.
    pub fn get_tag_named(&self, name: &str) -> Result<Option<String>, TagError> {
        if name.trim().eq_ignore_ascii_case(RECONCILED_AT) {
            return Ok(self.reconciled_at.map(|t| t.to_rfc3339()));
        }
        let alias: TagAlias = name.parse()?;
        Ok(self.get_tag(alias).map(str::to_string))
    }

    pub fn tags(&self) -> &TagMap {
        &self.tags
    }

    /// Set a tag. Blank values remove it. Marks the track modified only
    /// when the stored value changes.
    pub fn set_tag(&mut self, alias: TagAlias, value: impl Into<String>) {
        let value = value.into();
        let value = value.trim();
        if value.is_empty() {
            self.remove_tag(alias);
            return;
        }
        if self.get_tag(alias) == Some(value) {
            return;
        }
        debug!(path = %self.path.display(), %alias, value, "set tag");
        self.tags.insert(alias, value.to_string());
        self.modified = true;
    }

    pub fn remove_tag(&mut self, alias: TagAlias) {
        if self.tags.remove(&alias).is_some() {
            debug!(path = %self.path.display(), %alias, "remove tag");
            self.modified = true;
        }
    }

    /// String-keyed write for callers holding alias names.
    pub fn set_tag_named(&mut self, name: &str, value: Option<&str>) -> Result<(), TagError> {
        let alias: TagAlias = name.parse()?;
        match value {
            Some(v) => self.set_tag(alias, v),
            None => self.remove_tag(alias),
        }
        Ok(())
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Whether a front cover is embedded (or pending).
    pub fn has_cover(&self) -> bool {
        self.cover.is_some()
    }

    pub fn cover(&self) -> Option<&CoverArt> {
        self.cover.as_ref()
    }

    /// Embed `art` as the front cover. Returns whether anything changed.
    pub fn set_cover(&mut self, art: CoverArt) -> bool {
        if self.cover.as_ref().is_some_and(|c| c.data == art.data) {
            return false;
        }
        self.cover = Some(art.clone());
        self.cover_update = CoverUpdate::Replace(art);
        self.modified = true;
        true
    }

    pub fn clear_covers(&mut self) {
        if self.cover.take().is_some() {
            self.cover_update = CoverUpdate::Clear;
            self.modified = true;
        }
    }

    /// When this track was last persisted by a reconciliation pass.
    pub fn last_reconciled_at(&self) -> Option<DateTime<Utc>> {
        self.reconciled_at
    }

    /// Persist all tag fields through `store`, stamping the current time.
    ///
    /// No-op when nothing changed. Returns whether a write happened.
    pub fn write(&mut self, store: &dyn TagStore) -> Result<bool, StoreError> {
        self.write_at(store, Utc::now())
    }

    pub(crate) fn write_at(
        &mut self,
        store: &dyn TagStore,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        if !self.modified {
            return Ok(false);
        }
        let update = TrackWrite {
            tags: &self.tags,
            cover: &self.cover_update,
            reconciled_at: now,
        };
        store.write(&self.path, &update)?;
        self.reconciled_at = Some(now);
        self.cover_update = CoverUpdate::Keep;
        self.modified = false;
        Ok(true)
    }

    /// Follow a rename performed on disk.
    pub(crate) fn relocate(&mut self, path: PathBuf) {
        self.path = path;
    }
}
