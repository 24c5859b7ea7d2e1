use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StoreError;

#[derive(Debug, Default, Serialize, Deserialize)]
struct IndexFile {
    #[serde(default)]
    tracks: BTreeMap<String, DateTime<Utc>>,
}

/// Per-track "last reconciled" stamps for one tree, stored as TOML.
///
/// Keys are paths relative to the tree root with `/` separators, so the
/// index survives the tree being moved or mounted elsewhere.
#[derive(Debug)]
pub struct ReconcileIndex {
    path: PathBuf,
    root: PathBuf,
    file: IndexFile,
    dirty: bool,
}

impl ReconcileIndex {
    /// Load the index at `path`; a missing file is an empty index.
    pub fn load(path: PathBuf, root: &Path) -> Result<Self, StoreError> {
        let file = if path.is_file() {
            let raw = fs::read_to_string(&path).map_err(|e| StoreError::Index {
                path: path.clone(),
                reason: e.to_string(),
            })?;
            toml::from_str(&raw).map_err(|e| StoreError::Index {
                path: path.clone(),
                reason: e.to_string(),
            })?
        } else {
            IndexFile::default()
        };

        debug!(index = %path.display(), entries = file.tracks.len(), "loaded reconcile index");
        Ok(Self {
            path,
            root: root.to_path_buf(),
            file,
            dirty: false,
        })
    }

    fn key(&self, track: &Path) -> String {
        let rel = track.strip_prefix(&self.root).unwrap_or(track);
        rel.components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }

    pub fn get(&self, track: &Path) -> Option<DateTime<Utc>> {
        self.file.tracks.get(&self.key(track)).copied()
    }

    pub fn set(&mut self, track: &Path, at: DateTime<Utc>) {
        let key = self.key(track);
        self.file.tracks.insert(key, at);
        self.dirty = true;
    }

    pub fn rename(&mut self, from: &Path, to: &Path) {
        if let Some(at) = self.file.tracks.remove(&self.key(from)) {
            let key = self.key(to);
            self.file.tracks.insert(key, at);
            self.dirty = true;
        }
    }

    /// Forget every track not in `tracks`.
    pub fn retain(&mut self, tracks: &[PathBuf]) {
        let keep: BTreeSet<String> = tracks.iter().map(|t| self.key(t)).collect();
        let before = self.file.tracks.len();
        self.file.tracks.retain(|key, _| keep.contains(key));
        let dropped = before - self.file.tracks.len();
        if dropped > 0 {
            debug!(dropped, "pruned stale index entries");
            self.dirty = true;
        }
    }

    pub fn len(&self) -> usize {
        self.file.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.file.tracks.is_empty()
    }

    /// Write the index back if anything changed since the last save.
    pub fn save(&mut self) -> Result<(), StoreError> {
        if !self.dirty {
            return Ok(());
        }
        let raw = toml::to_string(&self.file).map_err(|e| StoreError::Index {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;
        fs::write(&self.path, raw).map_err(|e| StoreError::Index {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;
        self.dirty = false;
        Ok(())
    }
}
