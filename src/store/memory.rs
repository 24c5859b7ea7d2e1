use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use super::{TagStore, TrackSnapshot, TrackWrite};
use crate::error::StoreError;
use crate::track::{CoverArt, CoverUpdate, TagAlias};

/// In-memory stand-in for real audio containers.
#[derive(Default)]
pub struct MemoryTagStore {
    files: RefCell<BTreeMap<PathBuf, TrackSnapshot>>,
    broken: RefCell<BTreeSet<PathBuf>>,
    writes: Cell<usize>,
}

impl MemoryTagStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl Into<PathBuf>, tags: &[(TagAlias, &str)]) {
        let snapshot = TrackSnapshot {
            tags: tags.iter().map(|(a, v)| (*a, v.to_string())).collect(),
            ..TrackSnapshot::default()
        };
        self.files.borrow_mut().insert(path.into(), snapshot);
    }

    pub fn set_reconciled_at(&self, path: &Path, at: DateTime<Utc>) {
        if let Some(s) = self.files.borrow_mut().get_mut(path) {
            s.reconciled_at = Some(at);
        }
    }

    pub fn set_cover(&self, path: &Path, art: CoverArt) {
        if let Some(s) = self.files.borrow_mut().get_mut(path) {
            s.cover = Some(art);
        }
    }

    /// Make every read of `path` fail like a corrupt container.
    pub fn mark_broken(&self, path: impl Into<PathBuf>) {
        self.broken.borrow_mut().insert(path.into());
    }

    pub fn snapshot(&self, path: &Path) -> Option<TrackSnapshot> {
        self.files.borrow().get(path).cloned()
    }

    pub fn tag(&self, path: &Path, alias: TagAlias) -> Option<String> {
        self.snapshot(path).and_then(|s| s.tags.get(&alias).cloned())
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.borrow().keys().cloned().collect()
    }

    pub fn writes(&self) -> usize {
        self.writes.get()
    }
}

impl TagStore for MemoryTagStore {
    fn read(&self, path: &Path) -> Result<TrackSnapshot, StoreError> {
        if self.broken.borrow().contains(path) {
            return Err(StoreError::Malformed {
                path: path.to_path_buf(),
                reason: "corrupt tag container".to_string(),
            });
        }
        self.snapshot(path).ok_or_else(|| StoreError::Malformed {
            path: path.to_path_buf(),
            reason: "no such track".to_string(),
        })
    }

    fn write(&self, path: &Path, update: &TrackWrite<'_>) -> Result<(), StoreError> {
        let mut files = self.files.borrow_mut();
        let entry = files.entry(path.to_path_buf()).or_default();
        entry.tags = update.tags.clone();
        match update.cover {
            CoverUpdate::Keep => {}
            CoverUpdate::Clear => entry.cover = None,
            CoverUpdate::Replace(art) => entry.cover = Some(art.clone()),
        }
        entry.reconciled_at = Some(update.reconciled_at);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn relocate(&self, from: &Path, to: &Path) {
        let mut files = self.files.borrow_mut();
        if let Some(snapshot) = files.remove(from) {
            files.insert(to.to_path_buf(), snapshot);
        }
    }
}
