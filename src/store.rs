//! Tag persistence.
//!
//! The engine only talks to [`TagStore`]; native field names and container
//! formats stay behind it. [`LoftyTagStore`] is the on-disk implementation.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::track::{CoverArt, CoverUpdate, TagMap};

mod container;
#[cfg(test)]
pub(crate) mod fixture;
mod index;
#[cfg(test)]
pub(crate) mod memory;

pub use container::*;
pub use index::ReconcileIndex;

/// Persisted state of one track as read from its container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackSnapshot {
    pub tags: TagMap,
    /// Embedded front cover, if any.
    pub cover: Option<CoverArt>,
    pub reconciled_at: Option<DateTime<Utc>>,
}

/// Everything a single persistence call writes for one track.
#[derive(Debug)]
pub struct TrackWrite<'a> {
    /// Complete alias state; aliases missing here are removed from the file.
    pub tags: &'a TagMap,
    pub cover: &'a CoverUpdate,
    pub reconciled_at: DateTime<Utc>,
}

pub trait TagStore {
    fn read(&self, path: &Path) -> Result<TrackSnapshot, StoreError>;

    fn write(&self, path: &Path, update: &TrackWrite<'_>) -> Result<(), StoreError>;

    /// Keep per-track bookkeeping in step with a rename done on disk.
    fn relocate(&self, _from: &Path, _to: &Path) {}

    /// Drop bookkeeping for tracks that are no longer in the tree. `scanned`
    /// is every track found by the current pass.
    fn prune(&self, _scanned: &[PathBuf]) {}

    /// Persist any buffered bookkeeping. Called once at the end of a pass.
    fn flush(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
