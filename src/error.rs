//! Error taxonomy for a reconciliation pass.
//!
//! Two kinds of failure exist. [`TagError`] and [`ArchiveError`] abort the
//! pass immediately. Everything else is wrapped in a [`PassIssue`], recorded
//! in the pass report and the pass carries on with the remaining tracks.

use std::path::PathBuf;

use thiserror::Error;

/// Misuse of the tag alias surface. Always a programming error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    #[error("unexpected tag alias: {0}")]
    InvalidAlias(String),
    #[error("tag `{0}` is read-only")]
    ReadOnlyTag(String),
}

/// Failures reported by a [`crate::store::TagStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{}: not a recognized tag container", .0.display())]
    Unsupported(PathBuf),
    #[error("{}: {source}", path.display())]
    Lofty {
        path: PathBuf,
        #[source]
        source: lofty::error::LoftyError,
    },
    #[error("{}: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },
    #[error("reconciliation index {}: {reason}", path.display())]
    Index { path: PathBuf, reason: String },
}

/// A track with a recognized extension whose tags could not be read.
#[derive(Debug, Error)]
#[error("cannot read tags of {}", path.display())]
pub struct TrackFormatError {
    pub path: PathBuf,
    #[source]
    pub source: StoreError,
}

/// The desired filename of a track is already taken.
#[derive(Debug, Error)]
#[error("cannot rename {} to {}: target exists", from.display(), to.display())]
pub struct RenameCollisionError {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// The selected cover image could not be turned into embeddable bytes.
#[derive(Debug, Error)]
#[error("cover {} for {} unusable: {reason}", image.display(), directory.display())]
pub struct CoverSourceError {
    pub image: PathBuf,
    pub directory: PathBuf,
    pub reason: String,
}

/// A non-fatal problem collected into the pass report.
#[derive(Debug, Error)]
pub enum PassIssue {
    #[error(transparent)]
    TrackFormat(#[from] TrackFormatError),
    #[error(transparent)]
    RenameCollision(#[from] RenameCollisionError),
    #[error(transparent)]
    CoverSource(#[from] CoverSourceError),
    #[error("failed to write tags of {}: {source}", path.display())]
    TrackWrite {
        path: PathBuf,
        #[source]
        source: StoreError,
    },
    #[error("failed to rename {}: {source}", from.display())]
    RenameIo {
        from: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Fatal errors: the pass stops and the watermark is not advanced.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("no usable artist names were given")]
    NoArtistNames,
    #[error("album name must not be empty")]
    EmptyAlbumName,
    #[error(transparent)]
    Tag(#[from] TagError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failures loading or saving the watermark state file.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("state file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("state file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("state file {}: {source}", path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: toml::ser::Error,
    },
}
