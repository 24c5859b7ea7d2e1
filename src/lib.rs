//! tagwright keeps the tags, cover art and file names of an album or artist
//! tree consistent.
//!
//! A pass goes scan → load → gate → reconcile → write → rename. See
//! [`archive::AlbumArchive`] and [`archive::ArtistArchive`].

pub mod archive;
pub mod config;
pub mod cover;
pub mod error;
pub mod library;
pub mod reconcile;
pub mod state;
pub mod store;
pub mod track;

#[cfg(test)]
mod test_env;

pub use archive::{AlbumArchive, ArtistArchive, ArtistOptions, PassOutcome};
pub use reconcile::{PassReport, Watermark};
pub use track::{TagAlias, Track};
