use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::Settings;
use crate::cover::{CoverCandidates, ImageCodec};
use crate::error::ArchiveError;
use crate::reconcile::{
    PassReport, UpdateGate, Watermark, apply_filenames, default_titles, embed_covers,
    enforce_album, invalidate_conflicting_totals, invalidate_duplicate_numbers,
};
use crate::store::TagStore;

use super::{PassOutcome, ensure_directory, finish, load_tracks, persist};

/// A tree holding one album, possibly split across parts and directories.
pub struct AlbumArchive<'a> {
    root: PathBuf,
    album: String,
    settings: &'a Settings,
    store: &'a dyn TagStore,
    codec: &'a dyn ImageCodec,
}

impl<'a> AlbumArchive<'a> {
    pub fn new(
        root: impl Into<PathBuf>,
        album: &str,
        settings: &'a Settings,
        store: &'a dyn TagStore,
        codec: &'a dyn ImageCodec,
    ) -> Result<Self, ArchiveError> {
        let album = album.trim();
        if album.is_empty() {
            return Err(ArchiveError::EmptyAlbumName);
        }
        Ok(Self {
            root: root.into(),
            album: album.to_string(),
            settings,
            store,
            codec,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn album(&self) -> &str {
        &self.album
    }

    /// Run one pass. With `new_only` and a `watermark`, only tracks
    /// reconciled after it (or never) are touched.
    pub fn update(
        &self,
        new_only: bool,
        watermark: Option<Watermark>,
    ) -> Result<PassOutcome, ArchiveError> {
        ensure_directory(&self.root)?;
        info!(root = %self.root.display(), album = %self.album, new_only, "album pass");

        let mut report = PassReport::default();
        let gate = UpdateGate::new(new_only, watermark);
        let (mut tracks, held) =
            load_tracks(&self.root, &self.settings.library, self.store, &gate, &mut report);

        let albums = enforce_album(&mut tracks, &self.album);
        let numbers = invalidate_duplicate_numbers(&mut tracks);
        let totals = invalidate_conflicting_totals(&mut tracks);
        debug!(albums, numbers, totals, "tag consistency applied");

        let candidates = CoverCandidates::discover(&self.root, &self.settings.library);
        embed_covers(
            &mut tracks,
            &candidates,
            self.codec,
            &self.settings.cover,
            &mut report,
        );
        default_titles(&mut tracks);

        persist(&mut tracks, self.store, &mut report);
        apply_filenames(&mut tracks, &held, true, self.store, &mut report);

        finish(&self.root, self.store, report)
    }
}
