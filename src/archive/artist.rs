use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::LibrarySettings;
use crate::error::ArchiveError;
use crate::reconcile::{
    ArtistNames, PassReport, UpdateGate, Watermark, apply_filenames, default_titles,
    reconcile_artists,
};
use crate::store::TagStore;

use super::{PassOutcome, ensure_directory, finish, load_tracks, persist};

#[derive(Debug, Clone, Copy)]
pub struct ArtistOptions {
    pub case_sensitive: bool,
    /// Only fill absent artist tags, never correct existing ones.
    pub missed_only: bool,
}

impl Default for ArtistOptions {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            missed_only: false,
        }
    }
}

/// A tree holding one artist's recordings.
pub struct ArtistArchive<'a> {
    root: PathBuf,
    names: ArtistNames,
    options: ArtistOptions,
    settings: &'a LibrarySettings,
    store: &'a dyn TagStore,
}

impl<'a> ArtistArchive<'a> {
    /// `names` in order of preference; the first is written when a tag is
    /// missing or matches none of them.
    pub fn new<I, S>(
        root: impl Into<PathBuf>,
        names: I,
        options: ArtistOptions,
        settings: &'a LibrarySettings,
        store: &'a dyn TagStore,
    ) -> Result<Self, ArchiveError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self {
            root: root.into(),
            names: ArtistNames::new(names, options.case_sensitive)?,
            options,
            settings,
            store,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn update(
        &self,
        new_only: bool,
        watermark: Option<Watermark>,
    ) -> Result<PassOutcome, ArchiveError> {
        ensure_directory(&self.root)?;
        info!(
            root = %self.root.display(),
            artist = self.names.canonical(),
            new_only,
            "artist pass"
        );

        let mut report = PassReport::default();
        let gate = UpdateGate::new(new_only, watermark);
        let (mut tracks, held) =
            load_tracks(&self.root, self.settings, self.store, &gate, &mut report);

        reconcile_artists(&mut tracks, &self.names, self.options.missed_only);
        default_titles(&mut tracks);

        persist(&mut tracks, self.store, &mut report);
        apply_filenames(&mut tracks, &held, false, self.store, &mut report);

        finish(&self.root, self.store, report)
    }
}
