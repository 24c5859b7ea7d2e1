use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::config::LibrarySettings;
use crate::store::AUDIO_EXTENSIONS;

/// Image extensions eligible as cover art, in precedence order.
pub const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

fn has_extension(path: &Path, exts: &[&str]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| *e == ext)
        })
        .unwrap_or(false)
}

pub fn is_audio_file(path: &Path) -> bool {
    has_extension(path, &AUDIO_EXTENSIONS)
}

pub fn is_image_file(path: &Path) -> bool {
    has_extension(path, &IMAGE_EXTENSIONS)
}

pub(crate) fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Recursively collect files under `root` accepted by `keep`, sorted by path.
///
/// Entries that cannot be read are skipped.
fn walk_files(root: &Path, settings: &LibrarySettings, keep: fn(&Path) -> bool) -> Vec<PathBuf> {
    let walker = WalkDir::new(root).follow_links(settings.follow_links);

    let mut files: Vec<PathBuf> = walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(err) => {
                debug!(error = %err, "skipping unreadable entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| keep(p))
        .collect();

    files.sort();
    files
}

/// Every audio file under `root` with a recognized container extension.
pub fn find_tracks(root: &Path, settings: &LibrarySettings) -> Vec<PathBuf> {
    let tracks = walk_files(root, settings, is_audio_file);
    debug!(root = %root.display(), count = tracks.len(), "scanned for tracks");
    tracks
}

/// Every image file under `root`, sorted by path.
pub fn find_images(root: &Path, settings: &LibrarySettings) -> Vec<PathBuf> {
    walk_files(root, settings, is_image_file)
}
