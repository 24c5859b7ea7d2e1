use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::LibrarySettings;
use crate::library::{IMAGE_EXTENSIONS, find_images, is_hidden};

/// One file-name pattern, matched case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverPattern {
    /// `cover.<ext>`
    Exact(&'static str),
    /// `*cover*.<ext>`
    Contains(&'static str),
    /// `*.<ext>`
    Any(&'static str),
}

impl CoverPattern {
    pub fn matches(&self, file_name: &str) -> bool {
        let name = file_name.to_lowercase();
        let stem_for = |ext: &str| {
            name.strip_suffix(ext)
                .and_then(|s| s.strip_suffix('.'))
                .map(str::to_string)
        };
        match *self {
            CoverPattern::Exact(ext) => stem_for(ext).is_some_and(|stem| stem == "cover"),
            CoverPattern::Contains(ext) => stem_for(ext).is_some_and(|stem| stem.contains("cover")),
            CoverPattern::Any(ext) => stem_for(ext).is_some_and(|stem| !stem.is_empty()),
        }
    }
}

impl fmt::Display for CoverPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoverPattern::Exact(ext) => write!(f, "cover.{ext}"),
            CoverPattern::Contains(ext) => write!(f, "*cover*.{ext}"),
            CoverPattern::Any(ext) => write!(f, "*.{ext}"),
        }
    }
}

/// All patterns, most specific first: every exact name, then every
/// `*cover*` name, then any image, each in declared extension order.
pub fn cover_patterns() -> Vec<CoverPattern> {
    let exact = IMAGE_EXTENSIONS.into_iter().map(CoverPattern::Exact);
    let contains = IMAGE_EXTENSIONS.into_iter().map(CoverPattern::Contains);
    let any = IMAGE_EXTENSIONS.into_iter().map(CoverPattern::Any);
    exact.chain(contains).chain(any).collect()
}

/// Files directly inside `dir` matching `patterns`, in pattern order.
/// Ties within one pattern are broken by file name.
pub fn matches_in_dir(dir: &Path, patterns: &[CoverPattern], include_hidden: bool) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            debug!(dir = %dir.display(), error = %err, "cannot list directory for covers");
            return Vec::new();
        }
    };

    let mut files: Vec<(String, PathBuf)> = entries
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file() && (include_hidden || !is_hidden(p)))
        .filter_map(|p| {
            let name = p.file_name()?.to_str()?.to_string();
            Some((name, p))
        })
        .collect();
    files.sort();

    let mut out: Vec<PathBuf> = Vec::new();
    for pattern in patterns {
        for (name, path) in &files {
            if pattern.matches(name) && !out.contains(path) {
                out.push(path.clone());
            }
        }
    }
    out
}

/// Cover candidates for one tree, computed once per pass.
#[derive(Debug, Clone)]
pub struct CoverCandidates {
    patterns: Vec<CoverPattern>,
    include_hidden: bool,
    root_matches: Vec<PathBuf>,
    anywhere: Vec<PathBuf>,
}

impl CoverCandidates {
    pub fn discover(root: &Path, settings: &LibrarySettings) -> Self {
        let patterns = cover_patterns();
        let root_matches = matches_in_dir(root, &patterns, settings.include_hidden);
        let anywhere = find_images(root, settings);
        debug!(
            root = %root.display(),
            at_root = root_matches.len(),
            total = anywhere.len(),
            "cover candidates discovered"
        );
        Self {
            patterns,
            include_hidden: settings.include_hidden,
            root_matches,
            anywhere,
        }
    }

    /// Whether the tree holds any image at all.
    pub fn has_images(&self) -> bool {
        !self.anywhere.is_empty()
    }

    /// Precedence-ordered candidates for `dir`: its own matches, then the
    /// tree root's, then any image in the tree.
    pub fn for_directory(&self, dir: &Path) -> Vec<PathBuf> {
        let mut out = matches_in_dir(dir, &self.patterns, self.include_hidden);
        out.extend(self.root_matches.iter().cloned());
        out.extend(self.anywhere.iter().cloned());
        out
    }

    pub fn select(&self, dir: &Path) -> Option<PathBuf> {
        if !self.has_images() {
            return None;
        }
        self.for_directory(dir).into_iter().next()
    }
}
