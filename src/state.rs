//! Watermarks kept between runs, one per reconciled root.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::StateSettings;
use crate::error::StateError;
use crate::reconcile::Watermark;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StateData {
    #[serde(default)]
    watermarks: BTreeMap<String, Watermark>,
}

/// TOML file mapping root paths to the watermark of their last pass.
#[derive(Debug)]
pub struct StateFile {
    path: PathBuf,
    data: StateData,
}

impl StateFile {
    /// Load from `path`; a missing file is an empty state.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StateError> {
        let path = path.into();
        let data = match fs::read_to_string(&path) {
            Ok(raw) => toml::from_str(&raw).map_err(|source| StateError::Parse {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => StateData::default(),
            Err(source) => return Err(StateError::Io { path, source }),
        };
        debug!(state = %path.display(), roots = data.watermarks.len(), "loaded state");
        Ok(Self { path, data })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn key(root: &Path) -> String {
        root.to_string_lossy().into_owned()
    }

    pub fn get(&self, root: &Path) -> Option<Watermark> {
        self.data.watermarks.get(&Self::key(root)).copied()
    }

    pub fn set(&mut self, root: &Path, watermark: Watermark) {
        self.data.watermarks.insert(Self::key(root), watermark);
    }

    pub fn save(&self) -> Result<(), StateError> {
        let io_err = |source| StateError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let raw = toml::to_string(&self.data).map_err(|source| StateError::Serialize {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, raw).map_err(io_err)
    }
}

/// `state.path` if configured, else the XDG default.
pub fn resolve_state_path(settings: &StateSettings) -> Option<PathBuf> {
    settings.path.clone().or_else(default_state_path)
}

/// `$XDG_STATE_HOME/tagwright/state.toml`, or
/// `~/.local/state/tagwright/state.toml` when `XDG_STATE_HOME` is not set.
pub fn default_state_path() -> Option<PathBuf> {
    let state_home = if let Some(xdg) = env::var_os("XDG_STATE_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".local").join("state"))
    };

    state_home.map(|d| d.join("tagwright").join("state.toml"))
}
