use std::path::PathBuf;

use serde::Deserialize;

/// Top-level settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/tagwright/config.toml` or `~/.config/tagwright/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `TAGWRIGHT__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub library: LibrarySettings,
    pub cover: CoverSettings,
    pub logging: LoggingSettings,
    pub state: StateSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            follow_links: true,
            include_hidden: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CoverSettings {
    /// Embedded covers are downscaled to fit this box (pixels).
    pub max_width: u32,
    pub max_height: u32,
}

impl Default for CoverSettings {
    fn default() -> Self {
        Self {
            max_width: 600,
            max_height: 600,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `tracing` filter directive used when `RUST_LOG` is not set.
    ///
    /// Example: "info" or "tagwright=debug"
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StateSettings {
    /// Where watermarks are kept between runs. Defaults to
    /// `$XDG_STATE_HOME/tagwright/state.toml`.
    pub path: Option<PathBuf>,
    /// File name of the per-tree reconciliation index, created at the root
    /// of every reconciled tree.
    pub index_file_name: String,
}

impl Default for StateSettings {
    fn default() -> Self {
        Self {
            path: None,
            index_file_name: ".tagwright-index.toml".to_string(),
        }
    }
}
