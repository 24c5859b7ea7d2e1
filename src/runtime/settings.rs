use tagwright::config::{Settings, resolve_config_path};
use tracing::warn;

/// Settings for this run. `fallback` says why the defaults stand in for
/// the configured values, when they do.
pub struct LoadedSettings {
    pub settings: Settings,
    pub fallback: Option<String>,
}

impl LoadedSettings {
    /// Log the fallback, if any. Call once logging is up.
    pub fn warn_on_fallback(&self) {
        if let Some(reason) = &self.fallback {
            let path = resolve_config_path();
            warn!(
                config = ?path.as_deref(),
                %reason,
                "config not usable, running with defaults"
            );
        }
    }
}

pub fn load_settings() -> LoadedSettings {
    settle(Settings::load())
}

/// Keep loaded settings that validate; anything else becomes the defaults
/// plus the reason.
fn settle(loaded: Result<Settings, ::config::ConfigError>) -> LoadedSettings {
    let fallback = match loaded {
        Ok(settings) => match settings.validate() {
            Ok(()) => {
                return LoadedSettings {
                    settings,
                    fallback: None,
                };
            }
            Err(msg) => format!("invalid config: {msg}"),
        },
        Err(e) => format!("failed to load config: {e}"),
    };
    LoadedSettings {
        settings: Settings::default(),
        fallback: Some(fallback),
    }
}
