use std::env;
use std::path::{Path, PathBuf};

use crate::config::{ConfigError, Settings};

pub const SETTINGS_FILE: &str = "topograph.toml";
pub const CONFIG_ENV: &str = "TOPOGRAPH_CONFIG";
pub const GRAPHS_DIR_ENV: &str = "TOPOGRAPH_GRAPHS_DIR";

/// Resolves settings from `--config`, then `TOPOGRAPH_CONFIG`, then the
/// nearest `topograph.toml` above `start`. Falls back to defaults when no
/// file is found by the search; an explicitly named file must exist.
pub fn load_settings_with_overrides(
    start: impl AsRef<Path>,
    config_path: Option<PathBuf>,
) -> Result<Settings, ConfigError> {
    let explicit = config_path.or_else(|| env::var(CONFIG_ENV).ok().map(PathBuf::from));
    let mut settings = match explicit {
        Some(path) => load_settings_file(&path)?,
        None => match find_settings_from(start.as_ref()) {
            Some(path) => load_settings_file(&path)?,
            None => Settings::default(),
        },
    };

    if let Ok(dir) = env::var(GRAPHS_DIR_ENV) {
        if !dir.trim().is_empty() {
            settings.defaults.graphs_dir = dir;
        }
    }

    Ok(settings)
}

pub fn load_settings_file(path: &Path) -> Result<Settings, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
    }

    let contents = std::fs::read_to_string(path)?;
    toml::from_str(&contents).map_err(|source| ConfigError::Toml {
        path: path.to_path_buf(),
        source,
    })
}

fn find_settings_from(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|ancestor| ancestor.join(SETTINGS_FILE))
        .find(|candidate| candidate.is_file())
}
