//! Configuration loading and management.

use std::path::{Path, PathBuf};

use dt_core::{EstimatorConfig, OffsetMode};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Gap classification and extrapolation rules.
    pub estimator: EstimatorConfig,

    /// How UTC offsets on commit timestamps are treated.
    pub offset_mode: OffsetMode,

    /// Read commits from every ref (`git log --all`) rather than `HEAD` only.
    pub all_refs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            estimator: EstimatorConfig::default(),
            offset_mode: OffsetMode::default(),
            all_refs: true,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    ///
    /// Later sources win: defaults, `~/.config/devtime/config.toml`, the
    /// given file, then `DEVTIME_*` environment variables (nested keys are
    /// separated by `__`, e.g. `DEVTIME_ESTIMATOR__BREAK_THRESHOLD_SECS`).
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("DEVTIME_").split("__"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for devtime.
///
/// On Linux: `~/.config/devtime`
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("devtime"))
}
