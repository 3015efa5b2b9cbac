/// Application configuration
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tunedeck_catalog::{CatalogConfig, VideoConfig};
use tunedeck_library::LibraryConfig;
use tunedeck_playback::PlaybackConfig;

use crate::simulated::SimulatedConfig;

const DEFAULT_CONFIG_FILE: &str = "tunedeck.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub log: LogSettings,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub video: VideoConfig,

    #[serde(default)]
    pub library: LibraryConfig,

    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default)]
    pub session: SimulatedConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogSettings {
    /// `EnvFilter` directives used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "tunedeck=info".to_string()
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `tunedeck.toml` in the working
    /// directory is used when present. `TUNEDECK_*` variables override both,
    /// with `__` between nesting levels (`TUNEDECK_CATALOG__CLIENT_ID`).
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("TUNEDECK")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Check that the credentials a command needs are present
    pub fn require_catalog(&self) -> anyhow::Result<()> {
        if self.catalog.client_id.trim().is_empty() {
            anyhow::bail!(
                "catalog.client_id is not set (use {DEFAULT_CONFIG_FILE} or TUNEDECK_CATALOG__CLIENT_ID)"
            );
        }
        Ok(())
    }

    /// Check that the credentials a command needs are present
    pub fn require_video(&self) -> anyhow::Result<()> {
        if self.video.api_key.trim().is_empty() {
            anyhow::bail!(
                "video.api_key is not set (use {DEFAULT_CONFIG_FILE} or TUNEDECK_VIDEO__API_KEY)"
            );
        }
        Ok(())
    }
}
