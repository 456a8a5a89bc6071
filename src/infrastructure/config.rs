//! Application configuration
//!
//! Layered: built-in defaults, then an optional `novel-wizard.toml`, then
//! `NOVEL_WIZARD_*` environment variables (after `.env` has been loaded).

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::application::services::navigation_guard::DEFAULT_UNSAVED_MESSAGE;
use crate::application::services::session_gate::{DEFAULT_LOGIN_PATH, DEFAULT_SIGN_OUT_REDIRECT};
use crate::application::state::AUTOSAVE_INTERVAL;

pub const DEFAULT_CONFIG_FILE: &str = "novel-wizard.toml";
const ENV_PREFIX: &str = "NOVEL_WIZARD";

/// Where slices are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process memory; nothing survives a restart
    Memory,
    /// One JSON file per slice under `storage_dir`
    File,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AppConfig {
    pub storage_backend: StorageBackend,
    pub storage_dir: PathBuf,
    pub autosave_interval_ms: u64,
    /// Text offered to the leave-page confirmation
    pub unload_message: String,
    pub login_path: String,
    /// Where to send the user once their session ends
    pub sign_out_redirect: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_backend: StorageBackend::Memory,
            storage_dir: PathBuf::from(".novel-wizard"),
            autosave_interval_ms: AUTOSAVE_INTERVAL.as_millis() as u64,
            unload_message: DEFAULT_UNSAVED_MESSAGE.to_string(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            sign_out_redirect: DEFAULT_SIGN_OUT_REDIRECT.to_string(),
        }
    }
}

impl AppConfig {
    /// Load from `novel-wizard.toml` in the working directory and the environment
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(DEFAULT_CONFIG_FILE))
    }

    /// Load with `path` as the (optional) config file
    pub fn load_from(path: &Path) -> Result<Self> {
        let defaults = Self::default();
        let config = Config::builder()
            .set_default("storage_backend", "memory")?
            .set_default("storage_dir", defaults.storage_dir.to_string_lossy().into_owned())?
            .set_default("autosave_interval_ms", defaults.autosave_interval_ms as i64)?
            .set_default("unload_message", defaults.unload_message)?
            .set_default("login_path", defaults.login_path)?
            .set_default("sign_out_redirect", defaults.sign_out_redirect)?
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?;

        let loaded: Self = config
            .try_deserialize()
            .context("Configuration has invalid values")?;
        loaded.validate()?;
        Ok(loaded)
    }

    pub fn autosave_interval(&self) -> Duration {
        Duration::from_millis(self.autosave_interval_ms)
    }

    fn validate(&self) -> Result<()> {
        if self.autosave_interval_ms == 0 {
            anyhow::bail!("autosave_interval_ms must be greater than zero");
        }
        for (name, path) in [
            ("login_path", &self.login_path),
            ("sign_out_redirect", &self.sign_out_redirect),
        ] {
            if !path.starts_with('/') {
                anyhow::bail!("{name} must be an absolute path, got {path:?}");
            }
        }
        Ok(())
    }
}
