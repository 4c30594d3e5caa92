//! Application configuration, read from an optional TOML file.
//!
//! Every field has a default, so a missing file or a partial one is fine.
//! `$FLASHCARDS_CONFIG` points at an alternative config file and
//! `$FLASHCARDS_DIR` overrides the flash directory.

use crate::error::{Error, Result};
use crate::models::LoadOptions;
use crate::models::deck::DEFAULT_AGGRESSIVENESS;
use crate::storage::DECK_EXTENSION;
use serde::Deserialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "FLASHCARDS_CONFIG";
pub const FLASH_DIR_ENV: &str = "FLASHCARDS_DIR";
pub const SESSION_FILE_NAME: &str = "persistenceData.sqlite3";

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root searched recursively for deck files
    pub flash_dir: PathBuf,
    /// Filename suffix identifying deck files
    pub extension: String,
    /// SQLite file remembering UI state; defaults to a file inside `flash_dir`
    pub session_file: Option<PathBuf>,
    pub default_aggressiveness: f64,
    pub confirm_on_quit: bool,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            flash_dir: default_flash_dir(),
            extension: DECK_EXTENSION.to_string(),
            session_file: None,
            default_aggressiveness: DEFAULT_AGGRESSIVENESS,
            confirm_on_quit: true,
            window_width: 500.0,
            window_height: 400.0,
        }
    }
}

pub fn default_flash_dir() -> PathBuf {
    if let Some(documents) = dirs::document_dir() {
        documents.join("flash")
    } else {
        PathBuf::from("flash")
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("flashcards").join("config.toml"))
}

impl Config {
    /// Reads the config file named by the environment, or the default one.
    pub fn load() -> Self {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .or_else(default_config_path);
        Self::load_from(path, std::env::var_os(FLASH_DIR_ENV))
    }

    /// Reads `config_path` if it exists, falling back to defaults (with a
    /// logged error) if it cannot be used. `flash_dir_override` wins over the
    /// file's `flash_dir`.
    pub fn load_from(config_path: Option<PathBuf>, flash_dir_override: Option<OsString>) -> Self {
        let mut config = match config_path {
            Some(path) if path.exists() => Self::from_file(&path).unwrap_or_else(|e| {
                log::error!("Ignoring config {}: {}", path.display(), e);
                Config::default()
            }),
            _ => Config::default(),
        };

        if let Some(dir) = flash_dir_override {
            config.flash_dir = PathBuf::from(dir);
        }
        config
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config = Self::from_toml_str(&text)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn session_path(&self) -> PathBuf {
        self.session_file
            .clone()
            .unwrap_or_else(|| self.flash_dir.join(SESSION_FILE_NAME))
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            extension: self.extension.clone(),
            default_aggressiveness: self.default_aggressiveness,
        }
    }
}
