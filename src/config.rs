//! Runtime configuration.
//!
//! Values come from, in increasing priority:
//! 1. built-in defaults
//! 2. `folio.toml` in the user config directory (every key optional)
//! 3. the `FOLIO_DB` environment variable
//! 4. the `--db` command line flag

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use tracing::debug;

use crate::models::DEFAULT_ASSET_ROOT;

const CONFIG_FILE: &str = "folio.toml";
const DATABASE_FILE: &str = "folio.sqlite";
const APP_NAME: &str = "folio";

pub const DB_ENV_VAR: &str = "FOLIO_DB";

/// Photographers shown first on the home page, in this order.
pub const DEFAULT_FEATURED: [i64; 6] = [243, 930, 82, 527, 925, 195];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Config {
    pub database: PathBuf,
    pub asset_root: String,
    pub featured: Vec<i64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database_path(),
            asset_root: DEFAULT_ASSET_ROOT.to_string(),
            featured: DEFAULT_FEATURED.to_vec(),
        }
    }
}

impl Config {
    /// Load the config file (if any), then apply environment and flag overrides.
    pub fn load(db_flag: Option<PathBuf>) -> Result<Self> {
        let mut config = match default_config_path() {
            Some(path) if path.exists() => load_from_path(&path)?,
            _ => Config::default(),
        };
        config.apply_overrides(std::env::var_os(DB_ENV_VAR).map(PathBuf::from), db_flag);
        Ok(config)
    }

    fn apply_overrides(&mut self, env_db: Option<PathBuf>, db_flag: Option<PathBuf>) {
        if let Some(path) = db_flag.or(env_db) {
            self.database = path;
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", APP_NAME)
}

fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

fn default_database_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join(DATABASE_FILE))
        .unwrap_or_else(|| PathBuf::from(DATABASE_FILE))
}

pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;
    debug!(?path, "Loaded config");
    Ok(config)
}
