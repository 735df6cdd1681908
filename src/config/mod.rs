mod file_config;

pub use file_config::FileConfig;

use anyhow::{bail, Result};
use std::path::PathBuf;

pub const DEFAULT_SONG_DATA_PATH: &str = "data/song_data";
pub const DEFAULT_LOG_DATA_PATH: &str = "data/log_data";
pub const DEFAULT_DB_PATH: &str = "sparkifydb.sqlite";

/// CLI arguments that can be used for config resolution.
/// Unset paths fall back to the TOML file, then to the defaults.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub song_data_path: Option<PathBuf>,
    pub log_data_path: Option<PathBuf>,
    pub db_path: Option<PathBuf>,
    pub reset: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EtlConfig {
    pub song_data_path: PathBuf,
    pub log_data_path: PathBuf,
    pub db_path: PathBuf,
    /// Drop and recreate all tables before loading.
    pub reset: bool,
}

impl EtlConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let song_data_path = file
            .song_data_path
            .map(PathBuf::from)
            .or_else(|| cli.song_data_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SONG_DATA_PATH));
        let log_data_path = file
            .log_data_path
            .map(PathBuf::from)
            .or_else(|| cli.log_data_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DATA_PATH));
        let db_path = file
            .db_path
            .map(PathBuf::from)
            .or_else(|| cli.db_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));
        let reset = file.reset.unwrap_or(cli.reset);

        for (name, dir) in [("song data", &song_data_path), ("log data", &log_data_path)] {
            if !dir.exists() {
                bail!("The {} directory does not exist: {:?}", name, dir);
            }
            if !dir.is_dir() {
                bail!("The {} path is not a directory: {:?}", name, dir);
            }
        }

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.is_dir() {
                bail!("Database directory does not exist: {:?}", parent);
            }
        }

        Ok(Self {
            song_data_path,
            log_data_path,
            db_path,
            reset,
        })
    }
}
