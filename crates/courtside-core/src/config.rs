// Configuration loading and parsing (config/courtside.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the single configuration file under `config/`.
pub const CONFIG_FILE: &str = "courtside.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("neither config/courtside.toml nor defaults/courtside.toml found under {root:?}")]
    NoDefaults { root: PathBuf },

    #[error("failed to write {path}: {source}")]
    InitError {
        path: PathBuf,
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// courtside.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub data_paths: DataPaths,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    /// CSV of `id,name,abbreviation` team reference rows.
    pub teams: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Directory the log file is written to.
    pub dir: String,
    /// Default `tracing` filter directive; `RUST_LOG` overrides it.
    pub filter: String,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Path of the live config file under `base_dir`.
pub fn config_path(base_dir: &Path) -> PathBuf {
    base_dir.join("config").join(CONFIG_FILE)
}

/// Load and validate `config/courtside.toml` relative to `base_dir`.
/// Does not create anything; see [`init_config`].
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = config_path(base_dir);
    let text = read_file(&path)?;
    let config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    validate(&config)?;

    Ok(config)
}

/// Seed `config/courtside.toml` from `defaults/courtside.toml` on first run.
///
/// Returns the written path, or `None` when a config file is already present.
/// An existing config is never overwritten.
pub fn init_config(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = config_path(base_dir);
    if target.exists() {
        return Ok(None);
    }

    let source = base_dir.join("defaults").join(CONFIG_FILE);
    if !source.is_file() {
        return Err(ConfigError::NoDefaults {
            root: base_dir.to_path_buf(),
        });
    }

    let init_err = |e| ConfigError::InitError {
        path: target.clone(),
        source: e,
    };
    if let Some(dir) = target.parent() {
        std::fs::create_dir_all(dir).map_err(init_err)?;
    }
    std::fs::copy(&source, &target).map_err(init_err)?;
    Ok(Some(target))
}

/// `init_config` followed by `load_config_from`: what the binary runs at
/// startup for its `--root`.
pub fn load_or_init(base_dir: &Path) -> Result<Config, ConfigError> {
    init_config(base_dir)?;
    load_config_from(base_dir)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    let required: &[(&str, &str)] = &[
        ("database.path", config.database.path.as_str()),
        ("data_paths.teams", config.data_paths.teams.as_str()),
        ("logging.dir", config.logging.dir.as_str()),
        ("logging.filter", config.logging.filter.as_str()),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: field.to_string(),
                message: "must not be empty".into(),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
