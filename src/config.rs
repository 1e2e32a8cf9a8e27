use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::source::VK_API_URL;
use crate::storage::DISK_API_URL;
use crate::types::Album;

/// VK API version used when the config file doesn't pin one.
pub const DEFAULT_VK_API_VERSION: &str = "5.199";

const VK_TOKEN_KEY: &str = "VK_TOKEN";
const YA_TOKEN_KEY: &str = "YA_TOKEN";
const VK_API_VERSION_KEY: &str = "VK_API_VERSION";
const VK_API_URL_KEY: &str = "VK_API_URL";
const DISK_API_URL_KEY: &str = "YA_DISK_API_URL";

/// Startup errors. All of them abort the run before any network call.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    MissingFile(PathBuf),

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: dotenvy::Error,
    },

    #[error("{key} is missing or empty in {path}")]
    MissingToken { key: &'static str, path: PathBuf },

    #[error("Destination folder name must not be empty")]
    EmptyFolder,
}

/// Application configuration.
pub struct Config {
    pub vk_token: String,
    pub ya_token: String,
    pub vk_api_version: String,
    pub vk_api_url: String,
    pub disk_api_url: String,
    pub account: Option<String>,
    pub folder: String,
    pub size_tag: String,
    pub staging_dir: Option<PathBuf>,

    pub count: u32,
    pub album: Album,

    pub dry_run: bool,
    pub no_progress_bar: bool,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("vk_token", &"<redacted>")
            .field("ya_token", &"<redacted>")
            .field("vk_api_version", &self.vk_api_version)
            .field("vk_api_url", &self.vk_api_url)
            .field("disk_api_url", &self.disk_api_url)
            .field("account", &self.account)
            .field("folder", &self.folder)
            .field("size_tag", &self.size_tag)
            .field("count", &self.count)
            .field("album", &self.album)
            .field("dry_run", &self.dry_run)
            .finish_non_exhaustive()
    }
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

/// Read every `KEY=value` pair from the token file without touching the
/// process environment.
fn load_token_file(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::MissingFile(path.to_path_buf()));
    }
    let read_err = |source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    };
    let mut values = HashMap::new();
    for item in dotenvy::from_path_iter(path).map_err(read_err)? {
        let (key, value) = item.map_err(read_err)?;
        values.insert(key, value);
    }
    Ok(values)
}

/// An optional key, falling back to `default` when absent or blank.
fn optional_value(values: &mut HashMap<String, String>, key: &str, default: &str) -> String {
    values
        .remove(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn require_token(
    values: &mut HashMap<String, String>,
    key: &'static str,
    path: &Path,
) -> Result<String, ConfigError> {
    match values.remove(key) {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(ConfigError::MissingToken {
            key,
            path: path.to_path_buf(),
        }),
    }
}

impl Config {
    pub fn from_cli(cli: crate::cli::Cli) -> Result<Self, ConfigError> {
        let config_path = expand_tilde(&cli.config);
        let mut values = load_token_file(&config_path)?;
        let vk_token = require_token(&mut values, VK_TOKEN_KEY, &config_path)?;
        let ya_token = require_token(&mut values, YA_TOKEN_KEY, &config_path)?;
        let vk_api_version =
            optional_value(&mut values, VK_API_VERSION_KEY, DEFAULT_VK_API_VERSION);
        let vk_api_url = optional_value(&mut values, VK_API_URL_KEY, VK_API_URL);
        let disk_api_url = optional_value(&mut values, DISK_API_URL_KEY, DISK_API_URL);

        let folder = cli.folder.trim_matches('/').to_string();
        if folder.is_empty() {
            return Err(ConfigError::EmptyFolder);
        }

        let account = cli
            .user
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());

        Ok(Self {
            vk_token,
            ya_token,
            vk_api_version,
            vk_api_url,
            disk_api_url,
            account,
            folder,
            size_tag: cli.size,
            staging_dir: cli.staging_dir.map(|d| expand_tilde(&d)),
            count: cli.count,
            album: cli.album,
            dry_run: cli.dry_run,
            no_progress_bar: cli.no_progress_bar,
        })
    }
}
