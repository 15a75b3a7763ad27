use std::path::PathBuf;

use anyhow::Context;

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";
pub const DEFAULT_DATA_FILE: &str = "message-data.json";
pub const DEFAULT_UPLOAD_DIR: &str = "static";
pub const DEFAULT_APP_NAME: &str = "Web Comment Board";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    pub bind: String,
    pub data_file: PathBuf,
    pub upload_dir: PathBuf,
    pub app_name: String,
    pub max_upload_bytes: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            app_name: DEFAULT_APP_NAME.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl BoardConfig {
    /// Reads `BOARD_*` variables; call `dotenv` beforehand to pick up `.env`.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let max_upload_bytes: usize = match get("BOARD_MAX_UPLOAD_BYTES") {
            Some(v) => v
                .trim()
                .parse()
                .with_context(|| format!("BOARD_MAX_UPLOAD_BYTES is not a byte count: {}", v))?,
            None => defaults.max_upload_bytes,
        };

        Ok(Self {
            bind: get("BOARD_BIND").unwrap_or(defaults.bind),
            data_file: get("BOARD_DATA_FILE").map_or(defaults.data_file, PathBuf::from),
            upload_dir: get("BOARD_UPLOAD_DIR").map_or(defaults.upload_dir, PathBuf::from),
            app_name: get("BOARD_APP_NAME").unwrap_or(defaults.app_name),
            max_upload_bytes,
        })
    }
}
