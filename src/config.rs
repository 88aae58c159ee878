// ⚙️ Startup configuration from process environment

use crate::error::{Error, Result};
use crate::resolver::{DEFAULT_LOOKUP_TIMEOUT, DEFAULT_LOOKUP_URL};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub const TOKEN_VAR: &str = "TELEGRAM_TOKEN";
pub const PORT_VAR: &str = "PORT";
pub const DATA_PATH_VAR: &str = "BIN_DATA_PATH";
pub const ARCHIVE_PATH_VAR: &str = "BIN_ARCHIVE_PATH";
pub const LOOKUP_URL_VAR: &str = "BIN_LOOKUP_URL";
pub const LOOKUP_TIMEOUT_VAR: &str = "BIN_LOOKUP_TIMEOUT_SECS";
pub const TELEGRAM_API_VAR: &str = "TELEGRAM_API_URL";

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATA_PATH: &str = "data/bin-list-data.csv";
pub const DEFAULT_ARCHIVE_PATH: &str = "data/bin-list-data.zip";
pub const DEFAULT_TELEGRAM_API: &str = "https://api.telegram.org";

#[derive(Clone)]
pub struct Config {
    /// Bot access token. Never logged.
    pub token: String,
    pub port: u16,
    pub data_path: PathBuf,
    pub lookup_url: String,
    pub lookup_timeout: Duration,
    pub telegram_api_url: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("token", &"<redacted>")
            .field("port", &self.port)
            .field("data_path", &self.data_path)
            .field("lookup_url", &self.lookup_url)
            .field("lookup_timeout", &self.lookup_timeout)
            .field("telegram_api_url", &self.telegram_api_url)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; empty values count as unset
    pub fn from_vars<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| get(name).filter(|v| !v.trim().is_empty());

        let token = get(TOKEN_VAR).ok_or(Error::MissingCredential(TOKEN_VAR))?;

        let port = match get(PORT_VAR) {
            Some(raw) => raw.trim().parse().map_err(|_| Error::InvalidConfig {
                var: PORT_VAR,
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        let lookup_timeout = match get(LOOKUP_TIMEOUT_VAR) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(Error::InvalidConfig {
                        var: LOOKUP_TIMEOUT_VAR,
                        value: raw,
                    })
                }
            },
            None => DEFAULT_LOOKUP_TIMEOUT,
        };

        Ok(Config {
            token,
            port,
            data_path: get(DATA_PATH_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH)),
            lookup_url: get(LOOKUP_URL_VAR).unwrap_or_else(|| DEFAULT_LOOKUP_URL.to_string()),
            lookup_timeout,
            telegram_api_url: get(TELEGRAM_API_VAR)
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API.to_string()),
        })
    }

    /// Dataset path alone; needed before the token is checked
    pub fn data_path_from_env() -> PathBuf {
        path_from_env(DATA_PATH_VAR, DEFAULT_DATA_PATH)
    }

    /// Zipped dataset, unpacked to the data path on first start
    pub fn archive_path_from_env() -> PathBuf {
        path_from_env(ARCHIVE_PATH_VAR, DEFAULT_ARCHIVE_PATH)
    }
}

fn path_from_env(var: &str, default: &str) -> PathBuf {
    std::env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}
