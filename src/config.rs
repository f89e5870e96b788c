use std::env;
use std::path::PathBuf;

use crate::db::LogStore;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
    pub cors_extra_origins: Vec<String>,

    /// `None` runs with storage unavailable
    pub storage_path: Option<PathBuf>,
    pub storage_key: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8080,
            frontend_url: "http://localhost:5173".into(),
            cors_extra_origins: Vec::new(),
            storage_path: Some(PathBuf::from("data/local_storage.json")),
            storage_key: LogStore::DEFAULT_KEY.into(),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|e| anyhow::anyhow!("PORT must be a number: {e}"))?,
            Err(_) => defaults.port,
        };

        let storage_path = match env::var("STORAGE_PATH") {
            Ok(raw) => parse_storage_path(&raw),
            Err(_) => defaults.storage_path,
        };

        Ok(Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port,
            frontend_url: env::var("FRONTEND_URL").unwrap_or(defaults.frontend_url),
            cors_extra_origins: env::var("CORS_EXTRA_ORIGINS")
                .map(|raw| parse_origins(&raw))
                .unwrap_or_default(),
            storage_path,
            storage_key: env::var("STORAGE_KEY")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.storage_key),
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_storage_path(raw: &str) -> Option<PathBuf> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(PathBuf::from(raw))
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect()
}
