use std::{env, path::PathBuf};

use crate::{errors::AppError, utils::is_valid_access_code};

lazy_static! {
    /// Process-wide configuration for the binary, read once from the environment.
    pub static ref CONFIG: Config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("FATAL: {}", e);
            ::std::process::exit(1);
        }
    };
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Field name: `DATABASE_URL`
    pub database_url: String,
    /// Field name: `HOST`
    pub host: String,
    /// Field name: `PORT`
    pub port: u16,
    /// Directory holding uploaded images. Field name: `UPLOAD_DIR`
    pub upload_dir: PathBuf,
    /// Directory holding the kiosk pages. Field name: `PUBLIC_DIR`
    pub public_dir: PathBuf,
    /// Four digit code unlocking the admin page. Field name: `ACCESS_CODE`
    pub access_code: String,
    /// Cookie signing key, at least 64 bytes. Field name: `SESSION_KEY`
    pub session_key: Option<String>,
    /// Per-file upload ceiling. Field name: `MAX_UPLOAD_BYTES`
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://technicians.db".to_owned(),
            host: "0.0.0.0".to_owned(),
            port: 3000,
            upload_dir: PathBuf::from("uploads"),
            public_dir: PathBuf::from("public"),
            access_code: "1234".to_owned(),
            session_key: None,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup, falling back to defaults for absent keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| AppError::ConfigError(format!("PORT '{}': {}", raw, e)))?,
            None => defaults.port,
        };
        let max_upload_bytes = match lookup("MAX_UPLOAD_BYTES") {
            Some(raw) => raw
                .parse::<usize>()
                .map_err(|e| AppError::ConfigError(format!("MAX_UPLOAD_BYTES '{}': {}", raw, e)))?,
            None => defaults.max_upload_bytes,
        };

        let access_code = lookup("ACCESS_CODE").unwrap_or(defaults.access_code);
        if !is_valid_access_code(&access_code) {
            return Err(AppError::ConfigError(
                "ACCESS_CODE must be exactly four digits".to_owned(),
            ));
        }

        let session_key = lookup("SESSION_KEY").filter(|key| !key.is_empty());
        if let Some(key) = &session_key {
            if key.len() < 64 {
                return Err(AppError::ConfigError(
                    "SESSION_KEY must be at least 64 bytes long".to_owned(),
                ));
            }
        }

        Ok(Self {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            upload_dir: lookup("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            public_dir: lookup("PUBLIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.public_dir),
            access_code,
            session_key,
            max_upload_bytes,
        })
    }
}
