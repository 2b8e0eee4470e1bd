//! Typed configuration from environment variables.
//!
//! Nothing is required: every setting has a default. A value that is set
//! but not valid unicode is a configuration error.

pub mod secrets;

use std::path::PathBuf;

use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct Config {
    /// Filter directive used when `RUST_LOG` is unset.
    pub log_level: String,
    pub otel_endpoint: Option<String>,
    /// TOML roster to authenticate against instead of the built-in one.
    pub users_file: Option<PathBuf>,
    pub service_name: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In local dev, call `dotenvy::dotenv().ok()` before this.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            log_level: optional_var("LOG_LEVEL")?.unwrap_or_else(|| "info".to_string()),
            otel_endpoint: optional_var("OTEL_ENDPOINT")?,
            users_file: optional_var("EVENTDESK_USERS")?.map(PathBuf::from),
            service_name: optional_var("EVENTDESK_SERVICE_NAME")?
                .unwrap_or_else(|| "eventdesk".to_string()),
        })
    }
}

fn optional_var(name: &str) -> Result<Option<String>> {
    match std::env::var(name) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(std::env::VarError::NotUnicode(_)) => Err(Error::Config(format!(
            "environment variable {name} is not valid unicode"
        ))),
    }
}
