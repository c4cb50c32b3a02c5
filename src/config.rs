use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::application::cart_store::DEFAULT_CART_KEY;
use crate::application::session::QuantityPolicy;
use crate::errors::AppError;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000/api";
pub const DEFAULT_STORAGE_PATH: &str = "cart_storage.json";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_base_url: String,
    pub storage_path: PathBuf,
    pub storage_key: String,
    pub quantity_policy: QuantityPolicy,
    pub http_timeout: Option<Duration>,
}

impl Config {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to pick
    /// up a `.env` file.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let quantity_policy = match lookup("CART_QUANTITY_POLICY") {
            Some(raw) => raw.parse().map_err(AppError::Config)?,
            None => QuantityPolicy::default(),
        };
        let http_timeout = match lookup("HTTP_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    AppError::Config(format!("HTTP_TIMEOUT_SECS must be a number, got '{}'", raw))
                })?;
                (secs > 0).then(|| Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            api_base_url: lookup("API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            storage_path: lookup("CART_STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_PATH)),
            storage_key: lookup("CART_STORAGE_KEY").unwrap_or_else(|| DEFAULT_CART_KEY.to_string()),
            quantity_policy,
            http_timeout,
        })
    }
}
