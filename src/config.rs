//! Runtime configuration resolved from the command line.

use std::path::PathBuf;
use std::time::Duration;

use crate::api::API_BASE;
use crate::cards::TCG_API_BASE;

pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
const STORAGE_FILE: &str = "storage.json";

#[derive(Clone, Debug)]
pub struct LookupConfig {
    pub api_base: String,
    pub tcg_base: String,
    /// Sent as `X-Api-Key`. The card API also answers without one, with a
    /// lower rate limit.
    pub tcg_api_key: Option<String>,
    pub data_dir: PathBuf,
    pub timeout: Duration,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            api_base: API_BASE.to_string(),
            tcg_base: TCG_API_BASE.to_string(),
            tcg_api_key: None,
            data_dir: default_data_dir(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl LookupConfig {
    pub fn storage_path(&self) -> PathBuf {
        self.data_dir.join(STORAGE_FILE)
    }

    pub fn http_client(&self) -> reqwest::Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("pokelookup/", env!("CARGO_PKG_VERSION")))
            .build()
    }
}

pub fn default_data_dir() -> PathBuf {
    dirs_next::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pokelookup")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LookupConfig::default();
        assert_eq!(config.api_base, "https://pokeapi.co/api/v2");
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert!(config.storage_path().ends_with("pokelookup/storage.json"));
    }
}
