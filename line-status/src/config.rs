//! Process configuration, read once from the environment at startup.

use std::path::PathBuf;

use crate::domain::{OperatorId, RailwayId};
use crate::odpt::OdptConfig;
use crate::preview::DEFAULT_LANG;
use crate::store::StoreConfig;

/// Standard-tier API base URL.
pub const STANDARD_BASE_URL: &str = "https://api.odpt.org/api/v4";

/// Challenge-tier API base URL.
pub const CHALLENGE_BASE_URL: &str = "https://api-challenge.odpt.org/api/v4";

/// Operators whose real-time data is only published on the challenge tier.
const CHALLENGE_OPERATORS: [&str; 3] = ["JR-East", "Tobu", "Keikyu"];

/// Railway previewed when `ODPT_RAILWAYS` is not set.
const DEFAULT_RAILWAY: &str = "odpt.Railway:JR-East.Yamanote";

const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {var}: {message}")]
pub struct ConfigError {
    pub var: &'static str,
    pub message: String,
}

impl ConfigError {
    fn new(var: &'static str, message: impl Into<String>) -> Self {
        Self {
            var,
            message: message.into(),
        }
    }
}

/// Which ODPT API deployment serves an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiTier {
    Standard,
    Challenge,
}

impl ApiTier {
    pub fn for_operator(operator: &OperatorId) -> Self {
        if CHALLENGE_OPERATORS
            .iter()
            .any(|name| operator.as_str().contains(name))
        {
            ApiTier::Challenge
        } else {
            ApiTier::Standard
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            ApiTier::Standard => STANDARD_BASE_URL,
            ApiTier::Challenge => CHALLENGE_BASE_URL,
        }
    }

    /// Environment variable holding this tier's consumer key.
    pub fn key_env(&self) -> &'static str {
        match self {
            ApiTier::Standard => "ODPT_CONSUMER_KEY",
            ApiTier::Challenge => "ODPT_CHALLENGE_CONSUMER_KEY",
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub operator: OperatorId,
    pub tier: ApiTier,
    /// Base URL without trailing slash
    pub base_url: String,
    pub consumer_key: Option<String>,
    /// Railways to preview, in output order
    pub railways: Vec<RailwayId>,
    /// Preferred language for line titles
    pub lang: String,
    /// Where raw responses are written
    pub data_dir: PathBuf,
    pub timeout_secs: u64,
    /// Render from the saved snapshot instead of fetching
    pub offline: bool,
}

impl AppConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through a lookup function.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let operator = match get("ODPT_OPERATOR") {
            Some(s) => {
                OperatorId::parse(&s).map_err(|e| ConfigError::new("ODPT_OPERATOR", e.to_string()))?
            }
            None => OperatorId::default(),
        };

        let tier = ApiTier::for_operator(&operator);

        let base_url = match tier {
            ApiTier::Challenge => get("ODPT_CHALLENGE_BASE_URL").or_else(|| get("ODPT_BASE_URL")),
            ApiTier::Standard => get("ODPT_BASE_URL"),
        }
        .unwrap_or_else(|| tier.default_base_url().to_string())
        .trim_end_matches('/')
        .to_string();

        // ODPT_COINSUMER_KEY is a misspelling found in deployed .env files.
        let standard_key = || get("ODPT_CONSUMER_KEY").or_else(|| get("ODPT_COINSUMER_KEY"));
        let consumer_key = match tier {
            ApiTier::Challenge => get("ODPT_CHALLENGE_CONSUMER_KEY").or_else(standard_key),
            ApiTier::Standard => standard_key(),
        };

        let railways = match get("ODPT_RAILWAYS") {
            Some(list) => parse_railways(&list)?,
            None => vec![RailwayId::parse(DEFAULT_RAILWAY).map_err(|e| {
                ConfigError::new("ODPT_RAILWAYS", e.to_string())
            })?],
        };

        let lang = get("ODPT_LANG").unwrap_or_else(|| DEFAULT_LANG.to_string());

        let data_dir = match get("ODPT_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => StoreConfig::for_operator(&operator).dir,
        };

        let timeout_secs = match get("ODPT_TIMEOUT_SECS") {
            Some(s) => match s.parse::<u64>() {
                Ok(0) => return Err(ConfigError::new("ODPT_TIMEOUT_SECS", "must be positive")),
                Ok(n) => n,
                Err(e) => return Err(ConfigError::new("ODPT_TIMEOUT_SECS", e.to_string())),
            },
            None => DEFAULT_TIMEOUT_SECS,
        };

        let offline = match get("ODPT_OFFLINE") {
            Some(s) => parse_flag(&s).ok_or_else(|| {
                ConfigError::new("ODPT_OFFLINE", format!("expected true/false, got {s:?}"))
            })?,
            None => false,
        };

        Ok(Self {
            operator,
            tier,
            base_url,
            consumer_key,
            railways,
            lang,
            data_dir,
            timeout_secs,
            offline,
        })
    }

    /// Configuration for the API client.
    pub fn client_config(&self) -> OdptConfig {
        let config = OdptConfig::new(&self.base_url, self.operator.clone())
            .with_key_env(self.tier.key_env())
            .with_timeout(self.timeout_secs);

        match &self.consumer_key {
            Some(key) => config.with_consumer_key(key),
            None => config,
        }
    }

    /// Configuration for the snapshot store.
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::for_operator(&self.operator).with_dir(&self.data_dir)
    }
}

fn parse_railways(list: &str) -> Result<Vec<RailwayId>, ConfigError> {
    let railways: Vec<RailwayId> = list
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(RailwayId::parse)
        .collect::<Result<_, _>>()
        .map_err(|e| ConfigError::new("ODPT_RAILWAYS", e.to_string()))?;

    if railways.is_empty() {
        return Err(ConfigError::new("ODPT_RAILWAYS", "no railway ids given"));
    }

    Ok(railways)
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::Path;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let env: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.operator.as_str(), "odpt.Operator:JR-East");
        assert_eq!(config.tier, ApiTier::Challenge);
        assert_eq!(config.base_url, CHALLENGE_BASE_URL);
        assert_eq!(config.consumer_key, None);
        assert_eq!(config.railways.len(), 1);
        assert_eq!(config.railways[0].as_str(), "odpt.Railway:JR-East.Yamanote");
        assert_eq!(config.lang, "ja");
        assert_eq!(config.data_dir, Path::new("odpt_data_jreast"));
        assert_eq!(config.timeout_secs, 15);
        assert!(!config.offline);
    }

    #[test]
    fn tier_by_operator() {
        let op = |s: &str| OperatorId::parse(s).unwrap();
        assert_eq!(ApiTier::for_operator(&op("odpt.Operator:JR-East")), ApiTier::Challenge);
        assert_eq!(ApiTier::for_operator(&op("odpt.Operator:Tobu")), ApiTier::Challenge);
        assert_eq!(ApiTier::for_operator(&op("odpt.Operator:Keikyu")), ApiTier::Challenge);
        assert_eq!(ApiTier::for_operator(&op("odpt.Operator:Toei")), ApiTier::Standard);
        assert_eq!(ApiTier::for_operator(&op("odpt.Operator:TokyoMetro")), ApiTier::Standard);
    }

    #[test]
    fn standard_operator_uses_standard_url_and_key() {
        let config = load(&[
            ("ODPT_OPERATOR", "odpt.Operator:Toei"),
            ("ODPT_CONSUMER_KEY", "std-key"),
            ("ODPT_CHALLENGE_CONSUMER_KEY", "challenge-key"),
        ])
        .unwrap();

        assert_eq!(config.tier, ApiTier::Standard);
        assert_eq!(config.base_url, STANDARD_BASE_URL);
        assert_eq!(config.consumer_key.as_deref(), Some("std-key"));
        assert_eq!(config.data_dir, Path::new("odpt_data_toei"));
    }

    #[test]
    fn challenge_key_falls_back_to_standard_key() {
        let config = load(&[("ODPT_CONSUMER_KEY", "std-key")]).unwrap();
        assert_eq!(config.consumer_key.as_deref(), Some("std-key"));

        let config = load(&[
            ("ODPT_CONSUMER_KEY", "std-key"),
            ("ODPT_CHALLENGE_CONSUMER_KEY", "challenge-key"),
        ])
        .unwrap();
        assert_eq!(config.consumer_key.as_deref(), Some("challenge-key"));
    }

    #[test]
    fn misspelled_key_variable_is_accepted() {
        let config = load(&[
            ("ODPT_OPERATOR", "odpt.Operator:Toei"),
            ("ODPT_COINSUMER_KEY", "typo-key"),
        ])
        .unwrap();
        assert_eq!(config.consumer_key.as_deref(), Some("typo-key"));
    }

    #[test]
    fn blank_values_are_unset() {
        let config = load(&[("ODPT_CONSUMER_KEY", "   "), ("ODPT_BASE_URL", "")]).unwrap();
        assert_eq!(config.consumer_key, None);
        assert_eq!(config.base_url, CHALLENGE_BASE_URL);
    }

    #[test]
    fn base_url_override_strips_trailing_slash() {
        let config = load(&[("ODPT_BASE_URL", "https://api-challenge.odpt.org/api/v4/")]).unwrap();
        assert_eq!(config.base_url, "https://api-challenge.odpt.org/api/v4");

        let config = load(&[
            ("ODPT_BASE_URL", "http://ignored"),
            ("ODPT_CHALLENGE_BASE_URL", "http://challenge.local/"),
        ])
        .unwrap();
        assert_eq!(config.base_url, "http://challenge.local");
    }

    #[test]
    fn railway_list() {
        let config = load(&[(
            "ODPT_RAILWAYS",
            "odpt.Railway:JR-East.Yamanote, odpt.Railway:JR-East.ChuoRapid,,",
        )])
        .unwrap();

        let ids: Vec<&str> = config.railways.iter().map(RailwayId::as_str).collect();
        assert_eq!(
            ids,
            vec!["odpt.Railway:JR-East.Yamanote", "odpt.Railway:JR-East.ChuoRapid"]
        );
    }

    #[test]
    fn empty_railway_list_is_rejected() {
        let err = load(&[("ODPT_RAILWAYS", ", ,")]).unwrap_err();
        assert_eq!(err.var, "ODPT_RAILWAYS");
    }

    #[test]
    fn invalid_timeout_is_rejected() {
        assert_eq!(
            load(&[("ODPT_TIMEOUT_SECS", "soon")]).unwrap_err().var,
            "ODPT_TIMEOUT_SECS"
        );
        assert_eq!(
            load(&[("ODPT_TIMEOUT_SECS", "0")]).unwrap_err().var,
            "ODPT_TIMEOUT_SECS"
        );
        assert_eq!(
            load(&[("ODPT_TIMEOUT_SECS", "30")]).unwrap().timeout_secs,
            30
        );
    }

    #[test]
    fn offline_flag() {
        assert!(load(&[("ODPT_OFFLINE", "1")]).unwrap().offline);
        assert!(load(&[("ODPT_OFFLINE", "TRUE")]).unwrap().offline);
        assert!(!load(&[("ODPT_OFFLINE", "no")]).unwrap().offline);
        assert!(load(&[("ODPT_OFFLINE", "maybe")]).is_err());
    }

    #[test]
    fn client_config_carries_tier_key_env() {
        let config = load(&[("ODPT_CHALLENGE_CONSUMER_KEY", "k"), ("ODPT_TIMEOUT_SECS", "5")]).unwrap();
        let client = config.client_config();

        assert_eq!(client.base_url, CHALLENGE_BASE_URL);
        assert_eq!(client.consumer_key.as_deref(), Some("k"));
        assert_eq!(client.key_env, "ODPT_CHALLENGE_CONSUMER_KEY");
        assert_eq!(client.timeout_secs, 5);
    }

    #[test]
    fn store_config_uses_data_dir_and_slug() {
        let config = load(&[("ODPT_DATA_DIR", "/tmp/snapshots")]).unwrap();
        let store = config.store_config();

        assert_eq!(store.dir, Path::new("/tmp/snapshots"));
        assert_eq!(store.prefix, "jreast");
    }
}
