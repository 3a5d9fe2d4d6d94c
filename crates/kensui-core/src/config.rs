//! TOML-based application configuration.
//!
//! Stores:
//! - The daily set quota and the day-boundary offset
//! - The signed-in account id, if any
//! - Remote store endpoint settings
//!
//! Configuration is stored at `~/.config/kensui/config.toml`. The
//! remote id token is deliberately not here; it lives in the OS
//! keyring (see [`crate::session::credentials`]).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::achievement::DEFAULT_DAILY_TARGET;
use crate::daykey::DayClock;
use crate::error::{ConfigError, Result};
use crate::session::AccountId;
use crate::store::{data_dir, RemoteConfig};

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/kensui/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Sets per day needed for the day to count as achieved.
    #[serde(default = "default_daily_target")]
    pub daily_target: u32,
    /// Fixed UTC offset (hours) of the day boundary. Every device an
    /// account uses must agree on this value.
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
    /// Signed-in account id; absent means guest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(default)]
    pub remote: RemoteConfig,
}

// Default functions
fn default_daily_target() -> u32 {
    DEFAULT_DAILY_TARGET
}
// The hosted deployment ships for the Japanese market.
fn default_utc_offset_hours() -> i32 {
    9
}

impl Default for Config {
    fn default() -> Self {
        Self {
            daily_target: default_daily_target(),
            utc_offset_hours: default_utc_offset_hours(),
            account_id: None,
            remote: RemoteConfig::default(),
        }
    }
}

impl Config {
    /// Where the config file lives on this installation.
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing the default config on first run.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be
    /// parsed, or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content)
                    .map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    pub fn save(&self) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeFailed(e.to_string()))?;
        std::fs::write(Self::path()?, content)?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Get a config value as a string by key.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "daily_target" => Some(self.daily_target.to_string()),
            "utc_offset_hours" => Some(self.utc_offset_hours.to_string()),
            "account_id" => self.account_id.clone(),
            "remote.base_url" => Some(self.remote.base_url.clone()),
            "remote.request_timeout_secs" => Some(self.remote.request_timeout_secs.to_string()),
            _ => None,
        }
    }

    /// Set a config value by key and persist. Keys are typed: values
    /// that don't parse, or land outside their valid range, are
    /// rejected.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.apply(key, value)?;
        self.save()?;
        Ok(())
    }

    /// Apply one key/value pair without persisting.
    fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "daily_target" => {
                let target: u32 = parse_value(key, value)?;
                if target == 0 {
                    return Err(invalid(key, "must be at least 1"));
                }
                self.daily_target = target;
            }
            "utc_offset_hours" => {
                let hours: i32 = parse_value(key, value)?;
                if !(-14..=14).contains(&hours) {
                    return Err(invalid(key, "must be between -14 and 14"));
                }
                self.utc_offset_hours = hours;
            }
            "account_id" => {
                self.account_id = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
            }
            "remote.base_url" => {
                url::Url::parse(value).map_err(|e| invalid(key, &e.to_string()))?;
                self.remote.base_url = value.to_string();
            }
            "remote.request_timeout_secs" => {
                let secs: u64 = parse_value(key, value)?;
                if secs == 0 {
                    return Err(invalid(key, "must be at least 1"));
                }
                self.remote.request_timeout_secs = secs;
            }
            _ => {
                return Err(invalid(key, "unknown configuration key"));
            }
        }
        Ok(())
    }

    /// The day clock configured for this installation.
    pub fn clock(&self) -> DayClock {
        DayClock::from_offset_hours(self.utc_offset_hours)
    }

    /// The configured account, `None` for guest.
    pub fn account(&self) -> Option<AccountId> {
        self.account_id.as_deref().map(AccountId::from)
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| invalid(key, &format!("cannot parse '{value}'")))
}

fn invalid(key: &str, message: &str) -> crate::error::CoreError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.daily_target, DEFAULT_DAILY_TARGET);
        assert_eq!(parsed.utc_offset_hours, 9);
        assert!(parsed.account_id.is_none());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.daily_target, 3);
        assert_eq!(cfg.remote.request_timeout_secs, 30);
    }

    #[test]
    fn get_exposes_known_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("daily_target").as_deref(), Some("3"));
        assert_eq!(cfg.get("utc_offset_hours").as_deref(), Some("9"));
        assert!(cfg.get("account_id").is_none());
        assert!(cfg.get("not_a_key").is_none());
    }

    #[test]
    fn account_maps_to_account_id() {
        let mut cfg = Config::default();
        assert!(cfg.account().is_none());
        cfg.account_id = Some("uid-1".to_string());
        assert_eq!(cfg.account(), Some(AccountId::from("uid-1")));
    }

    #[test]
    fn apply_updates_typed_values() {
        let mut cfg = Config::default();
        cfg.apply("daily_target", "5").unwrap();
        assert_eq!(cfg.daily_target, 5);
        cfg.apply("utc_offset_hours", "-5").unwrap();
        assert_eq!(cfg.utc_offset_hours, -5);
        cfg.apply("remote.base_url", "https://example.com").unwrap();
        assert_eq!(cfg.remote.base_url, "https://example.com");
    }

    #[test]
    fn apply_rejects_out_of_range_values() {
        let mut cfg = Config::default();
        assert!(cfg.apply("daily_target", "0").is_err());
        assert!(cfg.apply("utc_offset_hours", "48").is_err());
        assert!(cfg.apply("remote.base_url", "not a url").is_err());
        assert!(cfg.apply("daily_target", "three").is_err());
    }

    #[test]
    fn apply_rejects_unknown_keys() {
        let mut cfg = Config::default();
        assert!(cfg.apply("nope", "1").is_err());
    }

    #[test]
    fn clearing_account_id_returns_to_guest() {
        let mut cfg = Config::default();
        cfg.apply("account_id", "uid-9").unwrap();
        assert_eq!(cfg.account(), Some(AccountId::from("uid-9")));
        cfg.apply("account_id", "").unwrap();
        assert!(cfg.account().is_none());
    }
}
