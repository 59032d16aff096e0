//! Configuration loading and validation for the web application.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any variable is present but invalid.

use anyhow::{Context, Result};
use serde::Deserialize;

/// Validated application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Port the HTTP server listens on.
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,

    /// Path to the catalog JSON file (rooms, time slots, styles, accounts).
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// How often (seconds) to re-read the catalog file.
    #[serde(default = "default_catalog_refresh_interval")]
    pub catalog_refresh_interval_secs: u64,

    /// How long (seconds) a login session stays valid.
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,

    /// How long (seconds) an unclaimed flash message survives.
    #[serde(default = "default_flash_ttl")]
    pub flash_ttl_secs: u64,

    /// Hex-encoded 32-byte HMAC key for session cookies. A random key is
    /// generated when unset, which invalidates sessions across restarts.
    #[serde(default)]
    pub session_key_hex: Option<String>,

    /// Account number shown on the payment page.
    #[serde(default = "default_bank_account")]
    pub bank_account: String,

    /// Bank name shown on the payment page.
    #[serde(default = "default_bank_name")]
    pub bank_name: String,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_bind_port() -> u16 {
    8080
}
fn default_catalog_path() -> String {
    "catalog.json".into()
}
fn default_catalog_refresh_interval() -> u64 {
    300
}
fn default_session_ttl() -> u64 {
    86_400
}
fn default_flash_ttl() -> u64 {
    300
}
fn default_bank_account() -> String {
    "1234567890".into()
}
fn default_bank_name() -> String {
    "VCB - Ngân hàng TMCP Ngoại thương Việt Nam".into()
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable is present but cannot be parsed, or if
    /// validation fails.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        ensure_non_empty(&self.catalog_path, "CATALOG_PATH")?;
        ensure_non_empty(&self.bank_account, "BANK_ACCOUNT")?;
        ensure_non_empty(&self.bank_name, "BANK_NAME")?;

        if self.catalog_refresh_interval_secs == 0 {
            anyhow::bail!("CATALOG_REFRESH_INTERVAL_SECS must be > 0");
        }
        if self.session_ttl_secs == 0 {
            anyhow::bail!("SESSION_TTL_SECS must be > 0");
        }
        if self.flash_ttl_secs == 0 {
            anyhow::bail!("FLASH_TTL_SECS must be > 0");
        }
        if let Some(hex_key) = &self.session_key_hex {
            let decoded =
                hex::decode(hex_key).context("SESSION_KEY_HEX is not valid hex")?;
            if decoded.len() != 32 {
                anyhow::bail!(
                    "SESSION_KEY_HEX must decode to 32 bytes, got {}",
                    decoded.len()
                );
            }
        }
        Ok(())
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} is required and must not be empty");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            bind_port: default_bind_port(),
            catalog_path: default_catalog_path(),
            catalog_refresh_interval_secs: default_catalog_refresh_interval(),
            session_ttl_secs: default_session_ttl(),
            flash_ttl_secs: default_flash_ttl(),
            session_key_hex: None,
            bank_account: default_bank_account(),
            bank_name: default_bank_name(),
            log_level: default_log_level(),
        }
    }

    #[test]
    fn defaults_are_correct() {
        assert_eq!(default_bind_port(), 8080);
        assert_eq!(default_catalog_path(), "catalog.json");
        assert_eq!(default_catalog_refresh_interval(), 300);
        assert_eq!(default_session_ttl(), 86_400);
        assert_eq!(default_flash_ttl(), 300);
        assert_eq!(default_bank_account(), "1234567890");
        assert_eq!(default_log_level(), "info");
    }

    #[test]
    fn default_config_is_valid() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_catalog_path() {
        let mut cfg = base_config();
        cfg.catalog_path = "  ".into();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_session_ttl() {
        let mut cfg = base_config();
        cfg.session_ttl_secs = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_short_session_key() {
        let mut cfg = base_config();
        cfg.session_key_hex = Some("abcd".into());
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_accepts_32_byte_session_key() {
        let mut cfg = base_config();
        cfg.session_key_hex = Some("00".repeat(32));
        assert!(cfg.validate().is_ok());
    }
}
