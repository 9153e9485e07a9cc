use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub sheets: SheetsConfig,
}

/// API server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// API server address
    pub address: String,
    /// API server port
    pub port: u16,
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Security configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SecurityConfig {
    /// OTP validity window in minutes
    #[serde(default = "default_otp_ttl")]
    pub otp_ttl_minutes: i64,
    /// Echo generated OTP codes in the API response (demo mode)
    #[serde(default = "default_otp_echo")]
    pub otp_echo: bool,
}

fn default_otp_ttl() -> i64 {
    5
}

fn default_otp_echo() -> bool {
    true
}

/// Spreadsheet forwarding configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct SheetsConfig {
    /// Google Apps Script endpoint; forwarding is disabled when unset
    #[serde(default)]
    pub script_url: Option<String>,
    /// Request timeout for the forward call in milliseconds
    #[serde(default = "default_sheets_timeout")]
    pub timeout_ms: u64,
}

fn default_sheets_timeout() -> u64 {
    10_000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            address: "0.0.0.0".to_string(),
            port: 5000,
            log_level: "info".to_string(),
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            otp_ttl_minutes: default_otp_ttl(),
            otp_echo: default_otp_echo(),
        }
    }
}

/// Load configuration from a file or use default
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let mut config: Config = match config_path {
        Some(path) => {
            let config_str = std::fs::read_to_string(path)
                .context(format!("Failed to read config file: {:?}", path))?;

            if path.extension().map_or(false, |ext| ext == "json") {
                serde_json::from_str(&config_str).context("Failed to parse JSON config")?
            } else if path.extension().map_or(false, |ext| ext == "toml") {
                toml::from_str(&config_str).context("Failed to parse TOML config")?
            } else {
                return Err(anyhow::anyhow!("Unsupported config file format"));
            }
        }
        None => Config::default(),
    };

    // Environment override used by the original deployment
    if let Ok(url) = std::env::var("GOOGLE_APPS_SCRIPT_URL") {
        if !url.is_empty() {
            config.sheets.script_url = Some(url);
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_otp_demo_settings() {
        let config = Config::default();
        assert_eq!(config.security.otp_ttl_minutes, 5);
        assert!(config.security.otp_echo);
        assert!(config.sheets.script_url.is_none());
    }

    #[test]
    fn toml_config_overrides_defaults() -> Result<()> {
        let parsed: Config = toml::from_str(
            r#"
            [api]
            address = "127.0.0.1"
            port = 8080

            [sheets]
            script_url = "https://script.google.com/macros/s/demo/exec"
            timeout_ms = 2500
            "#,
        )?;
        assert_eq!(parsed.api.port, 8080);
        assert_eq!(parsed.sheets.timeout_ms, 2500);
        assert!(parsed.sheets.script_url.is_some());
        Ok(())
    }
}
