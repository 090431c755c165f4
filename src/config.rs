//! Application configuration.
//!
//! Configuration is loaded from a TOML file at:
//! 1. `$CTRLCRAFT_CONFIG` (environment variable)
//! 2. `~/.config/ctrlcraft/config.toml` (Linux/macOS)
//!    `%APPDATA%\ctrlcraft\config.toml` (Windows)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General behavior settings.
    pub general: GeneralConfig,
    /// EmailJS relay credentials and endpoint.
    pub relay: RelayConfig,
    /// Attachment limits.
    pub intake: IntakeConfig,
    /// Message assembly and post-submit behavior.
    pub submission: SubmissionConfig,
    /// User-facing notices.
    pub notices: NoticeConfig,
}

/// General behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Override cache directory for logs.
    pub cache_dir: Option<PathBuf>,
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub log_level: String,
}

/// EmailJS relay settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Base URL of the EmailJS REST API.
    pub endpoint: String,
    /// EmailJS service identifier.
    pub service_id: String,
    /// EmailJS template identifier.
    pub template_id: String,
    /// EmailJS public key (sent as `user_id`).
    pub public_key: String,
    /// Optional private access token for accounts with strict mode enabled.
    pub access_token: Option<String>,
    /// Address the inquiry is delivered to (`to_email` template parameter).
    pub recipient: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

/// What an empty file selection does to the current collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptySelection {
    /// Leave the collection as it is.
    Ignore,
    /// Clear the collection.
    Clear,
}

/// Attachment limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    /// Maximum number of images per inquiry.
    pub max_attachments: usize,
    /// Maximum size of a single image in bytes (default: 10 MiB).
    pub max_file_size: u64,
    /// Behavior on an empty selection.
    pub empty_selection: EmptySelection,
}

/// Message assembly and post-submit behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmissionConfig {
    /// Number of images embedded inline in the email; the rest are only counted.
    pub inline_image_cap: usize,
    /// Where to go after a successful submission.
    pub landing_page: String,
    /// Delay before navigating to the landing page, in seconds.
    pub redirect_delay_secs: u64,
}

/// User-facing notice settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NoticeConfig {
    /// How long a notice stays visible, in seconds.
    pub ttl_secs: u64,
}

// ── Default implementations ─────────────────────────────────────

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            log_level: "warn".to_string(),
        }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.emailjs.com".to_string(),
            service_id: String::new(),
            template_id: String::new(),
            public_key: String::new(),
            access_token: None,
            recipient: String::new(),
            timeout_secs: 30,
        }
    }
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            max_attachments: 10,
            max_file_size: 10 * 1024 * 1024, // 10 MiB
            empty_selection: EmptySelection::Ignore,
        }
    }
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            inline_image_cap: 5,
            landing_page: "index.html".to_string(),
            redirect_delay_secs: 3,
        }
    }
}

impl Default for NoticeConfig {
    fn default() -> Self {
        Self { ttl_secs: 5 }
    }
}

impl RelayConfig {
    /// Request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Keys that must be set before anything can be sent, in config order.
    pub fn unset_keys(&self) -> Vec<&'static str> {
        [
            ("relay.service_id", &self.service_id),
            ("relay.template_id", &self.template_id),
            ("relay.public_key", &self.public_key),
            ("relay.recipient", &self.recipient),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(key, _)| key)
        .collect()
    }
}

impl SubmissionConfig {
    /// Redirect delay as a `Duration`.
    pub fn redirect_delay(&self) -> Duration {
        Duration::from_secs(self.redirect_delay_secs)
    }
}

impl NoticeConfig {
    /// Notice lifetime as a `Duration`.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

// ── Load / save ─────────────────────────────────────────────────

/// Load configuration, searching standard locations.
///
/// Returns the default configuration if no file is found or on parse error.
pub fn load_config() -> Config {
    if let Some(path) = config_file_path() {
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(contents) => match toml::from_str::<Config>(&contents) {
                    Ok(cfg) => {
                        tracing::info!(path = %path.display(), "Loaded config");
                        return cfg;
                    }
                    Err(e) => {
                        tracing::warn!(
                            path = %path.display(),
                            error = %e,
                            "Failed to parse config, using defaults"
                        );
                    }
                },
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Failed to read config file, using defaults"
                    );
                }
            }
        }
    }
    Config::default()
}

/// Save configuration to the standard location.
pub fn save_config(config: &Config) -> anyhow::Result<PathBuf> {
    let path = config_file_path()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config file path"))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(&path, contents)?;
    tracing::info!(path = %path.display(), "Saved config");
    Ok(path)
}

/// Determine the config file path (checking env var first, then standard dirs).
pub fn config_file_path() -> Option<PathBuf> {
    if let Ok(env_path) = std::env::var("CTRLCRAFT_CONFIG") {
        return Some(PathBuf::from(env_path));
    }

    dirs::config_dir().map(|d| d.join("ctrlcraft").join("config.toml"))
}

/// Return the cache directory for logs.
pub fn cache_dir(config: &Config) -> PathBuf {
    if let Some(ref dir) = config.general.cache_dir {
        return dir.clone();
    }
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ctrlcraft")
}

/// Return the log file path.
pub fn log_file_path(config: &Config) -> PathBuf {
    cache_dir(config).join("ctrlcraft.log")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = Config::default();
        assert_eq!(cfg.intake.max_attachments, 10);
        assert_eq!(cfg.intake.max_file_size, 10 * 1024 * 1024);
        assert_eq!(cfg.intake.empty_selection, EmptySelection::Ignore);
        assert_eq!(cfg.submission.inline_image_cap, 5);
        assert_eq!(cfg.submission.landing_page, "index.html");
        assert_eq!(cfg.submission.redirect_delay(), Duration::from_secs(3));
        assert_eq!(cfg.notices.ttl(), Duration::from_secs(5));
        assert_eq!(cfg.relay.endpoint, "https://api.emailjs.com");
    }

    #[test]
    fn test_serialize_deserialize_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).expect("serialize");
        let parsed: Config = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.intake.max_file_size, cfg.intake.max_file_size);
        assert_eq!(parsed.relay.endpoint, cfg.relay.endpoint);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let partial = r#"
[relay]
service_id = "service_abc"

[intake]
max_attachments = 5
empty_selection = "clear"
"#;
        let cfg: Config = toml::from_str(partial).expect("parse partial");
        assert_eq!(cfg.relay.service_id, "service_abc");
        assert_eq!(cfg.intake.max_attachments, 5);
        assert_eq!(cfg.intake.empty_selection, EmptySelection::Clear);
        // Other fields use defaults
        assert_eq!(cfg.intake.max_file_size, 10 * 1024 * 1024);
        assert_eq!(cfg.relay.timeout_secs, 30);
        assert_eq!(cfg.general.log_level, "warn");
    }

    #[test]
    fn test_unset_relay_keys() {
        let mut relay = RelayConfig::default();
        assert_eq!(
            relay.unset_keys(),
            vec![
                "relay.service_id",
                "relay.template_id",
                "relay.public_key",
                "relay.recipient"
            ]
        );
        relay.service_id = "service_abc".into();
        relay.public_key = "pk".into();
        relay.recipient = " ".into();
        assert_eq!(relay.unset_keys(), vec!["relay.template_id", "relay.recipient"]);
    }

    #[test]
    fn test_log_file_path_honours_cache_override() {
        let mut cfg = Config::default();
        cfg.general.cache_dir = Some(PathBuf::from("/tmp/ctrlcraft-test"));
        assert_eq!(
            log_file_path(&cfg),
            PathBuf::from("/tmp/ctrlcraft-test/ctrlcraft.log")
        );
    }
}
