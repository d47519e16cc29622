//! CLI configuration.

use anyhow::{Context, Result};
use bakery_client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use bakery_commerce::cart::FLAT_SHIPPING_CENTS;
use serde::{Deserialize, Serialize};

/// Environment variable overriding `api.base_url`.
pub const API_URL_ENV: &str = "BAKERY_API_URL";

/// File names searched for, in order, when no `--config` is given.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["bakery.toml", ".bakery.toml", "bakery.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BakeryConfig {
    /// Storefront API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Storefront presentation settings.
    #[serde(default)]
    pub store: StoreConfig,
}

impl BakeryConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;
        Self::parse(path, &content)
    }

    /// Parse config text, choosing the format from the file extension.
    pub fn parse(path: &str, content: &str) -> Result<Self> {
        if path.ends_with(".json") {
            serde_json::from_str(content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(content).with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &str) -> Result<()> {
        let content = if path.ends_with(".json") {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path))
    }

    /// Replace the API base URL when an override is present.
    pub fn with_base_url_override(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.api.base_url = url.trim().to_string();
        }
        self
    }

    /// Check the config, returning `(errors, warnings)`.
    pub fn check(&self) -> (Vec<String>, Vec<String>) {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        let url = &self.api.base_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            errors.push(format!("api.base_url '{}' must start with http:// or https://", url));
        }
        if self.api.timeout_secs == 0 {
            errors.push("api.timeout_secs must be greater than 0".to_string());
        } else if self.api.timeout_secs > 120 {
            warnings.push(format!(
                "api.timeout_secs {} is unusually long",
                self.api.timeout_secs
            ));
        }

        if self.store.shipping_cents < 0 {
            errors.push("store.shipping_cents must not be negative".to_string());
        }
        if self.store.name.trim().is_empty() {
            warnings.push("store.name is empty".to_string());
        }

        (errors, warnings)
    }
}

/// Storefront API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API root, e.g. `http://localhost:8080/api`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Use the in-memory demo storefront instead of the API.
    #[serde(default)]
    pub offline: bool,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            offline: false,
        }
    }
}

/// Storefront presentation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Shop name shown in the interactive session.
    #[serde(default = "default_store_name")]
    pub name: String,

    /// Flat shipping surcharge shown in the cart summary, in cents.
    #[serde(default = "default_shipping_cents")]
    pub shipping_cents: i64,
}

fn default_store_name() -> String {
    "Sweet Delights".to_string()
}

fn default_shipping_cents() -> i64 {
    FLAT_SHIPPING_CENTS
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: default_store_name(),
            shipping_cents: default_shipping_cents(),
        }
    }
}

/// Generate a default bakery.toml config file.
pub fn generate_default_config() -> String {
    format!(
        r#"# Bakery storefront configuration

[api]
base_url = "{base_url}"
timeout_secs = {timeout}
# Use the built-in demo catalog instead of the API
offline = false

[store]
name = "Sweet Delights"
shipping_cents = {shipping}
"#,
        base_url = DEFAULT_BASE_URL,
        timeout = DEFAULT_TIMEOUT_SECS,
        shipping = FLAT_SHIPPING_CENTS,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses_to_defaults() {
        let config = BakeryConfig::parse("bakery.toml", &generate_default_config()).unwrap();
        assert_eq!(config, BakeryConfig::default());
        assert_eq!(config.api.base_url, "http://localhost:8080/api");
        assert_eq!(config.store.shipping_cents, 500);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = BakeryConfig::parse(
            "bakery.toml",
            r#"
            [api]
            offline = true
            "#,
        )
        .unwrap();
        assert!(config.api.offline);
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.store.name, "Sweet Delights");
    }

    #[test]
    fn test_json_config() {
        let config = BakeryConfig::parse(
            "bakery.json",
            r#"{"api": {"base_url": "https://shop.example.com/api"}, "store": {"shipping_cents": 0}}"#,
        )
        .unwrap();
        assert_eq!(config.api.base_url, "https://shop.example.com/api");
        assert_eq!(config.store.shipping_cents, 0);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(BakeryConfig::parse("bakery.toml", "[api\nbase_url = 1").is_err());
    }

    #[test]
    fn test_base_url_override() {
        let config = BakeryConfig::default()
            .with_base_url_override(Some("http://cakes.internal:9000/api".into()));
        assert_eq!(config.api.base_url, "http://cakes.internal:9000/api");

        let config = BakeryConfig::default().with_base_url_override(Some("  ".into()));
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_check() {
        let (errors, warnings) = BakeryConfig::default().check();
        assert!(errors.is_empty());
        assert!(warnings.is_empty());

        let mut config = BakeryConfig::default();
        config.api.base_url = "localhost".into();
        config.api.timeout_secs = 0;
        config.store.shipping_cents = -1;
        let (errors, _) = config.check();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("bakery-config-{}.toml", std::process::id()));
        let path = path.to_str().unwrap();

        let mut config = BakeryConfig::default();
        config.store.name = "Crumbs".into();
        config.save(path).unwrap();

        let loaded = BakeryConfig::load(path).unwrap();
        std::fs::remove_file(path).unwrap();
        assert_eq!(loaded, config);
    }
}
