//! CLI execution context.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context as _, Result};
use bakery_client::{DemoStorefront, HttpStorefront};
use bakery_commerce::StorefrontApi;

use crate::config::{BakeryConfig, API_URL_ENV, CONFIG_FILE_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: BakeryConfig,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    /// File the config was loaded from, if any.
    pub config_path: Option<PathBuf>,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, offline: bool, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = if let Some(path) = config_path {
            (BakeryConfig::load(path)?, Some(PathBuf::from(path)))
        } else {
            // Try to find config in current directory or parent directories
            match find_config_file(&cwd) {
                Some(path) => {
                    let config = BakeryConfig::load(&path.to_string_lossy())?;
                    (config, Some(path))
                }
                None => (BakeryConfig::default(), None),
            }
        };
        let mut config = config.with_base_url_override(std::env::var(API_URL_ENV).ok());
        config.api.offline |= offline;

        Ok(Self {
            config,
            output,
            cwd,
            config_path,
        })
    }

    /// Build the storefront backend selected by the config.
    ///
    /// Offline mode gets a fresh demo storefront on every call.
    pub fn storefront(&self) -> Result<Box<dyn StorefrontApi>> {
        if self.config.api.offline {
            tracing::debug!("using the in-memory demo storefront");
            return Ok(Box::new(DemoStorefront::new()));
        }

        tracing::debug!(base_url = %self.config.api.base_url, "using the storefront API");
        let api = HttpStorefront::with_timeout(
            self.config.api.base_url.clone(),
            Duration::from_secs(self.config.api.timeout_secs),
        )
        .with_context(|| format!("Invalid API base URL: {}", self.config.api.base_url))?;
        Ok(Box::new(api))
    }
}

/// Find a config file in the directory tree.
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        for name in CONFIG_FILE_NAMES {
            let candidate = current.join(name);
            if candidate.is_file() {
                return Some(candidate);
            }
        }

        if !current.pop() {
            return None;
        }
    }
}
