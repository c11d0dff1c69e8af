//! Configuration service implementation.
//!
//! Loads the client configuration from `config.toml`, applies environment
//! overrides and caches the result.

use crate::paths::MarketPaths;
use crate::storage::{AtomicFile, FileFormat};
use market_core::config::ClientConfig;
use market_core::{MarketError, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

pub const ENV_API_BASE: &str = "CAMPUS_MARKET_API_BASE";
pub const ENV_POLL_INTERVAL_SECS: &str = "CAMPUS_MARKET_POLL_INTERVAL_SECS";

type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Configuration service that loads and caches the client configuration.
#[derive(Clone)]
pub struct ConfigService {
    file: Arc<AtomicFile<ClientConfig>>,
    env: EnvLookup,
    /// Cached configuration, filled on first access.
    config: Arc<RwLock<Option<ClientConfig>>>,
}

impl ConfigService {
    /// Creates a service reading the default `config.toml` location.
    pub fn new(paths: &MarketPaths) -> Result<Self> {
        let path = paths
            .config_file()
            .map_err(|e| MarketError::config(e.to_string()))?;
        Ok(Self::with_path(path))
    }

    /// Creates a service reading an explicit file.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicFile::new(path, FileFormat::Toml)),
            env: Arc::new(|name| std::env::var(name).ok()),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Replaces the environment lookup used for overrides.
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.env = Arc::new(lookup);
        self
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Gets the configuration, loading it from file if not cached.
    ///
    /// A missing file yields the defaults; a malformed file is an error.
    pub fn get_config(&self) -> Result<ClientConfig> {
        {
            let read_lock = self.config.read().unwrap_or_else(|e| e.into_inner());
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let loaded = self.load_config()?;

        {
            let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
            *write_lock = Some(loaded.clone());
        }

        Ok(loaded)
    }

    /// Writes `config` to the file and refreshes the cache.
    pub fn save_config(&self, config: &ClientConfig) -> Result<()> {
        self.file.save(config)?;
        self.invalidate_cache();
        tracing::info!("[ConfigService] Saved configuration to {}", self.path().display());
        Ok(())
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = None;
    }

    fn load_config(&self) -> Result<ClientConfig> {
        let mut config = match self.file.load()? {
            Some(config) => config,
            None => {
                tracing::debug!(
                    "[ConfigService] No config at {}, using defaults",
                    self.path().display()
                );
                ClientConfig::default()
            }
        };
        self.apply_env_overrides(&mut config)?;
        Ok(config)
    }

    fn apply_env_overrides(&self, config: &mut ClientConfig) -> Result<()> {
        if let Some(api_base) = (self.env)(ENV_API_BASE).filter(|v| !v.trim().is_empty()) {
            config.api_base = api_base.trim().to_string();
        }

        if let Some(raw) = (self.env)(ENV_POLL_INTERVAL_SECS) {
            config.poll_interval_secs = raw.trim().parse().map_err(|_| {
                MarketError::config(format!(
                    "{} must be a whole number of seconds, got '{}'",
                    ENV_POLL_INTERVAL_SECS, raw
                ))
            })?;
        }

        Ok(())
    }
}
