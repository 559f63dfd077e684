//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → SharedConfig handed to handlers and middleware
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → atomic swap inside SharedConfig
//!     → next request observes new csrf_tokens / cookie settings
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

use std::sync::Arc;

use arc_swap::ArcSwap;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    AppConfig, FormsConfig, ListenerConfig, ObservabilityConfig, SessionConfig, TemplatesConfig,
};
pub use watcher::ConfigWatcher;

/// Live configuration shared between requests, swappable on reload.
#[derive(Clone)]
pub struct SharedConfig(Arc<ArcSwap<AppConfig>>);

impl SharedConfig {
    pub fn new(config: AppConfig) -> Self {
        Self(Arc::new(ArcSwap::from_pointee(config)))
    }

    /// Snapshot of the current configuration.
    pub fn load(&self) -> Arc<AppConfig> {
        self.0.load_full()
    }

    /// Replace the configuration for all subsequent readers.
    pub fn store(&self, config: AppConfig) {
        self.0.store(Arc::new(config));
    }
}

impl std::fmt::Debug for SharedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SharedConfig").field(&self.0.load_full()).finish()
    }
}
