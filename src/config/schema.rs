//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the application.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the application.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request limits.
    pub security: SecurityConfig,

    /// Session cookie and storage settings.
    pub session: SessionConfig,

    /// Form handling settings.
    pub forms: FormsConfig,

    /// Template loading settings.
    pub templates: TemplatesConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum request body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 64 * 1024,
        }
    }
}

/// Session cookie and storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Name of the cookie carrying the session id.
    pub cookie_name: String,

    /// Cookie path attribute.
    pub cookie_path: String,

    /// Optional cookie domain attribute.
    pub cookie_domain: Option<String>,

    /// Only send the cookie over HTTPS.
    pub secure: bool,

    /// Hide the cookie from client-side scripts.
    pub http_only: bool,

    /// Cookie `Max-Age` and server-side lifetime in seconds. `None` sends a
    /// browser-session cookie and falls back to `idle_timeout_secs` on the server.
    pub max_age_secs: Option<u64>,

    /// Server-side lifetime of a session that is not touched, used when
    /// `max_age_secs` is unset.
    pub idle_timeout_secs: u64,

    /// How often expired sessions are purged from the store.
    pub purge_interval_secs: u64,
}

impl SessionConfig {
    /// How long the store keeps a session after its last use.
    pub fn store_ttl(&self) -> Duration {
        Duration::from_secs(self.max_age_secs.unwrap_or(self.idle_timeout_secs))
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "session".to_string(),
            cookie_path: "/".to_string(),
            cookie_domain: None,
            secure: false,
            http_only: true,
            max_age_secs: None,
            idle_timeout_secs: 86_400,
            purge_interval_secs: 300,
        }
    }
}

/// Form handling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FormsConfig {
    /// Maximum number of CSRF tokens kept per session.
    /// Zero or negative keeps none, so every protected submission fails.
    pub csrf_tokens: i64,
}

impl Default for FormsConfig {
    fn default() -> Self {
        Self { csrf_tokens: 5 }
    }
}

/// Template loading configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TemplatesConfig {
    /// Glob of extra template files, e.g. "templates/**/*.html".
    /// Built-in templates are always registered.
    pub glob: Option<String>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter directive (trace, debug, info, warn, error, or a full EnvFilter string).
    pub log_level: String,

    /// Emit logs as JSON lines.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
