//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream REST and GraphQL endpoints.
    pub upstream: UpstreamConfig,

    /// Contributor endpoint limits.
    pub contributors: ContributorsConfig,

    /// Profile statistics endpoint settings.
    pub stats: StatsConfig,

    /// CORS allow-list.
    pub cors: CorsConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

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

/// Upstream hosting platform endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the REST API.
    pub api_base_url: String,

    /// GraphQL endpoint URL.
    pub graphql_url: String,

    /// User-Agent sent on every upstream call (required by the platform).
    pub user_agent: String,

    /// Environment variable holding the bearer token.
    pub token_env: String,

    /// Honor `HTTP_PROXY`/`HTTPS_PROXY` for upstream calls.
    pub system_proxy: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.github.com".to_string(),
            graphql_url: "https://api.github.com/graphql".to_string(),
            user_agent: concat!("repo-stats-proxy/", env!("CARGO_PKG_VERSION")).to_string(),
            token_env: "GITHUB_TOKEN".to_string(),
            system_proxy: true,
        }
    }
}

/// Contributor listing limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContributorsConfig {
    /// Page size used by the single-page endpoint when `per_page` is absent.
    pub default_per_page: u32,

    /// Upper clamp for a caller-supplied `per_page`.
    pub max_per_page: u32,

    /// Page size requested during full aggregation.
    pub aggregate_page_size: u32,

    /// Ceiling on pages fetched during full aggregation (`None` = unbounded).
    pub max_pages: Option<u32>,
}

impl Default for ContributorsConfig {
    fn default() -> Self {
        Self {
            default_per_page: 30,
            max_per_page: 100,
            aggregate_page_size: 100,
            max_pages: Some(100),
        }
    }
}

/// Profile statistics settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct StatsConfig {
    /// Honor the `user` query parameter (arbitrary user lookup).
    pub allow_user_selection: bool,
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Origins allowed to read responses. `"*"` allows any origin.
    pub allowed_origins: Vec<String>,

    /// Preflight cache lifetime in seconds.
    pub max_age_secs: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
            max_age_secs: 86_400,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upstream connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Inbound request timeout (total handler time) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 60,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
