//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//!     → cloned into AppState for handlers
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Feature flags (user selection) live here, not in code

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    ContributorsConfig, CorsConfig, ListenerConfig, ObservabilityConfig, ServiceConfig,
    StatsConfig, TimeoutConfig, UpstreamConfig,
};
pub use validation::ValidationError;
