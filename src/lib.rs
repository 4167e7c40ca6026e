//! Edge proxy for a source-hosting platform's contributor and profile
//! statistics APIs.

pub mod config;
pub mod contributors;
pub mod http;
pub mod stats;
pub mod upstream;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
