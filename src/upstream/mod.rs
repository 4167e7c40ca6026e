//! Upstream hosting platform integration.
//!
//! # Data Flow
//! ```text
//! Handler
//!     → credentials.rs (bearer token, looked up per call)
//!     → client.rs (REST contributors / GraphQL POST)
//!     → types.rs (status vs transport vs application errors)
//! ```
//!
//! # Constraints
//! - No retries and no overall request timeout
//! - Tokens are never logged

pub mod client;
pub mod credentials;
pub mod types;

pub use client::{ContributorsRequest, GithubClient};
pub use credentials::{CredentialProvider, EnvCredentials, StaticCredentials};
pub use types::{UpstreamError, UpstreamResult};
