//! Contributor listing for a repository.
//!
//! # Modes
//! ```text
//! single page:  one upstream call, per_page clamped, registered users only
//! aggregate:    pages of anon-inclusive entries until a short/empty page
//! ```

pub mod aggregate;
pub mod normalize;

pub use aggregate::{
    aggregate, AggregationLimits, Aggregation, ContributorPages, RepoContributors, StopReason,
};
pub use normalize::{ContributorRecord, ContributorSummary, RawContributor};

use serde_json::Value;

use crate::config::ContributorsConfig;
use crate::upstream::{ContributorsRequest, GithubClient, UpstreamError, UpstreamResult};

/// Resolve the effective page size for the single-page listing.
///
/// Absent, unparsable or zero values fall back to the configured default;
/// anything above the configured maximum is clamped down to it.
pub fn effective_per_page(requested: Option<&str>, config: &ContributorsConfig) -> u32 {
    let requested = requested
        .and_then(|raw| raw.trim().parse::<u64>().ok())
        .filter(|&n| n > 0)
        .unwrap_or(u64::from(config.default_per_page));
    requested.min(u64::from(config.max_per_page)) as u32
}

/// Fetch one page of registered contributors.
pub async fn list_single_page(
    client: &GithubClient,
    owner: &str,
    repo: &str,
    per_page: u32,
) -> UpstreamResult<Vec<ContributorSummary>> {
    let body = client
        .contributors(ContributorsRequest {
            owner,
            repo,
            per_page,
            page: None,
            include_anonymous: false,
        })
        .await?;

    match body {
        Value::Array(entries) => Ok(normalize::decode_entries(entries).collect()),
        other => Err(UpstreamError::Malformed(format!(
            "expected a contributor list, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
