//! Endpoint handlers.
//!
//! Handlers validate query parameters before any upstream call, so a
//! malformed request never costs an upstream round trip.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::contributors::{self, AggregationLimits, ContributorRecord, ContributorSummary, RepoContributors};
use crate::http::response::{ApiError, MISSING_OWNER_REPO, USER_SELECTION_DISABLED};
use crate::http::server::AppState;
use crate::stats::{self, Scope, StatsQuery};

/// Query parameters of the contributor endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ContributorsParams {
    pub owner: Option<String>,
    pub repo: Option<String>,
    /// Kept as text so unparsable values fall back to the default.
    pub per_page: Option<String>,
}

impl ContributorsParams {
    fn owner_repo(&self) -> Result<(&str, &str), ApiError> {
        match (non_empty(&self.owner), non_empty(&self.repo)) {
            (Some(owner), Some(repo)) => Ok((owner, repo)),
            _ => Err(ApiError::bad_request(MISSING_OWNER_REPO)),
        }
    }
}

/// Query parameters of the statistics endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct StatsParams {
    pub user: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// `GET /api/github-contributors`: one page of registered contributors.
pub async fn list_contributors(
    State(state): State<AppState>,
    Query(params): Query<ContributorsParams>,
) -> Result<Json<Vec<ContributorSummary>>, ApiError> {
    let (owner, repo) = params.owner_repo()?;
    let per_page = contributors::effective_per_page(params.per_page.as_deref(), &state.contributors);

    let list = contributors::list_single_page(&state.client, owner, repo, per_page)
        .await
        .map_err(ApiError::from_contributors)?;
    Ok(Json(list))
}

/// `GET /api/github-contributors/all`: every contributor, anonymous included.
pub async fn list_all_contributors(
    State(state): State<AppState>,
    Query(params): Query<ContributorsParams>,
) -> Result<Json<Vec<ContributorRecord>>, ApiError> {
    let (owner, repo) = params.owner_repo()?;
    let source = RepoContributors {
        client: &state.client,
        owner,
        repo,
    };
    let limits = AggregationLimits {
        page_size: state.contributors.aggregate_page_size,
        max_pages: state.contributors.max_pages,
    };

    let aggregation = contributors::aggregate(&source, limits)
        .await
        .map_err(ApiError::from_contributors)?;
    Ok(Json(aggregation.records))
}

/// `GET /api/github-data`: full profile statistics.
pub async fn profile_stats(
    State(state): State<AppState>,
    Query(params): Query<StatsParams>,
) -> Result<Json<Map<String, Value>>, ApiError> {
    run_stats(&state, Scope::Profile, params).await
}

/// `GET /api/github-calendar`: contribution calendar only.
pub async fn contribution_calendar(
    State(state): State<AppState>,
    Query(params): Query<StatsParams>,
) -> Result<Json<Map<String, Value>>, ApiError> {
    run_stats(&state, Scope::Calendar, params).await
}

async fn run_stats(
    state: &AppState,
    scope: Scope,
    params: StatsParams,
) -> Result<Json<Map<String, Value>>, ApiError> {
    let subject = stats::select_subject(params.user.as_deref(), state.stats.allow_user_selection)
        .map_err(|_| ApiError::bad_request(USER_SELECTION_DISABLED))?;

    let query = StatsQuery::new(scope, &subject);
    let data = stats::fetch_stats(&state.client, &query)
        .await
        .map_err(ApiError::from_stats)?;
    Ok(Json(data))
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

/// `GET /health`
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
