//! Hosting platform HTTP client.
//!
//! # Responsibilities
//! - Build contributor listing URLs (owner/repo path-encoded)
//! - POST GraphQL documents with variables
//! - Attach bearer credential, Accept and User-Agent headers
//! - Classify failures (status vs transport vs malformed body)

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::{json, Value};
use url::Url;

use crate::config::{TimeoutConfig, UpstreamConfig};
use crate::observability::metrics;
use crate::upstream::credentials::CredentialProvider;
use crate::upstream::types::{UpstreamError, UpstreamResult};

const REST_ACCEPT: &str = "application/vnd.github+json";

/// Parameters for one contributor listing call.
#[derive(Debug, Clone, Copy)]
pub struct ContributorsRequest<'a> {
    pub owner: &'a str,
    pub repo: &'a str,
    pub per_page: u32,
    /// Page number; omitted from the query when `None`.
    pub page: Option<u32>,
    /// Include anonymous contributors (`anon=1`).
    pub include_anonymous: bool,
}

/// Client for the hosting platform's REST and GraphQL APIs.
#[derive(Clone)]
pub struct GithubClient {
    http: Client,
    api_base: Url,
    graphql_url: Url,
    user_agent: String,
    credentials: Arc<dyn CredentialProvider>,
}

impl GithubClient {
    /// Create a client from configuration and a credential source.
    pub fn new(
        upstream: &UpstreamConfig,
        timeouts: &TimeoutConfig,
        credentials: Arc<dyn CredentialProvider>,
    ) -> UpstreamResult<Self> {
        let api_base = parse_url("upstream.api_base_url", &upstream.api_base_url)?;
        if api_base.cannot_be_a_base() {
            return Err(UpstreamError::Setup(format!(
                "upstream.api_base_url '{}' cannot carry a path",
                upstream.api_base_url
            )));
        }
        let graphql_url = parse_url("upstream.graphql_url", &upstream.graphql_url)?;

        let mut builder = Client::builder().connect_timeout(Duration::from_secs(timeouts.connect_secs));
        if !upstream.system_proxy {
            builder = builder.no_proxy();
        }
        let http = builder
            .build()
            .map_err(|e| UpstreamError::Setup(format!("HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_base,
            graphql_url,
            user_agent: upstream.user_agent.clone(),
            credentials,
        })
    }

    /// URL of the contributor listing for a request.
    pub fn contributors_url(&self, request: &ContributorsRequest<'_>) -> Url {
        let mut url = self.api_base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["repos", request.owner, request.repo, "contributors"]);
        }
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("per_page", &request.per_page.to_string());
            if let Some(page) = request.page {
                query.append_pair("page", &page.to_string());
            }
            if request.include_anonymous {
                query.append_pair("anon", "1");
            }
        }
        url
    }

    /// Fetch one page of contributors as raw JSON.
    ///
    /// The body is returned as-is; callers decide what a non-array means.
    /// An empty repository answers `204 No Content`, which reads as an
    /// empty page.
    pub async fn contributors(&self, request: ContributorsRequest<'_>) -> UpstreamResult<Value> {
        let url = self.contributors_url(&request);
        tracing::debug!(
            owner = %request.owner,
            repo = %request.repo,
            page = ?request.page,
            per_page = request.per_page,
            "Fetching contributors"
        );

        let builder = self.http.get(url).header(ACCEPT, REST_ACCEPT);
        let response = self.send("rest", builder).await?;
        read_listing(response).await
    }

    /// Execute a GraphQL document, returning the full response body.
    ///
    /// Only transport-level failures are errors here; the `data`/`errors`
    /// envelope is left for the caller to interpret.
    pub async fn graphql(&self, query: &str, variables: Option<&Value>) -> UpstreamResult<Value> {
        let body = match variables {
            Some(vars) => json!({ "query": query, "variables": vars }),
            None => json!({ "query": query }),
        };

        tracing::debug!(endpoint = %self.graphql_url, "Issuing GraphQL query");
        let builder = self.http.post(self.graphql_url.clone()).json(&body);
        let response = self.send("graphql", builder).await?;
        read_json("graphql", response).await
    }

    async fn send(&self, api: &'static str, builder: RequestBuilder) -> UpstreamResult<Response> {
        let mut builder = builder.header(USER_AGENT, &self.user_agent);
        match self.credentials.token() {
            Some(token) => builder = builder.bearer_auth(token),
            None => tracing::debug!(api, "No upstream credential configured"),
        }

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(api, error = %e, "Upstream unreachable");
            metrics::record_upstream_call(api, "transport_error");
            UpstreamError::Transport(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(api, status = %status, "Upstream returned error status");
            metrics::record_upstream_call(api, "status_error");
            return Err(UpstreamError::from_status(status));
        }

        metrics::record_upstream_call(api, "ok");
        Ok(response)
    }
}

async fn read_json(api: &'static str, response: Response) -> UpstreamResult<Value> {
    response.json::<Value>().await.map_err(|e| {
        tracing::warn!(api, error = %e, "Upstream body is not JSON");
        UpstreamError::Malformed(e.to_string())
    })
}

async fn read_listing(response: Response) -> UpstreamResult<Value> {
    if response.status() == StatusCode::NO_CONTENT {
        return Ok(Value::Array(Vec::new()));
    }

    let body = response.bytes().await.map_err(UpstreamError::Transport)?;
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Array(Vec::new()));
    }
    serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!(api = "rest", error = %e, "Upstream body is not JSON");
        UpstreamError::Malformed(e.to_string())
    })
}

fn parse_url(field: &str, value: &str) -> UpstreamResult<Url> {
    Url::parse(value).map_err(|e| UpstreamError::Setup(format!("{field} '{value}': {e}")))
}

impl std::fmt::Debug for GithubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubClient")
            .field("api_base", &self.api_base.as_str())
            .field("graphql_url", &self.graphql_url.as_str())
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
