//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use repo_stats_proxy::config::ServiceConfig;
use repo_stats_proxy::upstream::StaticCredentials;
use repo_stats_proxy::{HttpServer, Shutdown};

pub const TEST_TOKEN: &str = "test-token";

/// Produces a contributor listing response from the request query.
/// Status 204 is sent without a body.
pub type RestResponder = Arc<dyn Fn(&HashMap<String, String>) -> (u16, Value) + Send + Sync>;

/// Produces a GraphQL response from the request body.
pub type GraphqlResponder = Arc<dyn Fn(&Value) -> (u16, Value) + Send + Sync>;

/// One request received by the mock upstream.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub path: String,
    pub query: HashMap<String, String>,
    pub authorization: Option<String>,
    pub user_agent: Option<String>,
    pub body: Option<Value>,
}

#[derive(Clone)]
struct MockState {
    rest: RestResponder,
    graphql: GraphqlResponder,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

/// Programmable stand-in for the hosting platform's REST and GraphQL APIs.
pub struct MockUpstream {
    pub addr: SocketAddr,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockUpstream {
    pub async fn start(rest: RestResponder, graphql: GraphqlResponder) -> Self {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            rest,
            graphql,
            calls: calls.clone(),
        };

        let app = Router::new()
            .route("/repos/{owner}/{repo}/contributors", get(rest_handler))
            .route("/graphql", post(graphql_handler))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, calls }
    }

    /// Mock that only serves contributor listings.
    pub async fn rest(f: impl Fn(&HashMap<String, String>) -> (u16, Value) + Send + Sync + 'static) -> Self {
        Self::start(Arc::new(f), Arc::new(unexpected_graphql)).await
    }

    /// Mock that only serves GraphQL.
    pub async fn graphql(f: impl Fn(&Value) -> (u16, Value) + Send + Sync + 'static) -> Self {
        Self::start(Arc::new(unexpected_rest), Arc::new(f)).await
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

fn unexpected_rest(_: &HashMap<String, String>) -> (u16, Value) {
    (500, json!({"message": "unexpected REST call"}))
}

fn unexpected_graphql(_: &Value) -> (u16, Value) {
    (500, json!({"message": "unexpected GraphQL call"}))
}

async fn rest_handler(
    State(state): State<MockState>,
    Path((owner, repo)): Path<(String, String)>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    state.calls.lock().unwrap().push(RecordedCall {
        path: format!("/repos/{owner}/{repo}/contributors"),
        query: query.clone(),
        authorization: header_text(&headers, header::AUTHORIZATION),
        user_agent: header_text(&headers, header::USER_AGENT),
        body: None,
    });
    match (state.rest)(&query) {
        (204, _) => StatusCode::NO_CONTENT.into_response(),
        (status, body) => (StatusCode::from_u16(status).unwrap(), Json(body)).into_response(),
    }
}

async fn graphql_handler(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.calls.lock().unwrap().push(RecordedCall {
        path: "/graphql".to_string(),
        query: HashMap::new(),
        authorization: header_text(&headers, header::AUTHORIZATION),
        user_agent: header_text(&headers, header::USER_AGENT),
        body: Some(body.clone()),
    });
    let (status, response) = (state.graphql)(&body);
    (StatusCode::from_u16(status).unwrap(), Json(response))
}

fn header_text(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// A running proxy pointed at a mock upstream.
pub struct TestService {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    shutdown: Shutdown,
}

impl TestService {
    pub async fn start(mock: &MockUpstream, configure: impl FnOnce(&mut ServiceConfig)) -> Self {
        let mut config = ServiceConfig::default();
        config.listener.bind_address = "127.0.0.1:0".to_string();
        config.upstream.api_base_url = mock.base_url();
        config.upstream.graphql_url = format!("{}/graphql", mock.base_url());
        config.upstream.system_proxy = false;
        configure(&mut config);

        let server =
            HttpServer::with_credentials(config, Arc::new(StaticCredentials::new(TEST_TOKEN)))
                .unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let shutdown = Shutdown::new();
        let server_shutdown = shutdown.clone();
        tokio::spawn(async move {
            let _ = server.run(listener, &server_shutdown).await;
        });

        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(0)
            .no_proxy()
            .build()
            .unwrap();

        Self {
            addr,
            client,
            shutdown,
        }
    }

    pub async fn get(&self, path_and_query: &str) -> reqwest::Response {
        self.client
            .get(format!("http://{}{}", self.addr, path_and_query))
            .send()
            .await
            .expect("service unreachable")
    }
}

impl Drop for TestService {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// `n` registered contributors, numbered from `offset`.
pub fn contributor_page(n: usize, offset: usize) -> Value {
    Value::Array(
        (offset..offset + n)
            .map(|i| {
                json!({
                    "login": format!("user{i}"),
                    "id": i,
                    "avatar_url": format!("https://avatars.example/u/{i}"),
                    "type": "User",
                    "contributions": 1000 - i
                })
            })
            .collect(),
    )
}

/// Parse a numeric query parameter.
pub fn query_num(query: &HashMap<String, String>, key: &str) -> Option<usize> {
    query.get(key).and_then(|v| v.parse().ok())
}
