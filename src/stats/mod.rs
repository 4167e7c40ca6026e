//! Profile statistics via the upstream GraphQL API.
//!
//! # Data Flow
//! ```text
//! `user` query parameter + feature flag
//!     → Subject (viewer | user(login))
//!     → query.rs (fixed document for scope + subject)
//!     → one GraphQL POST
//!     → data payload, `viewer` renamed to `user`
//! ```

pub mod query;

pub use query::{Scope, StatsQuery, Subject};

use serde_json::{Map, Value};

use crate::upstream::{GithubClient, UpstreamError, UpstreamResult};

const VIEWER_KEY: &str = "viewer";
const USER_KEY: &str = "user";

/// Why a subject could not be selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionDisabled;

/// Pick the query subject from the optional `user` parameter.
///
/// An empty parameter is treated as absent.
pub fn select_subject(
    user: Option<&str>,
    allow_user_selection: bool,
) -> Result<Subject, SelectionDisabled> {
    match user.filter(|u| !u.is_empty()) {
        None => Ok(Subject::Viewer),
        Some(_) if !allow_user_selection => Err(SelectionDisabled),
        Some(login) => Ok(Subject::User(login.to_string())),
    }
}

/// Run a statistics query and return its normalized data payload.
pub async fn fetch_stats(client: &GithubClient, query: &StatsQuery) -> UpstreamResult<Map<String, Value>> {
    let body = client.graphql(query.document, query.variables.as_ref()).await?;
    let mut data = extract_data(body)?;
    rename_viewer(&mut data);
    Ok(data)
}

/// Take the `data` object out of a GraphQL response.
///
/// A missing or null `data` is an application-level failure carrying the
/// upstream message.
pub fn extract_data(body: Value) -> UpstreamResult<Map<String, Value>> {
    let Value::Object(mut envelope) = body else {
        return Err(UpstreamError::Malformed("GraphQL response is not an object".into()));
    };

    match envelope.remove("data") {
        Some(Value::Object(data)) => Ok(data),
        _ => Err(UpstreamError::Application(upstream_message(&envelope))),
    }
}

fn upstream_message(envelope: &Map<String, Value>) -> String {
    if let Some(message) = envelope.get("message").and_then(Value::as_str) {
        return message.to_string();
    }

    let messages: Vec<&str> = envelope
        .get("errors")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|e| e.get("message").and_then(Value::as_str))
        .collect();

    if messages.is_empty() {
        "GitHub returned no data".to_string()
    } else {
        messages.join("; ")
    }
}

/// Move `viewer` to `user` so both query forms share one shape.
///
/// Returns whether a rename happened.
pub fn rename_viewer(data: &mut Map<String, Value>) -> bool {
    match data.remove(VIEWER_KEY) {
        Some(viewer) => {
            data.insert(USER_KEY.to_string(), viewer);
            tracing::info!("Renamed viewer payload to user");
            true
        }
        None => false,
    }
}
