//! CORS response decoration.
//!
//! [`Cors::decorate`] takes the caller's `Origin` and a finished response
//! and returns the response with access-control headers attached. The
//! middleware applies it to every response, errors included, and answers
//! preflight `OPTIONS` requests directly.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE, ORIGIN, VARY,
        },
        HeaderValue, Method, Request, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::config::CorsConfig;

const ALLOWED_METHODS: HeaderValue = HeaderValue::from_static("GET, OPTIONS");
const ALLOWED_HEADERS: HeaderValue = HeaderValue::from_static("Content-Type, Authorization");
const ANY_ORIGIN: &str = "*";

/// Origin allow-list and header policy.
#[derive(Debug, Clone)]
pub struct Cors {
    allow_any: bool,
    origins: Arc<[String]>,
    max_age: HeaderValue,
}

impl Cors {
    pub fn from_config(config: &CorsConfig) -> Self {
        Self {
            allow_any: config.allowed_origins.iter().any(|o| o == ANY_ORIGIN),
            origins: config.allowed_origins.iter().cloned().collect(),
            max_age: HeaderValue::from(config.max_age_secs),
        }
    }

    /// Value for `Access-Control-Allow-Origin`, if the origin is allowed.
    pub fn allow_origin(&self, origin: Option<&HeaderValue>) -> Option<HeaderValue> {
        if self.allow_any {
            return Some(HeaderValue::from_static(ANY_ORIGIN));
        }
        let origin = origin?;
        let text = origin.to_str().ok()?;
        self.origins
            .iter()
            .any(|allowed| allowed == text)
            .then(|| origin.clone())
    }

    /// Attach access-control headers to a response.
    pub fn decorate(&self, origin: Option<&HeaderValue>, mut response: Response) -> Response {
        let headers = response.headers_mut();
        if let Some(allowed) = self.allow_origin(origin) {
            headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, allowed);
            headers.insert(ACCESS_CONTROL_ALLOW_METHODS, ALLOWED_METHODS);
            headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, ALLOWED_HEADERS);
        }
        if !self.allow_any {
            headers.append(VARY, HeaderValue::from_static("Origin"));
        }
        response
    }

    /// Response to a preflight request.
    pub fn preflight(&self, origin: Option<&HeaderValue>) -> Response {
        let mut response = self.decorate(origin, StatusCode::NO_CONTENT.into_response());
        if response.headers().contains_key(ACCESS_CONTROL_ALLOW_ORIGIN) {
            response
                .headers_mut()
                .insert(ACCESS_CONTROL_MAX_AGE, self.max_age.clone());
        }
        response
    }
}

/// Middleware applying [`Cors`] to every response.
pub async fn cors_middleware(
    State(cors): State<Cors>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let origin = request.headers().get(ORIGIN).cloned();

    if request.method() == Method::OPTIONS && origin.is_some() {
        return cors.preflight(origin.as_ref());
    }

    let response = next.run(request).await;
    cors.decorate(origin.as_ref(), response)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cors(origins: &[&str]) -> Cors {
        Cors::from_config(&CorsConfig {
            allowed_origins: origins.iter().map(|o| o.to_string()).collect(),
            max_age_secs: 600,
        })
    }

    fn origin(value: &'static str) -> HeaderValue {
        HeaderValue::from_static(value)
    }

    #[test]
    fn test_allow_list_echoes_origin() {
        let cors = cors(&["https://blento.app", "https://www.blento.app"]);
        let response = cors.decorate(
            Some(&origin("https://www.blento.app")),
            StatusCode::OK.into_response(),
        );

        let headers = response.headers();
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], "https://www.blento.app");
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_METHODS], "GET, OPTIONS");
        assert_eq!(headers[VARY], "Origin");
    }

    #[test]
    fn test_unlisted_origin_gets_no_allow_header() {
        let cors = cors(&["https://blento.app"]);
        let response = cors.decorate(
            Some(&origin("https://evil.example")),
            StatusCode::OK.into_response(),
        );

        assert!(!response.headers().contains_key(ACCESS_CONTROL_ALLOW_ORIGIN));
        assert_eq!(response.headers()[VARY], "Origin");
    }

    #[test]
    fn test_wildcard() {
        let cors = cors(&["*"]);
        let response = cors.decorate(None, StatusCode::BAD_REQUEST.into_response());

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert!(!response.headers().contains_key(VARY));
    }

    #[test]
    fn test_preflight_carries_max_age() {
        let cors = cors(&["https://blento.app"]);

        let allowed = cors.preflight(Some(&origin("https://blento.app")));
        assert_eq!(allowed.status(), StatusCode::NO_CONTENT);
        assert_eq!(allowed.headers()[ACCESS_CONTROL_MAX_AGE], "600");

        let denied = cors.preflight(Some(&origin("https://other.app")));
        assert!(!denied.headers().contains_key(ACCESS_CONTROL_MAX_AGE));
    }
}
