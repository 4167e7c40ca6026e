//! Configuration validation.
//!
//! Serde handles syntax; this module checks value ranges and URLs.
//! All errors are collected so one run reports every problem.

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::ServiceConfig;

/// A single semantic problem in a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    BindAddress(String),

    #[error("{field} '{value}' is not an absolute http(s) URL")]
    UpstreamUrl { field: &'static str, value: String },

    #[error("upstream.token_env must not be empty")]
    EmptyTokenEnv,

    #[error("contributors.{field} must be between 1 and {max}, got {value}")]
    PageSize {
        field: &'static str,
        value: u32,
        max: u32,
    },

    #[error("contributors.max_pages must be at least 1")]
    ZeroMaxPages,

    #[error("cors.allowed_origins must not be empty")]
    NoOrigins,

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("observability.metrics_address '{0}' is not a socket address")]
    MetricsAddress(String),
}

/// Upstream hard limit on page size.
const UPSTREAM_MAX_PAGE_SIZE: u32 = 100;

/// Validate a configuration, returning every problem found.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    for (field, value) in [
        ("upstream.api_base_url", &config.upstream.api_base_url),
        ("upstream.graphql_url", &config.upstream.graphql_url),
    ] {
        if !is_http_url(value) {
            errors.push(ValidationError::UpstreamUrl {
                field,
                value: value.clone(),
            });
        }
    }

    if config.upstream.token_env.trim().is_empty() {
        errors.push(ValidationError::EmptyTokenEnv);
    }

    let contributors = &config.contributors;
    check_page_size(
        &mut errors,
        "max_per_page",
        contributors.max_per_page,
        UPSTREAM_MAX_PAGE_SIZE,
    );
    check_page_size(
        &mut errors,
        "default_per_page",
        contributors.default_per_page,
        contributors.max_per_page.min(UPSTREAM_MAX_PAGE_SIZE),
    );
    check_page_size(
        &mut errors,
        "aggregate_page_size",
        contributors.aggregate_page_size,
        UPSTREAM_MAX_PAGE_SIZE,
    );
    if contributors.max_pages == Some(0) {
        errors.push(ValidationError::ZeroMaxPages);
    }

    if config.cors.allowed_origins.is_empty() {
        errors.push(ValidationError::NoOrigins);
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_page_size(errors: &mut Vec<ValidationError>, field: &'static str, value: u32, max: u32) {
    if value == 0 || value > max {
        errors.push(ValidationError::PageSize { field, value, max });
    }
}

fn is_http_url(value: &str) -> bool {
    Url::parse(value)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
        .unwrap_or(false)
}
