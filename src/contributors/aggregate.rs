//! Page-by-page contributor aggregation.
//!
//! Pages are fetched strictly in sequence; each continuation decision
//! depends on the page just received. A page body that is not a list ends
//! the walk with the pages already collected. Any other upstream error,
//! including running past the page ceiling, aborts the whole aggregation
//! and discards what was already collected.

use std::future::Future;

use serde_json::Value;

use crate::contributors::normalize::{decode_entries, ContributorRecord};
use crate::upstream::{ContributorsRequest, GithubClient, UpstreamError, UpstreamResult};

/// A source of numbered contributor pages.
pub trait ContributorPages {
    /// Fetch page `page` (1-based) of `per_page` entries as raw JSON.
    fn fetch_page(
        &self,
        page: u32,
        per_page: u32,
    ) -> impl Future<Output = UpstreamResult<Value>> + Send;
}

/// Anonymous-inclusive pages of one repository's contributors.
#[derive(Debug, Clone, Copy)]
pub struct RepoContributors<'a> {
    pub client: &'a GithubClient,
    pub owner: &'a str,
    pub repo: &'a str,
}

impl ContributorPages for RepoContributors<'_> {
    async fn fetch_page(&self, page: u32, per_page: u32) -> UpstreamResult<Value> {
        self.client
            .contributors(ContributorsRequest {
                owner: self.owner,
                repo: self.repo,
                per_page,
                page: Some(page),
                include_anonymous: true,
            })
            .await
    }
}

/// Paging parameters for one aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregationLimits {
    pub page_size: u32,
    /// Fail once this many full pages have been fetched.
    pub max_pages: Option<u32>,
}

/// Why aggregation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A page shorter than the page size: normal end of data.
    ShortPage,
    /// An empty page.
    EmptyPage,
    /// A page body that was not a JSON array.
    NotAList,
}

/// Result of a completed aggregation.
#[derive(Debug, Clone)]
pub struct Aggregation {
    pub records: Vec<ContributorRecord>,
    /// Number of upstream pages requested.
    pub pages_fetched: u32,
    pub stop: StopReason,
}

/// Fetch pages starting at 1 until the data runs out.
pub async fn aggregate<P>(source: &P, limits: AggregationLimits) -> UpstreamResult<Aggregation>
where
    P: ContributorPages + ?Sized,
{
    let page_size = limits.page_size;
    let mut records = Vec::new();
    let mut page = 1u32;

    let stop = loop {
        if let Some(max) = limits.max_pages.filter(|&max| page > max) {
            tracing::warn!(
                max_pages = max,
                collected = records.len(),
                "Contributor page limit reached"
            );
            return Err(UpstreamError::PageLimit(max));
        }

        let body = match source.fetch_page(page, page_size).await {
            Ok(body) => body,
            Err(UpstreamError::Malformed(detail)) => {
                tracing::debug!(page, detail = %detail, "Undecodable contributor page");
                break StopReason::NotAList;
            }
            Err(e) => return Err(e),
        };
        let Value::Array(entries) = body else {
            break StopReason::NotAList;
        };
        if entries.is_empty() {
            break StopReason::EmptyPage;
        }

        let len = entries.len();
        tracing::debug!(page, len, "Contributor page received");
        records.extend(decode_entries::<ContributorRecord>(entries));

        if len < page_size as usize {
            break StopReason::ShortPage;
        }
        page += 1;
    };

    tracing::debug!(
        pages = page,
        records = records.len(),
        stop = ?stop,
        "Contributor aggregation finished"
    );

    Ok(Aggregation {
        records,
        pages_fetched: page,
        stop,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::UpstreamError;
    use reqwest::StatusCode;
    use serde_json::json;
    use std::sync::Mutex;

    /// Replays scripted page bodies and records which pages were asked for.
    struct ScriptedPages {
        pages: Vec<UpstreamResult<Value>>,
        requested: Mutex<Vec<(u32, u32)>>,
    }

    impl ScriptedPages {
        fn new(pages: Vec<UpstreamResult<Value>>) -> Self {
            Self {
                pages,
                requested: Mutex::new(Vec::new()),
            }
        }

        fn of_sizes(sizes: &[usize]) -> Self {
            Self::new(sizes.iter().map(|&n| Ok(page_of(n))).collect())
        }

        fn calls(&self) -> Vec<(u32, u32)> {
            self.requested.lock().unwrap().clone()
        }
    }

    impl ContributorPages for ScriptedPages {
        async fn fetch_page(&self, page: u32, per_page: u32) -> UpstreamResult<Value> {
            self.requested.lock().unwrap().push((page, per_page));
            match self.pages.get(page as usize - 1) {
                Some(Ok(body)) => Ok(body.clone()),
                Some(Err(UpstreamError::Status { status, .. })) => {
                    Err(UpstreamError::from_status(*status))
                }
                Some(Err(UpstreamError::Malformed(detail))) => {
                    Err(UpstreamError::Malformed(detail.clone()))
                }
                Some(Err(other)) => panic!("unsupported scripted error: {other}"),
                None => Ok(json!([])),
            }
        }
    }

    fn page_of(n: usize) -> Value {
        Value::Array(
            (0..n)
                .map(|i| json!({"login": format!("user{i}"), "contributions": 1, "type": "User"}))
                .collect(),
        )
    }

    const LIMITS: AggregationLimits = AggregationLimits {
        page_size: 100,
        max_pages: None,
    };

    #[tokio::test]
    async fn test_collects_until_short_page() {
        let source = ScriptedPages::of_sizes(&[100, 100, 37]);

        let result = aggregate(&source, LIMITS).await.unwrap();

        assert_eq!(result.records.len(), 237);
        assert_eq!(result.pages_fetched, 3);
        assert_eq!(result.stop, StopReason::ShortPage);
        assert_eq!(source.calls(), vec![(1, 100), (2, 100), (3, 100)]);
    }

    #[tokio::test]
    async fn test_stops_on_empty_page() {
        let source = ScriptedPages::of_sizes(&[100, 0]);

        let result = aggregate(&source, LIMITS).await.unwrap();

        assert_eq!(result.records.len(), 100);
        assert_eq!(result.stop, StopReason::EmptyPage);
        assert_eq!(source.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_non_list_page_keeps_prior_pages() {
        let source = ScriptedPages::new(vec![
            Ok(page_of(100)),
            Ok(json!({"message": "Something odd"})),
            Ok(page_of(100)),
        ]);

        let result = aggregate(&source, LIMITS).await.unwrap();

        assert_eq!(result.records.len(), 100);
        assert_eq!(result.stop, StopReason::NotAList);
        assert_eq!(source.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_upstream_error_discards_partial_results() {
        let source = ScriptedPages::new(vec![
            Ok(page_of(100)),
            Err(UpstreamError::from_status(StatusCode::FORBIDDEN)),
        ]);

        let err = aggregate(&source, LIMITS).await.unwrap_err();

        match err {
            UpstreamError::Status { status, .. } => assert_eq!(status, StatusCode::FORBIDDEN),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_undecodable_page_keeps_prior_pages() {
        let source = ScriptedPages::new(vec![
            Ok(page_of(100)),
            Err(UpstreamError::Malformed("expected value at line 1".into())),
        ]);

        let result = aggregate(&source, LIMITS).await.unwrap();

        assert_eq!(result.records.len(), 100);
        assert_eq!(result.stop, StopReason::NotAList);
        assert_eq!(result.pages_fetched, 2);
    }

    #[tokio::test]
    async fn test_page_limit_is_an_error() {
        let source = ScriptedPages::of_sizes(&[100, 100, 100, 100]);
        let limits = AggregationLimits {
            page_size: 100,
            max_pages: Some(2),
        };

        let err = aggregate(&source, limits).await.unwrap_err();

        assert!(matches!(err, UpstreamError::PageLimit(2)));
        assert_eq!(source.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_short_page_within_limit() {
        let source = ScriptedPages::of_sizes(&[100, 40]);
        let limits = AggregationLimits {
            page_size: 100,
            max_pages: Some(2),
        };

        let result = aggregate(&source, limits).await.unwrap();

        assert_eq!(result.records.len(), 140);
        assert_eq!(result.stop, StopReason::ShortPage);
    }

    #[tokio::test]
    async fn test_anonymous_entries_survive_aggregation() {
        let source = ScriptedPages::new(vec![Ok(json!([
            {"login": "octocat", "avatar_url": "a", "contributions": 9, "type": "User"},
            {"type": "Anonymous", "name": "bot1", "contributions": 5}
        ]))]);

        let result = aggregate(&source, LIMITS).await.unwrap();

        assert_eq!(result.records.len(), 2);
        assert!(result.records[1].anonymous);
        assert_eq!(result.records[1].username, "bot1");
    }
}
