//! Contributor record shapes and normalization.

use serde::Serialize;
use serde_json::Value;

/// Upstream `type` value marking an anonymous contributor.
const ANONYMOUS_TYPE: &str = "Anonymous";

/// Username used when an entry carries no identity at all.
const ANONYMOUS_USERNAME: &str = "anonymous";

/// One raw entry of the upstream contributor listing.
///
/// Registered accounts carry `login`/`avatar_url`; anonymous entries
/// (only present with `anon=1`) carry `name`/`email` instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawContributor {
    pub login: Option<String>,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub contributions: u64,
    pub kind: Option<String>,
}

impl RawContributor {
    /// Read an entry field by field. Fields of an unexpected type count as
    /// absent; only non-objects yield `None`.
    pub fn from_value(entry: &Value) -> Option<Self> {
        let entry = entry.as_object()?;
        let text = |key: &str| entry.get(key).and_then(Value::as_str).map(str::to_string);

        Some(Self {
            login: text("login"),
            name: text("name"),
            avatar_url: text("avatar_url"),
            contributions: entry
                .get("contributions")
                .and_then(Value::as_u64)
                .unwrap_or(0),
            kind: text("type"),
        })
    }

    /// Login, else display name, else `"anonymous"`. Empty strings count as absent.
    pub fn username(&self) -> String {
        non_empty(&self.login)
            .or_else(|| non_empty(&self.name))
            .unwrap_or(ANONYMOUS_USERNAME)
            .to_string()
    }

    pub fn is_anonymous(&self) -> bool {
        self.kind.as_deref() == Some(ANONYMOUS_TYPE)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Single-page listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributorSummary {
    pub username: String,
    pub avatar_url: Option<String>,
    pub contributions: u64,
}

/// Full-aggregation entry, including the anonymous marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributorRecord {
    pub username: String,
    pub avatar_url: Option<String>,
    pub contributions: u64,
    pub anonymous: bool,
}

impl From<RawContributor> for ContributorSummary {
    fn from(raw: RawContributor) -> Self {
        Self {
            username: raw.username(),
            avatar_url: raw.avatar_url,
            contributions: raw.contributions,
        }
    }
}

impl From<RawContributor> for ContributorRecord {
    fn from(raw: RawContributor) -> Self {
        Self {
            username: raw.username(),
            anonymous: raw.is_anonymous(),
            avatar_url: raw.avatar_url,
            contributions: raw.contributions,
        }
    }
}

/// Decode the entries of one page, skipping elements that are not objects.
pub fn decode_entries<T>(entries: Vec<Value>) -> impl Iterator<Item = T>
where
    T: From<RawContributor>,
{
    entries.into_iter().filter_map(|entry| {
        let raw = RawContributor::from_value(&entry);
        if raw.is_none() {
            tracing::debug!(entry = %entry, "Skipping non-object contributor entry");
        }
        raw.map(T::from)
    })
}
