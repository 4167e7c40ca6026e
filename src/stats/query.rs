//! GraphQL documents for profile statistics.
//!
//! Both subject forms spread the same fragment on `User`, so the
//! authenticated-viewer and named-user documents request identical fields.

use serde_json::{json, Value};

macro_rules! profile_fields {
    () => {
        r#"
fragment ProfileFields on User {
  login
  avatarUrl
  contributionsCollection {
    totalCommitContributions
    totalIssueContributions
    totalPullRequestContributions
    totalPullRequestReviewContributions
    contributionCalendar {
      totalContributions
      weeks {
        contributionDays {
          date
          contributionCount
          color
        }
      }
    }
  }
  repositories(
    first: 100
    ownerAffiliations: OWNER
    privacy: PUBLIC
    orderBy: { field: STARGAZERS, direction: DESC }
  ) {
    totalCount
    nodes {
      name
      description
      stargazerCount
      forkCount
      watchers {
        totalCount
      }
      createdAt
      updatedAt
      languages(first: 10) {
        totalSize
        edges {
          size
          node {
            name
            color
          }
        }
      }
    }
  }
  starredRepositories {
    totalCount
  }
  followers {
    totalCount
  }
  following {
    totalCount
  }
  issues_sum: issues {
    totalCount
  }
  issues_open: issues(states: OPEN) {
    totalCount
  }
  issues_closed: issues(states: CLOSED) {
    totalCount
  }
  pr_sum: pullRequests {
    totalCount
  }
  pr_open: pullRequests(states: OPEN) {
    totalCount
  }
  pr_closed: pullRequests(states: CLOSED) {
    totalCount
  }
  pr_merged: pullRequests(states: MERGED) {
    totalCount
  }
  status {
    emoji
    message
    expiresAt
    updatedAt
  }
}
"#
    };
}

macro_rules! calendar_fields {
    () => {
        r#"
fragment CalendarFields on User {
  login
  contributionsCollection {
    contributionCalendar {
      totalContributions
      weeks {
        contributionDays {
          date
          contributionCount
          color
        }
      }
    }
  }
}
"#
    };
}

const VIEWER_PROFILE: &str = concat!(
    "query ViewerProfile {\n  viewer {\n    ...ProfileFields\n  }\n}\n",
    profile_fields!()
);

const USER_PROFILE: &str = concat!(
    "query UserProfile($login: String!) {\n  user(login: $login) {\n    ...ProfileFields\n  }\n}\n",
    profile_fields!()
);

const VIEWER_CALENDAR: &str = concat!(
    "query ViewerCalendar {\n  viewer {\n    ...CalendarFields\n  }\n}\n",
    calendar_fields!()
);

const USER_CALENDAR: &str = concat!(
    "query UserCalendar($login: String!) {\n  user(login: $login) {\n    ...CalendarFields\n  }\n}\n",
    calendar_fields!()
);

/// Whose statistics are requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    /// The account owning the upstream credential (`viewer` root field).
    Viewer,
    /// An arbitrary account by login (`user(login:)` root field).
    User(String),
}

/// Which field set is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Calendar, repositories, social counts, issues, PRs and status.
    Profile,
    /// Contribution calendar only.
    Calendar,
}

/// A ready-to-send GraphQL document and its variables.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsQuery {
    pub document: &'static str,
    pub variables: Option<Value>,
}

impl StatsQuery {
    pub fn new(scope: Scope, subject: &Subject) -> Self {
        match (scope, subject) {
            (Scope::Profile, Subject::Viewer) => Self::fixed(VIEWER_PROFILE),
            (Scope::Calendar, Subject::Viewer) => Self::fixed(VIEWER_CALENDAR),
            (Scope::Profile, Subject::User(login)) => Self::for_login(USER_PROFILE, login),
            (Scope::Calendar, Subject::User(login)) => Self::for_login(USER_CALENDAR, login),
        }
    }

    fn fixed(document: &'static str) -> Self {
        Self {
            document,
            variables: None,
        }
    }

    fn for_login(document: &'static str, login: &str) -> Self {
        Self {
            document,
            variables: Some(json!({ "login": login })),
        }
    }
}
