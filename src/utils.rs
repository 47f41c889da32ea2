use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::tree::PostSort;

/// Query parameters shared by the listing endpoints: `limit`, `since`,
/// `desc`, and (for thread posts) `sort`.
///
/// `since` stays a raw string because its meaning depends on the listing:
/// a post id for posts, a creation timestamp for threads, a nickname for
/// forum users.
#[derive(Debug, Default, Deserialize)]
pub struct ListingParams {
    pub limit: Option<i64>,
    pub since: Option<String>,
    #[serde(default)]
    pub desc: bool,
    pub sort: Option<String>,
}

impl ListingParams {
    pub fn sort(&self) -> PostSort {
        PostSort::from_param(self.sort.as_deref())
    }

    /// `since` as a post-id cursor; non-numeric input means no cursor.
    pub fn since_id(&self) -> Option<i64> {
        self.since.as_deref().and_then(|s| s.parse().ok())
    }

    /// `since` as a creation-time boundary for thread listings.
    pub fn since_time(&self) -> Option<DateTime<Utc>> {
        self.since
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn since_str(&self) -> Option<&str> {
        self.since.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn since_id_ignores_garbage() {
        let params = ListingParams {
            since: Some("not-a-number".into()),
            ..Default::default()
        };
        assert_eq!(params.since_id(), None);

        let params = ListingParams {
            since: Some("42".into()),
            ..Default::default()
        };
        assert_eq!(params.since_id(), Some(42));
    }

    #[test]
    fn since_time_parses_rfc3339() {
        let params = ListingParams {
            since: Some("2024-03-01T12:00:00+03:00".into()),
            ..Default::default()
        };
        let parsed = params.since_time().expect("valid timestamp");
        assert_eq!(parsed.timezone(), Utc);
    }
}
