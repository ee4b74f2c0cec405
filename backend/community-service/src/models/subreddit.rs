use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Who may submit to a subreddit
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubredditKind {
    /// Anyone may view and submit
    #[default]
    Public,
    /// Anyone may view, approved users submit
    Restricted,
    /// Only approved users view and submit
    Private,
}

impl SubredditKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubredditKind::Public => "public",
            SubredditKind::Restricted => "restricted",
            SubredditKind::Private => "private",
        }
    }
}

impl FromStr for SubredditKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(SubredditKind::Public),
            "restricted" => Ok(SubredditKind::Restricted),
            "private" => Ok(SubredditKind::Private),
            other => Err(format!("unknown subreddit kind '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Subreddit {
    pub id: Uuid,
    pub name: String,
    pub title: String,
    pub description: String,
    pub kind: String,
    pub nsfw: bool,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Subreddit {
    /// Unknown stored values are treated as the most restrictive kind.
    pub fn kind(&self) -> SubredditKind {
        self.kind.parse().unwrap_or(SubredditKind::Private)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SubredditResponse {
    pub id: Uuid,
    pub name: String,
    pub title: String,
    pub description: String,
    pub kind: SubredditKind,
    pub nsfw: bool,
    pub owner_id: Uuid,
    pub member_count: i64,
    pub created_at: DateTime<Utc>,
}

impl SubredditResponse {
    pub fn new(subreddit: Subreddit, member_count: i64) -> Self {
        let kind = subreddit.kind();
        Self {
            id: subreddit.id,
            name: subreddit.name,
            title: subreddit.title,
            description: subreddit.description,
            kind,
            nsfw: subreddit.nsfw,
            owner_id: subreddit.owner_id,
            member_count,
            created_at: subreddit.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSubredditRequest {
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    pub kind: Option<SubredditKind>,
    pub nsfw: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateSubredditRequest {
    #[validate(length(min = 1, max = 100))]
    pub title: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    pub kind: Option<SubredditKind>,
    pub nsfw: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_storage_string() {
        for kind in [
            SubredditKind::Public,
            SubredditKind::Restricted,
            SubredditKind::Private,
        ] {
            assert_eq!(kind.as_str().parse::<SubredditKind>().unwrap(), kind);
        }
        assert!("secret".parse::<SubredditKind>().is_err());
    }

    #[test]
    fn kind_deserializes_lowercase() {
        let kind: SubredditKind = serde_json::from_str("\"restricted\"").unwrap();
        assert_eq!(kind, SubredditKind::Restricted);
    }
}
