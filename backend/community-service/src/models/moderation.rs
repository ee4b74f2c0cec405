use chrono::{DateTime, Utc};
use cursor_pagination::Paginable;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Moderator permission
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// Implies every other permission
    Everything,
    /// Approved, muted and banned users
    Access,
    /// Subreddit settings
    Config,
    Flair,
    /// Removing and locking content
    Posts,
    Mail,
}

impl Permission {
    pub const ALL: [Permission; 6] = [
        Permission::Everything,
        Permission::Access,
        Permission::Config,
        Permission::Flair,
        Permission::Posts,
        Permission::Mail,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Everything => "everything",
            Permission::Access => "access",
            Permission::Config => "config",
            Permission::Flair => "flair",
            Permission::Posts => "posts",
            Permission::Mail => "mail",
        }
    }

    /// Parse stored permission strings, skipping unknown values.
    pub fn parse_list(values: &[String]) -> Vec<Permission> {
        values.iter().filter_map(|v| v.parse().ok()).collect()
    }

    /// Storage form with duplicates removed, in canonical order.
    pub fn to_storage(permissions: &[Permission]) -> Vec<String> {
        Permission::ALL
            .iter()
            .filter(|p| permissions.contains(p))
            .map(|p| p.as_str().to_string())
            .collect()
    }
}

impl FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "everything" => Ok(Permission::Everything),
            "access" => Ok(Permission::Access),
            "config" => Ok(Permission::Config),
            "flair" => Ok(Permission::Flair),
            "posts" => Ok(Permission::Posts),
            "mail" => Ok(Permission::Mail),
            other => Err(format!("unknown permission '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeratorStatus {
    Invited,
    Active,
}

impl ModeratorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModeratorStatus::Invited => "invited",
            ModeratorStatus::Active => "active",
        }
    }
}

impl FromStr for ModeratorStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "invited" => Ok(ModeratorStatus::Invited),
            "active" => Ok(ModeratorStatus::Active),
            other => Err(format!("unknown moderator status '{}'", other)),
        }
    }
}

/// Row of `subreddit_moderators`
#[derive(Debug, Clone, FromRow)]
pub struct ModeratorRecord {
    pub subreddit_id: Uuid,
    pub user_id: Uuid,
    pub status: String,
    pub permissions: Vec<String>,
    pub invited_by: Option<Uuid>,
    pub invited_at: DateTime<Utc>,
    pub moderator_since: Option<DateTime<Utc>>,
}

impl ModeratorRecord {
    pub fn status(&self) -> Option<ModeratorStatus> {
        self.status.parse().ok()
    }

    pub fn is_active(&self) -> bool {
        self.status() == Some(ModeratorStatus::Active)
    }
}

/// Entry of the moderator and invited-moderator listings
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ModeratorEntry {
    pub user_id: Uuid,
    pub username: String,
    pub permissions: Vec<String>,
    pub invited_at: DateTime<Utc>,
    pub moderator_since: Option<DateTime<Utc>>,
}

impl Paginable for ModeratorEntry {
    type Id = Uuid;

    fn cursor_id(&self) -> &Uuid {
        &self.user_id
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ApprovedEntry {
    pub user_id: Uuid,
    pub username: String,
    pub approved_by: Option<Uuid>,
    pub approved_at: DateTime<Utc>,
}

impl Paginable for ApprovedEntry {
    type Id = Uuid;

    fn cursor_id(&self) -> &Uuid {
        &self.user_id
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MutedEntry {
    pub user_id: Uuid,
    pub username: String,
    pub reason: String,
    pub muted_by: Option<Uuid>,
    pub muted_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Paginable for MutedEntry {
    type Id = Uuid;

    fn cursor_id(&self) -> &Uuid {
        &self.user_id
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BannedEntry {
    pub user_id: Uuid,
    pub username: String,
    pub reason: String,
    pub note: String,
    pub banned_by: Option<Uuid>,
    pub banned_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Paginable for BannedEntry {
    type Id = Uuid;

    fn cursor_id(&self) -> &Uuid {
        &self.user_id
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UsernameRequest {
    #[validate(length(min = 1, max = 32))]
    pub username: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InviteModeratorRequest {
    #[validate(length(min = 1, max = 32))]
    pub username: String,
    /// Defaults to `everything`
    pub permissions: Option<Vec<Permission>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetPermissionsRequest {
    pub permissions: Vec<Permission>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MuteRequest {
    #[validate(length(min = 1, max = 32))]
    pub username: String,
    #[validate(length(max = 100))]
    pub reason: Option<String>,
    /// Permanent when absent
    #[validate(range(min = 1, max = 999))]
    pub duration_days: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BanRequest {
    #[validate(length(min = 1, max = 32))]
    pub username: String,
    #[validate(length(min = 1, max = 100))]
    pub reason: String,
    #[validate(length(max = 300))]
    pub note: Option<String>,
    /// Permanent when absent
    #[validate(range(min = 1, max = 999))]
    pub duration_days: Option<i64>,
}
