//! Moderator permissions and subreddit access rules

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{ModeratorRecord, Permission, SubredditKind};

pub const MAX_RESTRICTION_DAYS: i64 = 999;

/// What the caller may do as a moderator of one subreddit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeratorAccess {
    pub user_id: Uuid,
    pub is_owner: bool,
    permissions: Vec<Permission>,
}

impl ModeratorAccess {
    /// Build from the caller's moderator row. Only active moderators (and the
    /// owner) get access.
    pub fn resolve(
        owner_id: Uuid,
        user_id: Uuid,
        record: Option<&ModeratorRecord>,
    ) -> Option<Self> {
        let is_owner = owner_id == user_id;
        match record {
            Some(record) if record.is_active() => Some(Self {
                user_id,
                is_owner,
                permissions: Permission::parse_list(&record.permissions),
            }),
            _ if is_owner => Some(Self {
                user_id,
                is_owner,
                permissions: vec![Permission::Everything],
            }),
            _ => None,
        }
    }

    pub fn has(&self, permission: Permission) -> bool {
        self.is_owner
            || self.permissions.contains(&Permission::Everything)
            || self.permissions.contains(&permission)
    }

    pub fn require(&self, permission: Permission) -> Result<()> {
        if self.has(permission) {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "moderator permission '{}' required",
                permission.as_str()
            )))
        }
    }

    pub fn permissions(&self) -> &[Permission] {
        &self.permissions
    }
}

/// Require moderator access with a permission
pub fn require_permission(
    access: Option<&ModeratorAccess>,
    permission: Permission,
) -> Result<&ModeratorAccess> {
    let access = access.ok_or_else(|| AppError::Forbidden("moderator access required".into()))?;
    access.require(permission)?;
    Ok(access)
}

/// A ban or mute with this expiry is still in force at `now`
pub fn restriction_active(expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    match expires_at {
        None => true,
        Some(at) => at > now,
    }
}

/// Expiry for an optional duration in days; `None` is permanent
pub fn expiry_from_days(days: Option<i64>, now: DateTime<Utc>) -> Result<Option<DateTime<Utc>>> {
    match days {
        None => Ok(None),
        Some(d) if (1..=MAX_RESTRICTION_DAYS).contains(&d) => Ok(Some(now + Duration::days(d))),
        Some(d) => Err(AppError::Validation(format!(
            "duration must be between 1 and {} days, got {}",
            MAX_RESTRICTION_DAYS, d
        ))),
    }
}

/// Caller's standing in a subreddit, used by the visibility rules
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Standing {
    pub is_moderator: bool,
    pub is_approved: bool,
    pub is_banned: bool,
}

pub fn can_view(kind: SubredditKind, standing: Standing) -> bool {
    match kind {
        SubredditKind::Public | SubredditKind::Restricted => true,
        SubredditKind::Private => standing.is_moderator || standing.is_approved,
    }
}

pub fn can_submit(kind: SubredditKind, standing: Standing) -> bool {
    if standing.is_banned {
        return false;
    }
    match kind {
        SubredditKind::Public => true,
        SubredditKind::Restricted | SubredditKind::Private => {
            standing.is_moderator || standing.is_approved
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(status: &str, permissions: &[&str]) -> ModeratorRecord {
        ModeratorRecord {
            subreddit_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            status: status.to_string(),
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
            invited_by: None,
            invited_at: Utc::now(),
            moderator_since: None,
        }
    }

    #[test]
    fn owner_has_everything_without_a_row() {
        let owner = Uuid::new_v4();
        let access = ModeratorAccess::resolve(owner, owner, None).unwrap();
        assert!(access.is_owner);
        for permission in Permission::ALL {
            assert!(access.has(permission));
        }
    }

    #[test]
    fn invited_moderator_has_no_access() {
        let rec = record("invited", &["everything"]);
        assert!(ModeratorAccess::resolve(Uuid::new_v4(), rec.user_id, Some(&rec)).is_none());
    }

    #[test]
    fn scoped_permissions() {
        let rec = record("active", &["flair", "posts"]);
        let access = ModeratorAccess::resolve(Uuid::new_v4(), rec.user_id, Some(&rec)).unwrap();
        assert!(access.has(Permission::Flair));
        assert!(access.has(Permission::Posts));
        assert!(!access.has(Permission::Access));
        assert!(matches!(
            access.require(Permission::Config),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn everything_implies_all() {
        let rec = record("active", &["everything"]);
        let access = ModeratorAccess::resolve(Uuid::new_v4(), rec.user_id, Some(&rec)).unwrap();
        assert!(access.has(Permission::Mail));
    }

    #[test]
    fn non_moderator_is_forbidden() {
        assert!(matches!(
            require_permission(None, Permission::Access),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn restriction_expiry() {
        let now = Utc::now();
        assert!(restriction_active(None, now));
        assert!(restriction_active(Some(now + Duration::seconds(1)), now));
        assert!(!restriction_active(Some(now), now));
        assert!(!restriction_active(Some(now - Duration::days(1)), now));
    }

    #[test]
    fn duration_bounds() {
        let now = Utc::now();
        assert_eq!(expiry_from_days(None, now).unwrap(), None);
        assert_eq!(
            expiry_from_days(Some(3), now).unwrap(),
            Some(now + Duration::days(3))
        );
        assert!(expiry_from_days(Some(999), now).is_ok());
        assert!(expiry_from_days(Some(0), now).is_err());
        assert!(expiry_from_days(Some(1000), now).is_err());
    }

    #[test]
    fn submission_policy() {
        let nobody = Standing::default();
        let approved = Standing {
            is_approved: true,
            ..Standing::default()
        };
        let banned_mod = Standing {
            is_moderator: true,
            is_banned: true,
            ..Standing::default()
        };

        assert!(can_submit(SubredditKind::Public, nobody));
        assert!(!can_submit(SubredditKind::Restricted, nobody));
        assert!(can_submit(SubredditKind::Restricted, approved));
        assert!(!can_submit(SubredditKind::Private, nobody));
        assert!(!can_submit(SubredditKind::Public, banned_mod));

        assert!(can_view(SubredditKind::Restricted, nobody));
        assert!(!can_view(SubredditKind::Private, nobody));
        assert!(can_view(SubredditKind::Private, approved));
    }
}
