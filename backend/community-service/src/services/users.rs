/// User service - profiles and follows
use sqlx::PgPool;

use crate::app_state::AppState;
use crate::db::user_repo;
use crate::error::{is_unique_violation, AppError, Result};
use crate::middleware::AuthenticatedUser;
use crate::models::{PublicProfile, UpdateProfileRequest, User};
use crate::services::notifications::{NotificationDispatcher, NotificationEvent};

/// Make sure the caller has a profile row, creating it from the token claims.
pub async fn ensure_caller(pool: &PgPool, caller: &AuthenticatedUser) -> Result<User> {
    if let Some(user) = user_repo::find_by_id(pool, caller.user_id).await? {
        return Ok(user);
    }

    validate_username(&caller.username)?;
    match user_repo::upsert_user(pool, caller.user_id, &caller.username).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, username = %user.username, "user provisioned");
            Ok(user)
        }
        Err(e) if is_unique_violation(&e) => Err(AppError::Conflict(format!(
            "username '{}' is taken",
            caller.username
        ))),
        Err(e) => Err(e.into()),
    }
}

pub async fn require_user_by_name(pool: &PgPool, username: &str) -> Result<User> {
    user_repo::find_by_username(pool, username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user '{}' not found", username)))
}

/// Path segments that sit beside `{username}` in the route table
const RESERVED_USERNAMES: &[&str] = &["invite", "invited", "accept"];

/// 3-32 characters of letters, digits, `_` or `-`, not a reserved segment
pub fn validate_username(username: &str) -> Result<()> {
    let valid_len = (3..=32).contains(&username.len());
    let valid_chars = username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    let reserved = RESERVED_USERNAMES
        .iter()
        .any(|word| word.eq_ignore_ascii_case(username));
    if valid_len && valid_chars && !reserved {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "invalid username '{}'",
            username
        )))
    }
}

pub struct UserService {
    pool: PgPool,
    notifier: NotificationDispatcher,
}

impl UserService {
    pub fn new(state: &AppState) -> Self {
        Self {
            pool: state.db.clone(),
            notifier: state.notifier.clone(),
        }
    }

    async fn profile_of(&self, user: User) -> Result<PublicProfile> {
        let followers = user_repo::follower_count(&self.pool, user.id).await?;
        Ok(PublicProfile::new(user, followers))
    }

    /// Idempotent profile provisioning for the caller
    pub async fn provision(&self, caller: &AuthenticatedUser) -> Result<PublicProfile> {
        let user = ensure_caller(&self.pool, caller).await?;
        self.profile_of(user).await
    }

    pub async fn me(&self, caller: &AuthenticatedUser) -> Result<PublicProfile> {
        let user = user_repo::find_by_id(&self.pool, caller.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("profile not provisioned".into()))?;
        self.profile_of(user).await
    }

    pub async fn profile(&self, username: &str) -> Result<PublicProfile> {
        let user = require_user_by_name(&self.pool, username).await?;
        self.profile_of(user).await
    }

    pub async fn update_profile(
        &self,
        caller: &AuthenticatedUser,
        req: &UpdateProfileRequest,
    ) -> Result<PublicProfile> {
        ensure_caller(&self.pool, caller).await?;
        let user = user_repo::update_profile(
            &self.pool,
            caller.user_id,
            req.display_name.as_deref(),
            req.about.as_deref(),
        )
        .await?
        .ok_or_else(|| AppError::NotFound("profile not found".into()))?;
        self.profile_of(user).await
    }

    pub async fn follow(&self, caller: &AuthenticatedUser, username: &str) -> Result<()> {
        let me = ensure_caller(&self.pool, caller).await?;
        let target = require_user_by_name(&self.pool, username).await?;
        if target.id == me.id {
            return Err(AppError::BadRequest("cannot follow yourself".into()));
        }

        if user_repo::follow(&self.pool, me.id, target.id).await? {
            self.notifier.enqueue(NotificationEvent::NewFollower {
                follower_id: me.id,
                follower_username: me.username,
                followed_id: target.id,
            });
        }
        Ok(())
    }

    pub async fn unfollow(&self, caller: &AuthenticatedUser, username: &str) -> Result<()> {
        let target = require_user_by_name(&self.pool, username).await?;
        if !user_repo::unfollow(&self.pool, caller.user_id, target.id).await? {
            return Err(AppError::NotFound(format!("not following '{}'", username)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usernames() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("a_b-c9").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username(&"x".repeat(33)).is_err());
        assert!(validate_username("with space").is_err());
    }

    #[test]
    fn route_segments_are_not_usernames() {
        for word in ["invite", "invited", "accept", "Accept"] {
            assert!(validate_username(word).is_err(), "{word} accepted");
        }
        assert!(validate_username("invitee").is_ok());
        assert!(validate_username("accepted_user").is_ok());
    }
}
