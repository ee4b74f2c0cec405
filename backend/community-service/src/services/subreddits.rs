/// Subreddit service - creation, settings, membership and the per-request
/// view of the caller's rights in a subreddit
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::db::{moderation_repo, subreddit_repo};
use crate::error::{is_unique_violation, AppError, Result};
use crate::middleware::AuthenticatedUser;
use crate::models::{
    BannedEntry, CreateSubredditRequest, MutedEntry, Permission, Subreddit, SubredditResponse,
    UpdateSubredditRequest,
};
use crate::services::permissions::{
    can_view, require_permission, restriction_active, ModeratorAccess, Standing,
};
use crate::services::users::ensure_caller;

/// 3-21 characters of letters, digits or `_`
pub fn validate_subreddit_name(name: &str) -> Result<()> {
    let valid_len = (3..=21).contains(&name.len());
    let valid_chars = name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid_len && valid_chars {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "subreddit name must be 3-21 letters, digits or underscores: '{}'",
            name
        )))
    }
}

pub async fn load_subreddit(pool: &PgPool, name: &str) -> Result<Subreddit> {
    subreddit_repo::find_by_name(pool, name)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("subreddit '{}' not found", name)))
}

/// In-force ban; an expired one is purged and reported as absent
pub async fn active_ban(pool: &PgPool, subreddit_id: Uuid, user_id: Uuid) -> Result<Option<BannedEntry>> {
    match moderation_repo::find_ban(pool, subreddit_id, user_id).await? {
        Some(ban) if restriction_active(ban.expires_at, Utc::now()) => Ok(Some(ban)),
        Some(_) => {
            moderation_repo::delete_ban(pool, subreddit_id, user_id).await?;
            tracing::debug!(%subreddit_id, %user_id, "expired ban purged");
            Ok(None)
        }
        None => Ok(None),
    }
}

/// In-force mute; an expired one is purged and reported as absent
pub async fn active_mute(pool: &PgPool, subreddit_id: Uuid, user_id: Uuid) -> Result<Option<MutedEntry>> {
    match moderation_repo::find_mute(pool, subreddit_id, user_id).await? {
        Some(mute) if restriction_active(mute.expires_at, Utc::now()) => Ok(Some(mute)),
        Some(_) => {
            moderation_repo::delete_mute(pool, subreddit_id, user_id).await?;
            tracing::debug!(%subreddit_id, %user_id, "expired mute purged");
            Ok(None)
        }
        None => Ok(None),
    }
}

/// A subreddit together with the caller's moderator rights in it
#[derive(Debug, Clone)]
pub struct SubredditContext {
    pub subreddit: Subreddit,
    pub caller_id: Uuid,
    pub access: Option<ModeratorAccess>,
}

impl SubredditContext {
    pub async fn load(pool: &PgPool, name: &str, caller_id: Uuid) -> Result<Self> {
        let subreddit = load_subreddit(pool, name).await?;
        Self::for_subreddit(pool, subreddit, caller_id).await
    }

    pub async fn for_subreddit(pool: &PgPool, subreddit: Subreddit, caller_id: Uuid) -> Result<Self> {
        let record = moderation_repo::find_moderator(pool, subreddit.id, caller_id).await?;
        let access = ModeratorAccess::resolve(subreddit.owner_id, caller_id, record.as_ref());
        Ok(Self {
            subreddit,
            caller_id,
            access,
        })
    }

    pub fn is_moderator(&self) -> bool {
        self.access.is_some()
    }

    pub fn require(&self, permission: Permission) -> Result<&ModeratorAccess> {
        require_permission(self.access.as_ref(), permission)
    }

    /// Any active moderator, regardless of permissions
    pub fn require_moderator(&self) -> Result<&ModeratorAccess> {
        self.access
            .as_ref()
            .ok_or_else(|| AppError::Forbidden("moderator access required".into()))
    }

    pub async fn standing(&self, pool: &PgPool) -> Result<Standing> {
        let is_approved =
            moderation_repo::is_approved(pool, self.subreddit.id, self.caller_id).await?;
        let is_banned = active_ban(pool, self.subreddit.id, self.caller_id)
            .await?
            .is_some();
        Ok(Standing {
            is_moderator: self.is_moderator(),
            is_approved,
            is_banned,
        })
    }

    /// Fails with 403 for callers who may not see a private subreddit
    pub async fn require_view(&self, pool: &PgPool) -> Result<Standing> {
        let standing = self.standing(pool).await?;
        if can_view(self.subreddit.kind(), standing) {
            Ok(standing)
        } else {
            Err(AppError::Forbidden(format!(
                "r/{} is private",
                self.subreddit.name
            )))
        }
    }
}

pub struct SubredditService {
    pool: PgPool,
}

impl SubredditService {
    pub fn new(state: &AppState) -> Self {
        Self {
            pool: state.db.clone(),
        }
    }

    async fn response(&self, subreddit: Subreddit) -> Result<SubredditResponse> {
        let members = subreddit_repo::member_count(&self.pool, subreddit.id).await?;
        Ok(SubredditResponse::new(subreddit, members))
    }

    pub async fn create(
        &self,
        caller: &AuthenticatedUser,
        req: &CreateSubredditRequest,
    ) -> Result<SubredditResponse> {
        validate_subreddit_name(&req.name)?;
        ensure_caller(&self.pool, caller).await?;

        let kind = req.kind.unwrap_or_default();
        let created = subreddit_repo::create_subreddit(
            &self.pool,
            subreddit_repo::NewSubreddit {
                name: &req.name,
                title: &req.title,
                description: req.description.as_deref().unwrap_or(""),
                kind: kind.as_str(),
                nsfw: req.nsfw.unwrap_or(false),
                owner_id: caller.user_id,
            },
        )
        .await;

        let subreddit = match created {
            Ok(subreddit) => subreddit,
            Err(e) if is_unique_violation(&e) => {
                return Err(AppError::Conflict(format!(
                    "subreddit '{}' already exists",
                    req.name
                )))
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(
            subreddit_id = %subreddit.id,
            name = %subreddit.name,
            owner_id = %caller.user_id,
            "subreddit created"
        );
        self.response(subreddit).await
    }

    pub async fn get(&self, name: &str) -> Result<SubredditResponse> {
        let subreddit = load_subreddit(&self.pool, name).await?;
        self.response(subreddit).await
    }

    pub async fn update_settings(
        &self,
        caller: &AuthenticatedUser,
        name: &str,
        req: &UpdateSubredditRequest,
    ) -> Result<SubredditResponse> {
        let ctx = SubredditContext::load(&self.pool, name, caller.user_id).await?;
        ctx.require(Permission::Config)?;

        let subreddit = subreddit_repo::update_settings(
            &self.pool,
            ctx.subreddit.id,
            req.title.as_deref(),
            req.description.as_deref(),
            req.kind.map(|k| k.as_str()),
            req.nsfw,
        )
        .await?;

        tracing::info!(subreddit_id = %subreddit.id, moderator_id = %caller.user_id, "subreddit settings updated");
        self.response(subreddit).await
    }

    pub async fn join(&self, caller: &AuthenticatedUser, name: &str) -> Result<()> {
        ensure_caller(&self.pool, caller).await?;
        let ctx = SubredditContext::load(&self.pool, name, caller.user_id).await?;
        let standing = ctx.standing(&self.pool).await?;
        if standing.is_banned {
            return Err(AppError::Forbidden(format!(
                "you are banned from r/{}",
                ctx.subreddit.name
            )));
        }
        if !can_view(ctx.subreddit.kind(), standing) {
            return Err(AppError::Forbidden(format!(
                "r/{} is private",
                ctx.subreddit.name
            )));
        }

        subreddit_repo::add_member(&self.pool, ctx.subreddit.id, caller.user_id).await?;
        Ok(())
    }

    pub async fn leave(&self, caller: &AuthenticatedUser, name: &str) -> Result<()> {
        let subreddit = load_subreddit(&self.pool, name).await?;
        if subreddit.owner_id == caller.user_id {
            return Err(AppError::Conflict(
                "the owner cannot leave their subreddit".into(),
            ));
        }
        if !subreddit_repo::remove_member(&self.pool, subreddit.id, caller.user_id).await? {
            return Err(AppError::NotFound(format!(
                "not a member of r/{}",
                subreddit.name
            )));
        }
        Ok(())
    }
}
