/// Moderation service - moderator team, approved users, mutes and bans
///
/// Every listing here loads the full filtered set for the subreddit in
/// listing order and cuts the page with [`Listing`].
use chrono::Utc;
use cursor_pagination::{Page, Paginator};
use sqlx::PgPool;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::db::moderation_repo;
use crate::error::{is_unique_violation, AppError, Result};
use crate::middleware::AuthenticatedUser;
use crate::models::{
    ApprovedEntry, BanRequest, BannedEntry, InviteModeratorRequest, ModeratorEntry,
    ModeratorStatus, MuteRequest, MutedEntry, Permission, SetPermissionsRequest,
};
use crate::services::listing::{Listing, ListingQuery};
use crate::services::notifications::{NotificationDispatcher, NotificationEvent};
use crate::services::permissions::expiry_from_days;
use crate::services::subreddits::{active_ban, SubredditContext};
use crate::services::users::{ensure_caller, require_user_by_name};

/// Permissions granted by an invitation; defaults to `everything`
pub fn invite_permissions(requested: Option<&[Permission]>) -> Result<Vec<String>> {
    match requested {
        None => Ok(Permission::to_storage(&[Permission::Everything])),
        Some([]) => Err(AppError::Validation(
            "at least one permission is required".into(),
        )),
        Some(list) => Ok(Permission::to_storage(list)),
    }
}

pub struct ModerationService {
    pool: PgPool,
    paginator: Paginator,
    notifier: NotificationDispatcher,
}

impl ModerationService {
    pub fn new(state: &AppState) -> Self {
        Self {
            pool: state.db.clone(),
            paginator: state.paginator,
            notifier: state.notifier.clone(),
        }
    }

    async fn context(&self, caller: &AuthenticatedUser, name: &str) -> Result<SubredditContext> {
        SubredditContext::load(&self.pool, name, caller.user_id).await
    }

    // ---- moderators ----

    pub async fn list_moderators(
        &self,
        caller: &AuthenticatedUser,
        name: &str,
        query: &ListingQuery,
    ) -> Result<Page<ModeratorEntry, Uuid>> {
        let listing = Listing::new("moderators", query, &self.paginator)?;
        let ctx = self.context(caller, name).await?;
        ctx.require_view(&self.pool).await?;

        let moderators = moderation_repo::list_active_moderators(&self.pool, ctx.subreddit.id).await?;
        listing.page(moderators)
    }

    pub async fn list_invited(
        &self,
        caller: &AuthenticatedUser,
        name: &str,
        query: &ListingQuery,
    ) -> Result<Page<ModeratorEntry, Uuid>> {
        let listing = Listing::new("invited_moderators", query, &self.paginator)?;
        let ctx = self.context(caller, name).await?;
        ctx.require_moderator()?;

        let invited = moderation_repo::list_invited_moderators(&self.pool, ctx.subreddit.id).await?;
        listing.page(invited)
    }

    pub async fn invite(
        &self,
        caller: &AuthenticatedUser,
        name: &str,
        req: &InviteModeratorRequest,
    ) -> Result<()> {
        let ctx = self.context(caller, name).await?;
        ctx.require(Permission::Everything)?;
        let permissions = invite_permissions(req.permissions.as_deref())?;

        let invitee = require_user_by_name(&self.pool, &req.username).await?;
        if moderation_repo::find_moderator(&self.pool, ctx.subreddit.id, invitee.id)
            .await?
            .is_some()
            || invitee.id == ctx.subreddit.owner_id
        {
            return Err(AppError::Conflict(format!(
                "u/{} is already a moderator or invited",
                invitee.username
            )));
        }
        if active_ban(&self.pool, ctx.subreddit.id, invitee.id).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "u/{} is banned from r/{}",
                invitee.username, ctx.subreddit.name
            )));
        }

        match moderation_repo::insert_invite(
            &self.pool,
            ctx.subreddit.id,
            invitee.id,
            &permissions,
            caller.user_id,
        )
        .await
        {
            Ok(()) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(AppError::Conflict(format!(
                    "u/{} is already a moderator or invited",
                    invitee.username
                )))
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!(
            subreddit_id = %ctx.subreddit.id,
            invitee_id = %invitee.id,
            invited_by = %caller.user_id,
            "moderator invited"
        );
        self.notifier.enqueue(NotificationEvent::ModeratorInvite {
            invitee_id: invitee.id,
            invited_by: caller.username.clone(),
            subreddit_id: ctx.subreddit.id,
            subreddit_name: ctx.subreddit.name.clone(),
        });
        Ok(())
    }

    pub async fn accept_invite(&self, caller: &AuthenticatedUser, name: &str) -> Result<()> {
        ensure_caller(&self.pool, caller).await?;
        let ctx = self.context(caller, name).await?;
        if active_ban(&self.pool, ctx.subreddit.id, caller.user_id).await?.is_some() {
            return Err(AppError::Forbidden(format!(
                "you are banned from r/{}",
                ctx.subreddit.name
            )));
        }
        if !moderation_repo::accept_invite(&self.pool, ctx.subreddit.id, caller.user_id).await? {
            return Err(AppError::NotFound(format!(
                "no pending invitation for r/{}",
                ctx.subreddit.name
            )));
        }
        tracing::info!(subreddit_id = %ctx.subreddit.id, user_id = %caller.user_id, "moderator invitation accepted");
        Ok(())
    }

    pub async fn revoke_invite(
        &self,
        caller: &AuthenticatedUser,
        name: &str,
        username: &str,
    ) -> Result<()> {
        let ctx = self.context(caller, name).await?;
        ctx.require(Permission::Everything)?;
        let invitee = require_user_by_name(&self.pool, username).await?;

        if !moderation_repo::delete_moderator(
            &self.pool,
            ctx.subreddit.id,
            invitee.id,
            ModeratorStatus::Invited.as_str(),
        )
        .await?
        {
            return Err(AppError::NotFound(format!(
                "u/{} has no pending invitation",
                invitee.username
            )));
        }
        Ok(())
    }

    pub async fn remove_moderator(
        &self,
        caller: &AuthenticatedUser,
        name: &str,
        username: &str,
    ) -> Result<()> {
        let ctx = self.context(caller, name).await?;
        let target = require_user_by_name(&self.pool, username).await?;

        if target.id == ctx.subreddit.owner_id {
            return Err(AppError::Forbidden(
                "the owner cannot be removed from the moderator team".into(),
            ));
        }
        if target.id == caller.user_id {
            ctx.require_moderator()?;
        } else {
            ctx.require(Permission::Everything)?;
        }

        if !moderation_repo::delete_moderator(
            &self.pool,
            ctx.subreddit.id,
            target.id,
            ModeratorStatus::Active.as_str(),
        )
        .await?
        {
            return Err(AppError::NotFound(format!(
                "u/{} is not a moderator of r/{}",
                target.username, ctx.subreddit.name
            )));
        }

        tracing::info!(
            subreddit_id = %ctx.subreddit.id,
            moderator_id = %target.id,
            removed_by = %caller.user_id,
            "moderator removed"
        );
        Ok(())
    }

    pub async fn set_permissions(
        &self,
        caller: &AuthenticatedUser,
        name: &str,
        username: &str,
        req: &SetPermissionsRequest,
    ) -> Result<()> {
        let ctx = self.context(caller, name).await?;
        ctx.require(Permission::Everything)?;
        let target = require_user_by_name(&self.pool, username).await?;
        if target.id == ctx.subreddit.owner_id {
            return Err(AppError::Forbidden(
                "the owner's permissions cannot be changed".into(),
            ));
        }

        let permissions = invite_permissions(Some(req.permissions.as_slice()))?;
        if !moderation_repo::set_permissions(&self.pool, ctx.subreddit.id, target.id, &permissions)
            .await?
        {
            return Err(AppError::NotFound(format!(
                "u/{} is not a moderator of r/{}",
                target.username, ctx.subreddit.name
            )));
        }
        Ok(())
    }

    // ---- approved users ----

    pub async fn list_approved(
        &self,
        caller: &AuthenticatedUser,
        name: &str,
        query: &ListingQuery,
    ) -> Result<Page<ApprovedEntry, Uuid>> {
        let listing = Listing::new("approved_users", query, &self.paginator)?;
        let ctx = self.context(caller, name).await?;
        ctx.require(Permission::Access)?;

        let approved = moderation_repo::list_approved(&self.pool, ctx.subreddit.id).await?;
        listing.page(approved)
    }

    pub async fn approve(&self, caller: &AuthenticatedUser, name: &str, username: &str) -> Result<()> {
        let ctx = self.context(caller, name).await?;
        ctx.require(Permission::Access)?;
        let target = require_user_by_name(&self.pool, username).await?;

        if !moderation_repo::approve_user(&self.pool, ctx.subreddit.id, target.id, caller.user_id)
            .await?
        {
            return Err(AppError::Conflict(format!(
                "u/{} is already approved",
                target.username
            )));
        }
        Ok(())
    }

    pub async fn unapprove(&self, caller: &AuthenticatedUser, name: &str, username: &str) -> Result<()> {
        let ctx = self.context(caller, name).await?;
        ctx.require(Permission::Access)?;
        let target = require_user_by_name(&self.pool, username).await?;

        if !moderation_repo::unapprove_user(&self.pool, ctx.subreddit.id, target.id).await? {
            return Err(AppError::NotFound(format!(
                "u/{} is not approved",
                target.username
            )));
        }
        Ok(())
    }

    // ---- mutes ----

    pub async fn list_muted(
        &self,
        caller: &AuthenticatedUser,
        name: &str,
        query: &ListingQuery,
    ) -> Result<Page<MutedEntry, Uuid>> {
        let listing = Listing::new("muted_users", query, &self.paginator)?;
        let ctx = self.context(caller, name).await?;
        ctx.require(Permission::Access)?;

        let purged = moderation_repo::purge_expired_mutes(&self.pool, ctx.subreddit.id).await?;
        if purged > 0 {
            tracing::debug!(subreddit_id = %ctx.subreddit.id, purged, "expired mutes purged");
        }
        let muted = moderation_repo::list_muted(&self.pool, ctx.subreddit.id).await?;
        listing.page(muted)
    }

    pub async fn mute(&self, caller: &AuthenticatedUser, name: &str, req: &MuteRequest) -> Result<()> {
        let ctx = self.context(caller, name).await?;
        ctx.require(Permission::Access)?;
        let expires_at = expiry_from_days(req.duration_days, Utc::now())?;
        let target = require_user_by_name(&self.pool, &req.username).await?;
        self.reject_moderator_target(&ctx, target.id, "muted").await?;

        moderation_repo::upsert_mute(
            &self.pool,
            ctx.subreddit.id,
            target.id,
            req.reason.as_deref().unwrap_or(""),
            caller.user_id,
            expires_at,
        )
        .await?;

        tracing::info!(
            subreddit_id = %ctx.subreddit.id,
            user_id = %target.id,
            muted_by = %caller.user_id,
            expires_at = ?expires_at,
            "user muted"
        );
        Ok(())
    }

    pub async fn unmute(&self, caller: &AuthenticatedUser, name: &str, username: &str) -> Result<()> {
        let ctx = self.context(caller, name).await?;
        ctx.require(Permission::Access)?;
        let target = require_user_by_name(&self.pool, username).await?;

        if !moderation_repo::delete_mute(&self.pool, ctx.subreddit.id, target.id).await? {
            return Err(AppError::NotFound(format!(
                "u/{} is not muted",
                target.username
            )));
        }
        Ok(())
    }

    // ---- bans ----

    pub async fn list_banned(
        &self,
        caller: &AuthenticatedUser,
        name: &str,
        query: &ListingQuery,
    ) -> Result<Page<BannedEntry, Uuid>> {
        let listing = Listing::new("banned_users", query, &self.paginator)?;
        let ctx = self.context(caller, name).await?;
        ctx.require(Permission::Access)?;

        let purged = moderation_repo::purge_expired_bans(&self.pool, ctx.subreddit.id).await?;
        if purged > 0 {
            tracing::debug!(subreddit_id = %ctx.subreddit.id, purged, "expired bans purged");
        }
        let banned = moderation_repo::list_banned(&self.pool, ctx.subreddit.id).await?;
        listing.page(banned)
    }

    pub async fn ban(&self, caller: &AuthenticatedUser, name: &str, req: &BanRequest) -> Result<()> {
        let ctx = self.context(caller, name).await?;
        ctx.require(Permission::Access)?;
        let expires_at = expiry_from_days(req.duration_days, Utc::now())?;
        let target = require_user_by_name(&self.pool, &req.username).await?;
        self.reject_moderator_target(&ctx, target.id, "banned").await?;

        moderation_repo::ban_user(
            &self.pool,
            ctx.subreddit.id,
            target.id,
            &req.reason,
            req.note.as_deref().unwrap_or(""),
            caller.user_id,
            expires_at,
        )
        .await?;

        tracing::warn!(
            subreddit_id = %ctx.subreddit.id,
            user_id = %target.id,
            banned_by = %caller.user_id,
            expires_at = ?expires_at,
            "user banned"
        );
        self.notifier.enqueue(NotificationEvent::Banned {
            user_id: target.id,
            subreddit_id: ctx.subreddit.id,
            subreddit_name: ctx.subreddit.name.clone(),
            reason: req.reason.clone(),
            expires_at,
        });
        Ok(())
    }

    pub async fn unban(&self, caller: &AuthenticatedUser, name: &str, username: &str) -> Result<()> {
        let ctx = self.context(caller, name).await?;
        ctx.require(Permission::Access)?;
        let target = require_user_by_name(&self.pool, username).await?;

        if !moderation_repo::delete_ban(&self.pool, ctx.subreddit.id, target.id).await? {
            return Err(AppError::NotFound(format!(
                "u/{} is not banned",
                target.username
            )));
        }
        tracing::info!(subreddit_id = %ctx.subreddit.id, user_id = %target.id, "user unbanned");
        Ok(())
    }

    async fn reject_moderator_target(
        &self,
        ctx: &SubredditContext,
        target_id: Uuid,
        action: &str,
    ) -> Result<()> {
        let is_moderator = target_id == ctx.subreddit.owner_id
            || moderation_repo::find_moderator(&self.pool, ctx.subreddit.id, target_id)
                .await?
                .map(|record| record.is_active())
                .unwrap_or(false);
        if is_moderator {
            return Err(AppError::Forbidden(format!(
                "moderators cannot be {}",
                action
            )));
        }
        Ok(())
    }
}
