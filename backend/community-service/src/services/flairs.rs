/// Flair service - ordered post flairs of a subreddit
use sqlx::PgPool;
use std::collections::HashSet;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::db::flair_repo;
use crate::error::{AppError, Result};
use crate::middleware::AuthenticatedUser;
use crate::models::flair::{is_hex_color, DEFAULT_BACKGROUND_COLOR, DEFAULT_TEXT_COLOR};
use crate::models::{CreateFlairRequest, Flair, Permission, ReorderFlairsRequest, UpdateFlairRequest};
use crate::services::subreddits::{load_subreddit, SubredditContext};

fn check_color(field: &str, value: Option<&str>) -> Result<()> {
    match value {
        Some(color) if !is_hex_color(color) => Err(AppError::Validation(format!(
            "{} must be a #rrggbb colour, got '{}'",
            field, color
        ))),
        _ => Ok(()),
    }
}

/// A new order must name every existing flair exactly once
pub fn check_permutation(existing: &[Uuid], requested: &[Uuid]) -> Result<()> {
    let requested_set: HashSet<&Uuid> = requested.iter().collect();
    if requested_set.len() != requested.len() {
        return Err(AppError::Validation("flair order contains duplicates".into()));
    }

    let existing_set: HashSet<&Uuid> = existing.iter().collect();
    if requested_set != existing_set {
        return Err(AppError::Validation(
            "flair order must list every flair of the subreddit exactly once".into(),
        ));
    }
    Ok(())
}

pub struct FlairService {
    pool: PgPool,
}

impl FlairService {
    pub fn new(state: &AppState) -> Self {
        Self {
            pool: state.db.clone(),
        }
    }

    async fn moderated(&self, caller: &AuthenticatedUser, name: &str) -> Result<SubredditContext> {
        let ctx = SubredditContext::load(&self.pool, name, caller.user_id).await?;
        ctx.require(Permission::Flair)?;
        Ok(ctx)
    }

    pub async fn list(&self, name: &str) -> Result<Vec<Flair>> {
        let subreddit = load_subreddit(&self.pool, name).await?;
        Ok(flair_repo::list_flairs(&self.pool, subreddit.id).await?)
    }

    pub async fn create(
        &self,
        caller: &AuthenticatedUser,
        name: &str,
        req: &CreateFlairRequest,
    ) -> Result<Flair> {
        check_color("background_color", req.background_color.as_deref())?;
        check_color("text_color", req.text_color.as_deref())?;
        let ctx = self.moderated(caller, name).await?;

        let flair = flair_repo::create_flair(
            &self.pool,
            ctx.subreddit.id,
            &req.text,
            req.background_color
                .as_deref()
                .unwrap_or(DEFAULT_BACKGROUND_COLOR),
            req.text_color.as_deref().unwrap_or(DEFAULT_TEXT_COLOR),
        )
        .await?;

        tracing::info!(subreddit_id = %ctx.subreddit.id, flair_id = %flair.id, order = flair.flair_order, "flair created");
        Ok(flair)
    }

    pub async fn update(
        &self,
        caller: &AuthenticatedUser,
        name: &str,
        flair_id: Uuid,
        req: &UpdateFlairRequest,
    ) -> Result<Flair> {
        check_color("background_color", req.background_color.as_deref())?;
        check_color("text_color", req.text_color.as_deref())?;
        let ctx = self.moderated(caller, name).await?;

        flair_repo::update_flair(
            &self.pool,
            ctx.subreddit.id,
            flair_id,
            req.text.as_deref(),
            req.background_color.as_deref(),
            req.text_color.as_deref(),
        )
        .await?
        .ok_or_else(|| AppError::NotFound(format!("flair {} not found", flair_id)))
    }

    pub async fn delete(&self, caller: &AuthenticatedUser, name: &str, flair_id: Uuid) -> Result<()> {
        let ctx = self.moderated(caller, name).await?;
        if !flair_repo::delete_flair(&self.pool, ctx.subreddit.id, flair_id).await? {
            return Err(AppError::NotFound(format!("flair {} not found", flair_id)));
        }
        Ok(())
    }

    pub async fn reorder(
        &self,
        caller: &AuthenticatedUser,
        name: &str,
        req: &ReorderFlairsRequest,
    ) -> Result<Vec<Flair>> {
        let ctx = self.moderated(caller, name).await?;
        let existing: Vec<Uuid> = flair_repo::list_flairs(&self.pool, ctx.subreddit.id)
            .await?
            .into_iter()
            .map(|flair| flair.id)
            .collect();
        check_permutation(&existing, &req.flair_ids)?;

        flair_repo::apply_order(&self.pool, ctx.subreddit.id, &req.flair_ids).await?;
        Ok(flair_repo::list_flairs(&self.pool, ctx.subreddit.id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permutation_accepted() {
        let ids: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
        let reordered = vec![ids[2], ids[0], ids[1]];
        assert!(check_permutation(&ids, &reordered).is_ok());
        assert!(check_permutation(&[], &[]).is_ok());
    }

    #[test]
    fn missing_extra_or_duplicate_rejected() {
        let ids: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
        assert!(check_permutation(&ids, &ids[..2]).is_err());
        assert!(check_permutation(&ids, &[ids[0], ids[1], ids[2], Uuid::new_v4()]).is_err());
        assert!(check_permutation(&ids, &[ids[0], ids[0], ids[1]]).is_err());
    }

    #[test]
    fn colors_checked_only_when_present() {
        assert!(check_color("text_color", None).is_ok());
        assert!(check_color("text_color", Some("#ffffff")).is_ok());
        assert!(check_color("text_color", Some("white")).is_err());
    }
}
