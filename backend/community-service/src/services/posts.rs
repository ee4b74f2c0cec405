/// Post service - submission, listing, removal and locking
use cursor_pagination::{Page, Paginator};
use sqlx::PgPool;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::db::{flair_repo, post_repo, subreddit_repo};
use crate::error::{AppError, Result};
use crate::middleware::AuthenticatedUser;
use crate::models::{CreatePostRequest, Permission, Post, PostView};
use crate::services::listing::{Listing, ListingQuery};
use crate::services::notifications::{NotificationDispatcher, NotificationEvent};
use crate::services::permissions::can_submit;
use crate::services::subreddits::SubredditContext;
use crate::services::users::ensure_caller;

pub async fn load_post(pool: &PgPool, post_id: Uuid) -> Result<Post> {
    post_repo::find_post(pool, post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {} not found", post_id)))
}

/// The post's subreddit as seen by the caller
pub async fn post_context(pool: &PgPool, post: &Post, caller_id: Uuid) -> Result<SubredditContext> {
    let subreddit = subreddit_repo::find_by_id(pool, post.subreddit_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {} not found", post.id)))?;
    SubredditContext::for_subreddit(pool, subreddit, caller_id).await
}

pub struct PostService {
    pool: PgPool,
    paginator: Paginator,
    notifier: NotificationDispatcher,
}

impl PostService {
    pub fn new(state: &AppState) -> Self {
        Self {
            pool: state.db.clone(),
            paginator: state.paginator,
            notifier: state.notifier.clone(),
        }
    }

    async fn view(&self, post_id: Uuid) -> Result<PostView> {
        post_repo::find_post_view(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post {} not found", post_id)))
    }

    pub async fn create(
        &self,
        caller: &AuthenticatedUser,
        name: &str,
        req: &CreatePostRequest,
    ) -> Result<PostView> {
        let author = ensure_caller(&self.pool, caller).await?;
        let ctx = SubredditContext::load(&self.pool, name, caller.user_id).await?;
        let standing = ctx.standing(&self.pool).await?;

        if standing.is_banned {
            return Err(AppError::Forbidden(format!(
                "you are banned from r/{}",
                ctx.subreddit.name
            )));
        }
        if !can_submit(ctx.subreddit.kind(), standing) {
            return Err(AppError::Forbidden(format!(
                "only approved users may post in r/{}",
                ctx.subreddit.name
            )));
        }

        if let Some(flair_id) = req.flair_id {
            if flair_repo::find_flair(&self.pool, ctx.subreddit.id, flair_id)
                .await?
                .is_none()
            {
                return Err(AppError::BadRequest(format!(
                    "flair {} does not belong to r/{}",
                    flair_id, ctx.subreddit.name
                )));
            }
        }

        let post = post_repo::create_post(
            &self.pool,
            post_repo::NewPost {
                subreddit_id: ctx.subreddit.id,
                author_id: author.id,
                title: &req.title,
                body: req.body.as_deref().unwrap_or(""),
                flair_id: req.flair_id,
                nsfw: req.nsfw || ctx.subreddit.nsfw,
                spoiler: req.spoiler,
            },
        )
        .await?;

        tracing::info!(post_id = %post.id, subreddit_id = %ctx.subreddit.id, author_id = %author.id, "post created");
        self.notifier.enqueue(NotificationEvent::FollowedUserPost {
            author_id: author.id,
            author_username: author.username,
            post_id: post.id,
            post_title: post.title.clone(),
            subreddit_name: ctx.subreddit.name.clone(),
        });

        self.view(post.id).await
    }

    pub async fn list(
        &self,
        caller: &AuthenticatedUser,
        name: &str,
        query: &ListingQuery,
    ) -> Result<Page<PostView, Uuid>> {
        let listing = Listing::new("subreddit_posts", query, &self.paginator)?;
        let ctx = SubredditContext::load(&self.pool, name, caller.user_id).await?;
        ctx.require_view(&self.pool).await?;

        let posts = post_repo::list_subreddit_posts(&self.pool, ctx.subreddit.id).await?;
        listing.page(posts)
    }

    pub async fn get(&self, caller: &AuthenticatedUser, post_id: Uuid) -> Result<PostView> {
        let post = load_post(&self.pool, post_id).await?;
        post_context(&self.pool, &post, caller.user_id)
            .await?
            .require_view(&self.pool)
            .await?;
        self.view(post_id).await
    }

    pub async fn delete(&self, caller: &AuthenticatedUser, post_id: Uuid) -> Result<()> {
        let post = load_post(&self.pool, post_id).await?;
        if post.author_id != caller.user_id {
            post_context(&self.pool, &post, caller.user_id)
                .await?
                .require(Permission::Posts)?;
        }

        post_repo::soft_delete_post(&self.pool, post_id).await?;
        tracing::info!(post_id = %post_id, deleted_by = %caller.user_id, "post deleted");
        Ok(())
    }

    pub async fn set_locked(
        &self,
        caller: &AuthenticatedUser,
        post_id: Uuid,
        locked: bool,
    ) -> Result<PostView> {
        let post = load_post(&self.pool, post_id).await?;
        post_context(&self.pool, &post, caller.user_id)
            .await?
            .require(Permission::Posts)?;

        post_repo::set_locked(&self.pool, post_id, locked).await?;
        tracing::info!(post_id = %post_id, locked, moderator_id = %caller.user_id, "post lock changed");
        self.view(post_id).await
    }
}
