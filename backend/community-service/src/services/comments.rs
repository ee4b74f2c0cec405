/// Comment service - replies on posts
use cursor_pagination::{Page, Paginator};
use sqlx::PgPool;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::db::comment_repo;
use crate::error::{AppError, Result};
use crate::middleware::AuthenticatedUser;
use crate::models::{CommentView, CreateCommentRequest, Permission};
use crate::services::listing::{Listing, ListingQuery};
use crate::services::notifications::{NotificationDispatcher, NotificationEvent};
use crate::services::posts::{load_post, post_context};
use crate::services::users::ensure_caller;

/// Who hears about a new comment: the parent comment's author, else the
/// post author, never the commenter
pub fn reply_recipient(post_author: Uuid, parent_author: Option<Uuid>, commenter: Uuid) -> Option<Uuid> {
    let recipient = parent_author.unwrap_or(post_author);
    (recipient != commenter).then_some(recipient)
}

pub struct CommentService {
    pool: PgPool,
    paginator: Paginator,
    notifier: NotificationDispatcher,
}

impl CommentService {
    pub fn new(state: &AppState) -> Self {
        Self {
            pool: state.db.clone(),
            paginator: state.paginator,
            notifier: state.notifier.clone(),
        }
    }

    pub async fn create(
        &self,
        caller: &AuthenticatedUser,
        post_id: Uuid,
        req: &CreateCommentRequest,
    ) -> Result<CommentView> {
        let author = ensure_caller(&self.pool, caller).await?;
        let post = load_post(&self.pool, post_id).await?;
        let ctx = post_context(&self.pool, &post, caller.user_id).await?;
        let standing = ctx.require_view(&self.pool).await?;

        if standing.is_banned {
            return Err(AppError::Forbidden(format!(
                "you are banned from r/{}",
                ctx.subreddit.name
            )));
        }
        if post.locked {
            return Err(AppError::Forbidden("post is locked".into()));
        }

        let parent_author = match req.parent_id {
            Some(parent_id) => {
                let parent = comment_repo::find_comment(&self.pool, parent_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::BadRequest(format!("parent comment {} not found", parent_id))
                    })?;
                if parent.post_id != post.id {
                    return Err(AppError::BadRequest(
                        "parent comment belongs to another post".into(),
                    ));
                }
                Some(parent.author_id)
            }
            None => None,
        };

        let comment =
            comment_repo::create_comment(&self.pool, post.id, author.id, &req.body, req.parent_id)
                .await?;
        tracing::info!(comment_id = %comment.id, post_id = %post.id, author_id = %author.id, "comment created");

        if let Some(recipient_id) = reply_recipient(post.author_id, parent_author, author.id) {
            self.notifier.enqueue(NotificationEvent::CommentReply {
                recipient_id,
                author_id: author.id,
                author_username: author.username.clone(),
                comment_id: comment.id,
                post_title: post.title.clone(),
            });
        }

        Ok(CommentView {
            id: comment.id,
            post_id: comment.post_id,
            author_id: comment.author_id,
            author_username: author.username,
            parent_id: comment.parent_id,
            body: comment.body,
            created_at: comment.created_at,
        })
    }

    pub async fn list(
        &self,
        caller: &AuthenticatedUser,
        post_id: Uuid,
        query: &ListingQuery,
    ) -> Result<Page<CommentView, Uuid>> {
        let listing = Listing::new("post_comments", query, &self.paginator)?;
        let post = load_post(&self.pool, post_id).await?;
        post_context(&self.pool, &post, caller.user_id)
            .await?
            .require_view(&self.pool)
            .await?;

        let comments = comment_repo::list_post_comments(&self.pool, post.id).await?;
        listing.page(comments)
    }

    pub async fn delete(&self, caller: &AuthenticatedUser, comment_id: Uuid) -> Result<()> {
        let comment = comment_repo::find_comment(&self.pool, comment_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("comment {} not found", comment_id)))?;

        if comment.author_id != caller.user_id {
            let post = load_post(&self.pool, comment.post_id).await?;
            post_context(&self.pool, &post, caller.user_id)
                .await?
                .require(Permission::Posts)?;
        }

        comment_repo::soft_delete_comment(&self.pool, comment_id).await?;
        tracing::info!(comment_id = %comment_id, deleted_by = %caller.user_id, "comment deleted");
        Ok(())
    }
}
