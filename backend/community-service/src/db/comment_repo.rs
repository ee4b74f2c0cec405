use crate::models::{Comment, CommentView};
use sqlx::PgPool;
use uuid::Uuid;

const COMMENT_COLUMNS: &str =
    "id, post_id, author_id, parent_id, body, created_at, updated_at, deleted_at";

/// Create a new comment on a post
pub async fn create_comment(
    pool: &PgPool,
    post_id: Uuid,
    author_id: Uuid,
    body: &str,
    parent_id: Option<Uuid>,
) -> Result<Comment, sqlx::Error> {
    let query = format!(
        r#"
        INSERT INTO comments (id, post_id, author_id, parent_id, body)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {}
        "#,
        COMMENT_COLUMNS
    );

    sqlx::query_as::<_, Comment>(&query)
        .bind(Uuid::new_v4())
        .bind(post_id)
        .bind(author_id)
        .bind(parent_id)
        .bind(body)
        .fetch_one(pool)
        .await
}

/// Get a single comment by ID (excluding soft-deleted)
pub async fn find_comment(pool: &PgPool, comment_id: Uuid) -> Result<Option<Comment>, sqlx::Error> {
    let query = format!(
        "SELECT {} FROM comments WHERE id = $1 AND deleted_at IS NULL",
        COMMENT_COLUMNS
    );

    sqlx::query_as::<_, Comment>(&query)
        .bind(comment_id)
        .fetch_optional(pool)
        .await
}

/// Live comments of a post, oldest first
pub async fn list_post_comments(pool: &PgPool, post_id: Uuid) -> Result<Vec<CommentView>, sqlx::Error> {
    sqlx::query_as::<_, CommentView>(
        r#"
        SELECT c.id, c.post_id, c.author_id, u.username AS author_username,
               c.parent_id, c.body, c.created_at
        FROM comments c
        JOIN users u ON u.id = c.author_id
        WHERE c.post_id = $1 AND c.deleted_at IS NULL
        ORDER BY c.created_at ASC, c.id ASC
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await
}

pub async fn soft_delete_comment(pool: &PgPool, comment_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE comments SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(comment_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
