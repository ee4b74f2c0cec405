use crate::models::{Post, PostView};
use sqlx::PgPool;
use uuid::Uuid;

const POST_COLUMNS: &str = "id, subreddit_id, author_id, title, body, flair_id, nsfw, spoiler, \
                            locked, created_at, updated_at, deleted_at";

const POST_VIEW_SELECT: &str = r#"
    SELECT p.id, p.subreddit_id, s.name AS subreddit_name, p.author_id,
           u.username AS author_username, p.title, p.body, p.flair_id,
           f.text AS flair_text, p.nsfw, p.spoiler, p.locked,
           (SELECT COUNT(*) FROM comments c
            WHERE c.post_id = p.id AND c.deleted_at IS NULL) AS comment_count,
           p.created_at, p.updated_at
    FROM posts p
    JOIN subreddits s ON s.id = p.subreddit_id
    JOIN users u ON u.id = p.author_id
    LEFT JOIN flairs f ON f.id = p.flair_id
"#;

pub struct NewPost<'a> {
    pub subreddit_id: Uuid,
    pub author_id: Uuid,
    pub title: &'a str,
    pub body: &'a str,
    pub flair_id: Option<Uuid>,
    pub nsfw: bool,
    pub spoiler: bool,
}

pub async fn create_post(pool: &PgPool, new: NewPost<'_>) -> Result<Post, sqlx::Error> {
    let query = format!(
        r#"
        INSERT INTO posts (id, subreddit_id, author_id, title, body, flair_id, nsfw, spoiler)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {}
        "#,
        POST_COLUMNS
    );

    sqlx::query_as::<_, Post>(&query)
        .bind(Uuid::new_v4())
        .bind(new.subreddit_id)
        .bind(new.author_id)
        .bind(new.title)
        .bind(new.body)
        .bind(new.flair_id)
        .bind(new.nsfw)
        .bind(new.spoiler)
        .fetch_one(pool)
        .await
}

/// Get a post by ID (excluding soft-deleted)
pub async fn find_post(pool: &PgPool, post_id: Uuid) -> Result<Option<Post>, sqlx::Error> {
    let query = format!(
        "SELECT {} FROM posts WHERE id = $1 AND deleted_at IS NULL",
        POST_COLUMNS
    );

    sqlx::query_as::<_, Post>(&query)
        .bind(post_id)
        .fetch_optional(pool)
        .await
}

pub async fn find_post_view(pool: &PgPool, post_id: Uuid) -> Result<Option<PostView>, sqlx::Error> {
    let query = format!(
        "{} WHERE p.id = $1 AND p.deleted_at IS NULL",
        POST_VIEW_SELECT
    );

    sqlx::query_as::<_, PostView>(&query)
        .bind(post_id)
        .fetch_optional(pool)
        .await
}

/// Live posts of a subreddit, newest first
pub async fn list_subreddit_posts(
    pool: &PgPool,
    subreddit_id: Uuid,
) -> Result<Vec<PostView>, sqlx::Error> {
    let query = format!(
        "{} WHERE p.subreddit_id = $1 AND p.deleted_at IS NULL ORDER BY p.created_at DESC, p.id DESC",
        POST_VIEW_SELECT
    );

    sqlx::query_as::<_, PostView>(&query)
        .bind(subreddit_id)
        .fetch_all(pool)
        .await
}

pub async fn soft_delete_post(pool: &PgPool, post_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE posts SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(post_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn set_locked(pool: &PgPool, post_id: Uuid, locked: bool) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE posts SET locked = $2, updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(post_id)
    .bind(locked)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
