use crate::models::{Permission, Subreddit};
use sqlx::PgPool;
use uuid::Uuid;

const SUBREDDIT_COLUMNS: &str =
    "id, name, title, description, kind, nsfw, owner_id, created_at, updated_at, deleted_at";

pub struct NewSubreddit<'a> {
    pub name: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    pub kind: &'a str,
    pub nsfw: bool,
    pub owner_id: Uuid,
}

/// Create a subreddit; the owner becomes an active moderator with every
/// permission and its first member.
pub async fn create_subreddit(
    pool: &PgPool,
    new: NewSubreddit<'_>,
) -> Result<Subreddit, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let query = format!(
        r#"
        INSERT INTO subreddits (id, name, title, description, kind, nsfw, owner_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {}
        "#,
        SUBREDDIT_COLUMNS
    );
    let subreddit = sqlx::query_as::<_, Subreddit>(&query)
        .bind(Uuid::new_v4())
        .bind(new.name)
        .bind(new.title)
        .bind(new.description)
        .bind(new.kind)
        .bind(new.nsfw)
        .bind(new.owner_id)
        .fetch_one(&mut *tx)
        .await?;

    sqlx::query(
        r#"
        INSERT INTO subreddit_moderators
            (subreddit_id, user_id, status, permissions, invited_by, invited_at, moderator_since)
        VALUES ($1, $2, 'active', $3, $2, NOW(), NOW())
        "#,
    )
    .bind(subreddit.id)
    .bind(new.owner_id)
    .bind(Permission::to_storage(&[Permission::Everything]))
    .execute(&mut *tx)
    .await?;

    sqlx::query("INSERT INTO subreddit_members (subreddit_id, user_id) VALUES ($1, $2)")
        .bind(subreddit.id)
        .bind(new.owner_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(subreddit)
}

/// Case-insensitive name lookup (excluding deleted subreddits)
pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Subreddit>, sqlx::Error> {
    let query = format!(
        "SELECT {} FROM subreddits WHERE LOWER(name) = LOWER($1) AND deleted_at IS NULL",
        SUBREDDIT_COLUMNS
    );

    sqlx::query_as::<_, Subreddit>(&query)
        .bind(name)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Subreddit>, sqlx::Error> {
    let query = format!(
        "SELECT {} FROM subreddits WHERE id = $1 AND deleted_at IS NULL",
        SUBREDDIT_COLUMNS
    );

    sqlx::query_as::<_, Subreddit>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Update settings; `None` keeps the stored value
pub async fn update_settings(
    pool: &PgPool,
    id: Uuid,
    title: Option<&str>,
    description: Option<&str>,
    kind: Option<&str>,
    nsfw: Option<bool>,
) -> Result<Subreddit, sqlx::Error> {
    let query = format!(
        r#"
        UPDATE subreddits
        SET title = COALESCE($2, title),
            description = COALESCE($3, description),
            kind = COALESCE($4, kind),
            nsfw = COALESCE($5, nsfw),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {}
        "#,
        SUBREDDIT_COLUMNS
    );

    sqlx::query_as::<_, Subreddit>(&query)
        .bind(id)
        .bind(title)
        .bind(description)
        .bind(kind)
        .bind(nsfw)
        .fetch_one(pool)
        .await
}

pub async fn member_count(pool: &PgPool, subreddit_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM subreddit_members WHERE subreddit_id = $1")
        .bind(subreddit_id)
        .fetch_one(pool)
        .await
}

/// Returns false when already a member
pub async fn add_member(pool: &PgPool, subreddit_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO subreddit_members (subreddit_id, user_id)
        VALUES ($1, $2)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(subreddit_id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn remove_member(pool: &PgPool, subreddit_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let result =
        sqlx::query("DELETE FROM subreddit_members WHERE subreddit_id = $1 AND user_id = $2")
            .bind(subreddit_id)
            .bind(user_id)
            .execute(pool)
            .await?;

    Ok(result.rows_affected() > 0)
}
