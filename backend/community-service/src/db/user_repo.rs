use crate::models::User;
use sqlx::PgPool;
use uuid::Uuid;

const USER_COLUMNS: &str =
    "id, username, display_name, about, karma, created_at, updated_at, deleted_at";

/// Create the profile for a verified caller, or return the existing one
pub async fn upsert_user(pool: &PgPool, id: Uuid, username: &str) -> Result<User, sqlx::Error> {
    let query = format!(
        r#"
        INSERT INTO users (id, username)
        VALUES ($1, $2)
        ON CONFLICT (id) DO UPDATE SET updated_at = users.updated_at
        RETURNING {}
        "#,
        USER_COLUMNS
    );

    sqlx::query_as::<_, User>(&query)
        .bind(id)
        .bind(username)
        .fetch_one(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    let query = format!(
        "SELECT {} FROM users WHERE id = $1 AND deleted_at IS NULL",
        USER_COLUMNS
    );

    sqlx::query_as::<_, User>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Case-insensitive username lookup (excluding deleted users)
pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<User>, sqlx::Error> {
    let query = format!(
        "SELECT {} FROM users WHERE LOWER(username) = LOWER($1) AND deleted_at IS NULL",
        USER_COLUMNS
    );

    sqlx::query_as::<_, User>(&query)
        .bind(username)
        .fetch_optional(pool)
        .await
}

/// Update profile fields; `None` keeps the stored value
pub async fn update_profile(
    pool: &PgPool,
    id: Uuid,
    display_name: Option<&str>,
    about: Option<&str>,
) -> Result<Option<User>, sqlx::Error> {
    let query = format!(
        r#"
        UPDATE users
        SET display_name = COALESCE($2, display_name),
            about = COALESCE($3, about),
            updated_at = NOW()
        WHERE id = $1 AND deleted_at IS NULL
        RETURNING {}
        "#,
        USER_COLUMNS
    );

    sqlx::query_as::<_, User>(&query)
        .bind(id)
        .bind(display_name)
        .bind(about)
        .fetch_optional(pool)
        .await
}

pub async fn follower_count(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM follows WHERE followed_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await
}

/// Returns false when the follow already existed
pub async fn follow(pool: &PgPool, follower_id: Uuid, followed_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO follows (follower_id, followed_id)
        VALUES ($1, $2)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(follower_id)
    .bind(followed_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn unfollow(pool: &PgPool, follower_id: Uuid, followed_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND followed_id = $2")
        .bind(follower_id)
        .bind(followed_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Active followers of a user
pub async fn follower_ids(pool: &PgPool, user_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        SELECT f.follower_id
        FROM follows f
        JOIN users u ON u.id = f.follower_id
        WHERE f.followed_id = $1 AND u.deleted_at IS NULL
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}
