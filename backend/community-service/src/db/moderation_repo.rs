//! Moderators, approved users, mutes and bans

use crate::models::{ApprovedEntry, BannedEntry, ModeratorEntry, ModeratorRecord, MutedEntry};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

// ---- moderators ----

pub async fn find_moderator(
    pool: &PgPool,
    subreddit_id: Uuid,
    user_id: Uuid,
) -> Result<Option<ModeratorRecord>, sqlx::Error> {
    sqlx::query_as::<_, ModeratorRecord>(
        r#"
        SELECT subreddit_id, user_id, status, permissions, invited_by, invited_at, moderator_since
        FROM subreddit_moderators
        WHERE subreddit_id = $1 AND user_id = $2
        "#,
    )
    .bind(subreddit_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Active moderators, longest-serving first
pub async fn list_active_moderators(
    pool: &PgPool,
    subreddit_id: Uuid,
) -> Result<Vec<ModeratorEntry>, sqlx::Error> {
    sqlx::query_as::<_, ModeratorEntry>(
        r#"
        SELECT m.user_id, u.username, m.permissions, m.invited_at, m.moderator_since
        FROM subreddit_moderators m
        JOIN users u ON u.id = m.user_id
        WHERE m.subreddit_id = $1 AND m.status = 'active' AND u.deleted_at IS NULL
        ORDER BY m.moderator_since ASC, m.user_id ASC
        "#,
    )
    .bind(subreddit_id)
    .fetch_all(pool)
    .await
}

/// Pending invitations, oldest first
pub async fn list_invited_moderators(
    pool: &PgPool,
    subreddit_id: Uuid,
) -> Result<Vec<ModeratorEntry>, sqlx::Error> {
    sqlx::query_as::<_, ModeratorEntry>(
        r#"
        SELECT m.user_id, u.username, m.permissions, m.invited_at, m.moderator_since
        FROM subreddit_moderators m
        JOIN users u ON u.id = m.user_id
        WHERE m.subreddit_id = $1 AND m.status = 'invited' AND u.deleted_at IS NULL
        ORDER BY m.invited_at ASC, m.user_id ASC
        "#,
    )
    .bind(subreddit_id)
    .fetch_all(pool)
    .await
}

pub async fn insert_invite(
    pool: &PgPool,
    subreddit_id: Uuid,
    user_id: Uuid,
    permissions: &[String],
    invited_by: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO subreddit_moderators (subreddit_id, user_id, status, permissions, invited_by)
        VALUES ($1, $2, 'invited', $3, $4)
        "#,
    )
    .bind(subreddit_id)
    .bind(user_id)
    .bind(permissions)
    .bind(invited_by)
    .execute(pool)
    .await?;

    Ok(())
}

/// Turn a pending invitation into an active moderatorship (and membership)
pub async fn accept_invite(pool: &PgPool, subreddit_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        UPDATE subreddit_moderators
        SET status = 'active', moderator_since = NOW()
        WHERE subreddit_id = $1 AND user_id = $2 AND status = 'invited'
        "#,
    )
    .bind(subreddit_id)
    .bind(user_id)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        tx.rollback().await?;
        return Ok(false);
    }

    sqlx::query(
        r#"
        INSERT INTO subreddit_members (subreddit_id, user_id)
        VALUES ($1, $2)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(subreddit_id)
    .bind(user_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(true)
}

/// Delete a moderator row with the given status
pub async fn delete_moderator(
    pool: &PgPool,
    subreddit_id: Uuid,
    user_id: Uuid,
    status: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "DELETE FROM subreddit_moderators WHERE subreddit_id = $1 AND user_id = $2 AND status = $3",
    )
    .bind(subreddit_id)
    .bind(user_id)
    .bind(status)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn set_permissions(
    pool: &PgPool,
    subreddit_id: Uuid,
    user_id: Uuid,
    permissions: &[String],
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE subreddit_moderators SET permissions = $3 WHERE subreddit_id = $1 AND user_id = $2",
    )
    .bind(subreddit_id)
    .bind(user_id)
    .bind(permissions)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

// ---- approved users ----

/// Approved users, most recently approved first
pub async fn list_approved(pool: &PgPool, subreddit_id: Uuid) -> Result<Vec<ApprovedEntry>, sqlx::Error> {
    sqlx::query_as::<_, ApprovedEntry>(
        r#"
        SELECT a.user_id, u.username, a.approved_by, a.approved_at
        FROM approved_users a
        JOIN users u ON u.id = a.user_id
        WHERE a.subreddit_id = $1 AND u.deleted_at IS NULL
        ORDER BY a.approved_at DESC, a.user_id DESC
        "#,
    )
    .bind(subreddit_id)
    .fetch_all(pool)
    .await
}

pub async fn is_approved(pool: &PgPool, subreddit_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM approved_users WHERE subreddit_id = $1 AND user_id = $2)",
    )
    .bind(subreddit_id)
    .bind(user_id)
    .fetch_one(pool)
    .await
}

/// Returns false when already approved
pub async fn approve_user(
    pool: &PgPool,
    subreddit_id: Uuid,
    user_id: Uuid,
    approved_by: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO approved_users (subreddit_id, user_id, approved_by)
        VALUES ($1, $2, $3)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(subreddit_id)
    .bind(user_id)
    .bind(approved_by)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn unapprove_user(pool: &PgPool, subreddit_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM approved_users WHERE subreddit_id = $1 AND user_id = $2")
        .bind(subreddit_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

// ---- mutes ----

/// Unexpired mutes, most recent first
pub async fn list_muted(pool: &PgPool, subreddit_id: Uuid) -> Result<Vec<MutedEntry>, sqlx::Error> {
    sqlx::query_as::<_, MutedEntry>(
        r#"
        SELECT m.user_id, u.username, m.reason, m.muted_by, m.muted_at, m.expires_at
        FROM muted_users m
        JOIN users u ON u.id = m.user_id
        WHERE m.subreddit_id = $1
          AND (m.expires_at IS NULL OR m.expires_at > NOW())
          AND u.deleted_at IS NULL
        ORDER BY m.muted_at DESC, m.user_id DESC
        "#,
    )
    .bind(subreddit_id)
    .fetch_all(pool)
    .await
}

/// Stored mute regardless of expiry
pub async fn find_mute(
    pool: &PgPool,
    subreddit_id: Uuid,
    user_id: Uuid,
) -> Result<Option<MutedEntry>, sqlx::Error> {
    sqlx::query_as::<_, MutedEntry>(
        r#"
        SELECT m.user_id, u.username, m.reason, m.muted_by, m.muted_at, m.expires_at
        FROM muted_users m
        JOIN users u ON u.id = m.user_id
        WHERE m.subreddit_id = $1 AND m.user_id = $2
        "#,
    )
    .bind(subreddit_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Insert or replace a mute
pub async fn upsert_mute(
    pool: &PgPool,
    subreddit_id: Uuid,
    user_id: Uuid,
    reason: &str,
    muted_by: Uuid,
    expires_at: Option<DateTime<Utc>>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO muted_users (subreddit_id, user_id, reason, muted_by, muted_at, expires_at)
        VALUES ($1, $2, $3, $4, NOW(), $5)
        ON CONFLICT (subreddit_id, user_id) DO UPDATE
        SET reason = EXCLUDED.reason,
            muted_by = EXCLUDED.muted_by,
            muted_at = EXCLUDED.muted_at,
            expires_at = EXCLUDED.expires_at
        "#,
    )
    .bind(subreddit_id)
    .bind(user_id)
    .bind(reason)
    .bind(muted_by)
    .bind(expires_at)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn delete_mute(pool: &PgPool, subreddit_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM muted_users WHERE subreddit_id = $1 AND user_id = $2")
        .bind(subreddit_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn purge_expired_mutes(pool: &PgPool, subreddit_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "DELETE FROM muted_users WHERE subreddit_id = $1 AND expires_at IS NOT NULL AND expires_at <= NOW()",
    )
    .bind(subreddit_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

// ---- bans ----

/// Unexpired bans, most recent first
pub async fn list_banned(pool: &PgPool, subreddit_id: Uuid) -> Result<Vec<BannedEntry>, sqlx::Error> {
    sqlx::query_as::<_, BannedEntry>(
        r#"
        SELECT b.user_id, u.username, b.reason, b.note, b.banned_by, b.banned_at, b.expires_at
        FROM banned_users b
        JOIN users u ON u.id = b.user_id
        WHERE b.subreddit_id = $1
          AND (b.expires_at IS NULL OR b.expires_at > NOW())
          AND u.deleted_at IS NULL
        ORDER BY b.banned_at DESC, b.user_id DESC
        "#,
    )
    .bind(subreddit_id)
    .fetch_all(pool)
    .await
}

/// Stored ban regardless of expiry
pub async fn find_ban(
    pool: &PgPool,
    subreddit_id: Uuid,
    user_id: Uuid,
) -> Result<Option<BannedEntry>, sqlx::Error> {
    sqlx::query_as::<_, BannedEntry>(
        r#"
        SELECT b.user_id, u.username, b.reason, b.note, b.banned_by, b.banned_at, b.expires_at
        FROM banned_users b
        JOIN users u ON u.id = b.user_id
        WHERE b.subreddit_id = $1 AND b.user_id = $2
        "#,
    )
    .bind(subreddit_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Insert or replace a ban, dropping the user's membership and any pending
/// moderator invitation in the same transaction
pub async fn ban_user(
    pool: &PgPool,
    subreddit_id: Uuid,
    user_id: Uuid,
    reason: &str,
    note: &str,
    banned_by: Uuid,
    expires_at: Option<DateTime<Utc>>,
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO banned_users (subreddit_id, user_id, reason, note, banned_by, banned_at, expires_at)
        VALUES ($1, $2, $3, $4, $5, NOW(), $6)
        ON CONFLICT (subreddit_id, user_id) DO UPDATE
        SET reason = EXCLUDED.reason,
            note = EXCLUDED.note,
            banned_by = EXCLUDED.banned_by,
            banned_at = EXCLUDED.banned_at,
            expires_at = EXCLUDED.expires_at
        "#,
    )
    .bind(subreddit_id)
    .bind(user_id)
    .bind(reason)
    .bind(note)
    .bind(banned_by)
    .bind(expires_at)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        DELETE FROM subreddit_moderators
        WHERE subreddit_id = $1 AND user_id = $2 AND status = 'invited'
        "#,
    )
    .bind(subreddit_id)
    .bind(user_id)
    .execute(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM subreddit_members WHERE subreddit_id = $1 AND user_id = $2")
        .bind(subreddit_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

pub async fn delete_ban(pool: &PgPool, subreddit_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM banned_users WHERE subreddit_id = $1 AND user_id = $2")
        .bind(subreddit_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn purge_expired_bans(pool: &PgPool, subreddit_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "DELETE FROM banned_users WHERE subreddit_id = $1 AND expires_at IS NOT NULL AND expires_at <= NOW()",
    )
    .bind(subreddit_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
