use crate::models::Notification;
use sqlx::PgPool;
use uuid::Uuid;

const NOTIFICATION_COLUMNS: &str = "id, recipient_id, kind, title, body, object_id, object_type, \
                                    is_read, hidden, created_at, read_at";

/// Content shared by every row of one fan-out
pub struct NewNotification<'a> {
    pub kind: &'a str,
    pub title: &'a str,
    pub body: &'a str,
    pub object_id: Option<Uuid>,
    pub object_type: Option<&'a str>,
}

/// Insert one notification per recipient in a single statement
pub async fn insert_for_recipients(
    pool: &PgPool,
    recipients: &[Uuid],
    new: &NewNotification<'_>,
) -> Result<Vec<Notification>, sqlx::Error> {
    if recipients.is_empty() {
        return Ok(Vec::new());
    }

    let query = format!(
        r#"
        INSERT INTO notifications (id, recipient_id, kind, title, body, object_id, object_type)
        SELECT gen_random_uuid(), r.recipient_id, $2, $3, $4, $5, $6
        FROM UNNEST($1::UUID[]) AS r(recipient_id)
        RETURNING {}
        "#,
        NOTIFICATION_COLUMNS
    );

    sqlx::query_as::<_, Notification>(&query)
        .bind(recipients)
        .bind(new.kind)
        .bind(new.title)
        .bind(new.body)
        .bind(new.object_id)
        .bind(new.object_type)
        .fetch_all(pool)
        .await
}

/// Visible notifications of a user, newest first
pub async fn list_visible(pool: &PgPool, recipient_id: Uuid) -> Result<Vec<Notification>, sqlx::Error> {
    let query = format!(
        r#"
        SELECT {}
        FROM notifications
        WHERE recipient_id = $1 AND hidden = FALSE
        ORDER BY created_at DESC, id DESC
        "#,
        NOTIFICATION_COLUMNS
    );

    sqlx::query_as::<_, Notification>(&query)
        .bind(recipient_id)
        .fetch_all(pool)
        .await
}

pub async fn unread_count(pool: &PgPool, recipient_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT COUNT(*) FROM notifications WHERE recipient_id = $1 AND is_read = FALSE AND hidden = FALSE",
    )
    .bind(recipient_id)
    .fetch_one(pool)
    .await
}

/// Returns false when the notification does not belong to the recipient
pub async fn mark_read(pool: &PgPool, recipient_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE notifications
        SET is_read = TRUE, read_at = COALESCE(read_at, NOW())
        WHERE id = $1 AND recipient_id = $2
        "#,
    )
    .bind(id)
    .bind(recipient_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn mark_all_read(pool: &PgPool, recipient_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE notifications
        SET is_read = TRUE, read_at = NOW()
        WHERE recipient_id = $1 AND is_read = FALSE
        "#,
    )
    .bind(recipient_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

pub async fn set_hidden(
    pool: &PgPool,
    recipient_id: Uuid,
    id: Uuid,
    hidden: bool,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE notifications SET hidden = $3 WHERE id = $1 AND recipient_id = $2")
        .bind(id)
        .bind(recipient_id)
        .bind(hidden)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
