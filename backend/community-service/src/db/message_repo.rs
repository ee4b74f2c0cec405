use crate::models::MessageView;
use sqlx::PgPool;
use uuid::Uuid;

const MESSAGE_VIEW_SELECT: &str = r#"
    SELECT m.id, m.sender_id, s.username AS sender_username,
           m.recipient_id, r.username AS recipient_username,
           m.subject, m.body, m.is_read, m.created_at, m.read_at
    FROM messages m
    JOIN users s ON s.id = m.sender_id
    JOIN users r ON r.id = m.recipient_id
"#;

pub async fn insert_message(
    pool: &PgPool,
    sender_id: Uuid,
    recipient_id: Uuid,
    subject: &str,
    body: &str,
) -> Result<Uuid, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        INSERT INTO messages (id, sender_id, recipient_id, subject, body)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(sender_id)
    .bind(recipient_id)
    .bind(subject)
    .bind(body)
    .fetch_one(pool)
    .await
}

pub async fn find_message(pool: &PgPool, id: Uuid) -> Result<Option<MessageView>, sqlx::Error> {
    let query = format!("{} WHERE m.id = $1", MESSAGE_VIEW_SELECT);

    sqlx::query_as::<_, MessageView>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Messages received by a user, newest first
pub async fn list_inbox(pool: &PgPool, recipient_id: Uuid) -> Result<Vec<MessageView>, sqlx::Error> {
    let query = format!(
        "{} WHERE m.recipient_id = $1 ORDER BY m.created_at DESC, m.id DESC",
        MESSAGE_VIEW_SELECT
    );

    sqlx::query_as::<_, MessageView>(&query)
        .bind(recipient_id)
        .fetch_all(pool)
        .await
}

/// Messages sent by a user, newest first
pub async fn list_sent(pool: &PgPool, sender_id: Uuid) -> Result<Vec<MessageView>, sqlx::Error> {
    let query = format!(
        "{} WHERE m.sender_id = $1 ORDER BY m.created_at DESC, m.id DESC",
        MESSAGE_VIEW_SELECT
    );

    sqlx::query_as::<_, MessageView>(&query)
        .bind(sender_id)
        .fetch_all(pool)
        .await
}

pub async fn mark_read(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE messages SET is_read = TRUE, read_at = COALESCE(read_at, NOW()) WHERE id = $1",
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}
