use crate::models::Flair;
use sqlx::PgPool;
use uuid::Uuid;

const FLAIR_COLUMNS: &str =
    "id, subreddit_id, text, background_color, text_color, flair_order, created_at";

/// Flairs in display order
pub async fn list_flairs(pool: &PgPool, subreddit_id: Uuid) -> Result<Vec<Flair>, sqlx::Error> {
    let query = format!(
        "SELECT {} FROM flairs WHERE subreddit_id = $1 ORDER BY flair_order ASC",
        FLAIR_COLUMNS
    );

    sqlx::query_as::<_, Flair>(&query)
        .bind(subreddit_id)
        .fetch_all(pool)
        .await
}

pub async fn find_flair(
    pool: &PgPool,
    subreddit_id: Uuid,
    flair_id: Uuid,
) -> Result<Option<Flair>, sqlx::Error> {
    let query = format!(
        "SELECT {} FROM flairs WHERE subreddit_id = $1 AND id = $2",
        FLAIR_COLUMNS
    );

    sqlx::query_as::<_, Flair>(&query)
        .bind(subreddit_id)
        .bind(flair_id)
        .fetch_optional(pool)
        .await
}

/// Append a flair after the current last one
pub async fn create_flair(
    pool: &PgPool,
    subreddit_id: Uuid,
    text: &str,
    background_color: &str,
    text_color: &str,
) -> Result<Flair, sqlx::Error> {
    let query = format!(
        r#"
        INSERT INTO flairs (id, subreddit_id, text, background_color, text_color, flair_order)
        VALUES (
            $1, $2, $3, $4, $5,
            (SELECT COALESCE(MAX(flair_order) + 1, 0) FROM flairs WHERE subreddit_id = $2)
        )
        RETURNING {}
        "#,
        FLAIR_COLUMNS
    );

    sqlx::query_as::<_, Flair>(&query)
        .bind(Uuid::new_v4())
        .bind(subreddit_id)
        .bind(text)
        .bind(background_color)
        .bind(text_color)
        .fetch_one(pool)
        .await
}

pub async fn update_flair(
    pool: &PgPool,
    subreddit_id: Uuid,
    flair_id: Uuid,
    text: Option<&str>,
    background_color: Option<&str>,
    text_color: Option<&str>,
) -> Result<Option<Flair>, sqlx::Error> {
    let query = format!(
        r#"
        UPDATE flairs
        SET text = COALESCE($3, text),
            background_color = COALESCE($4, background_color),
            text_color = COALESCE($5, text_color)
        WHERE subreddit_id = $1 AND id = $2
        RETURNING {}
        "#,
        FLAIR_COLUMNS
    );

    sqlx::query_as::<_, Flair>(&query)
        .bind(subreddit_id)
        .bind(flair_id)
        .bind(text)
        .bind(background_color)
        .bind(text_color)
        .fetch_optional(pool)
        .await
}

/// Delete a flair and close the gap it leaves in the ordering
pub async fn delete_flair(pool: &PgPool, subreddit_id: Uuid, flair_id: Uuid) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let removed: Option<i32> = sqlx::query_scalar(
        "DELETE FROM flairs WHERE subreddit_id = $1 AND id = $2 RETURNING flair_order",
    )
    .bind(subreddit_id)
    .bind(flair_id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(order) = removed else {
        tx.rollback().await?;
        return Ok(false);
    };

    sqlx::query(
        r#"
        UPDATE flairs
        SET flair_order = flair_order - 1
        WHERE subreddit_id = $1 AND flair_order > $2
        "#,
    )
    .bind(subreddit_id)
    .bind(order)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(true)
}

/// Rewrite `flair_order` so that `ordered_ids[i]` gets position `i`
pub async fn apply_order(
    pool: &PgPool,
    subreddit_id: Uuid,
    ordered_ids: &[Uuid],
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE flairs f
        SET flair_order = (o.ord - 1)::INTEGER
        FROM UNNEST($2::UUID[]) WITH ORDINALITY AS o(id, ord)
        WHERE f.subreddit_id = $1 AND f.id = o.id
        "#,
    )
    .bind(subreddit_id)
    .bind(ordered_ids)
    .execute(pool)
    .await?;

    Ok(())
}
