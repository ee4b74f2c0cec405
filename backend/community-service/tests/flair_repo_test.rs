//! Integration Tests: flair ordering
//!
//! Runs against a disposable PostgreSQL started with testcontainers.

mod common;

use common::{create_subreddit, create_user, setup_test_db};
use community_service::db::flair_repo;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

async fn texts_in_order(pool: &Pool<Postgres>, subreddit_id: Uuid) -> Vec<(String, i32)> {
    flair_repo::list_flairs(pool, subreddit_id)
        .await
        .unwrap()
        .into_iter()
        .map(|f| (f.text, f.flair_order))
        .collect()
}

#[tokio::test]
#[ignore] // Run manually: cargo test -p community-service --test flair_repo_test -- --ignored
async fn test_flairs_append_and_close_gap_on_delete() {
    let pool = setup_test_db().await.expect("Failed to start database");
    let owner = create_user(&pool, "owner").await;
    let sub = create_subreddit(&pool, "rustlang", &owner).await;

    let mut created = Vec::new();
    for text in ["news", "help", "meta", "meme"] {
        created.push(
            flair_repo::create_flair(&pool, sub.id, text, "#000000", "#ffffff")
                .await
                .unwrap(),
        );
    }
    assert_eq!(
        created.iter().map(|f| f.flair_order).collect::<Vec<_>>(),
        vec![0, 1, 2, 3]
    );

    assert!(flair_repo::delete_flair(&pool, sub.id, created[1].id).await.unwrap());
    assert_eq!(
        texts_in_order(&pool, sub.id).await,
        vec![
            ("news".to_string(), 0),
            ("meta".to_string(), 1),
            ("meme".to_string(), 2),
        ]
    );

    // Unknown id leaves the order untouched
    assert!(!flair_repo::delete_flair(&pool, sub.id, Uuid::new_v4()).await.unwrap());
    assert_eq!(texts_in_order(&pool, sub.id).await.len(), 3);

    let next = flair_repo::create_flair(&pool, sub.id, "event", "#000000", "#ffffff")
        .await
        .unwrap();
    assert_eq!(next.flair_order, 3);
}

#[tokio::test]
#[ignore]
async fn test_apply_order_rewrites_positions() {
    let pool = setup_test_db().await.expect("Failed to start database");
    let owner = create_user(&pool, "owner").await;
    let sub = create_subreddit(&pool, "rustlang", &owner).await;
    let other = create_subreddit(&pool, "golang", &owner).await;

    let mut ids = Vec::new();
    for text in ["a", "b", "c"] {
        ids.push(
            flair_repo::create_flair(&pool, sub.id, text, "#000000", "#ffffff")
                .await
                .unwrap()
                .id,
        );
    }
    let foreign = flair_repo::create_flair(&pool, other.id, "x", "#000000", "#ffffff")
        .await
        .unwrap();

    flair_repo::apply_order(&pool, sub.id, &[ids[2], ids[0], ids[1]])
        .await
        .unwrap();
    assert_eq!(
        texts_in_order(&pool, sub.id).await,
        vec![
            ("c".to_string(), 0),
            ("a".to_string(), 1),
            ("b".to_string(), 2),
        ]
    );

    // Ids from another subreddit are not touched
    flair_repo::apply_order(&pool, sub.id, &[foreign.id, ids[0], ids[1], ids[2]])
        .await
        .unwrap();
    let untouched = flair_repo::find_flair(&pool, other.id, foreign.id)
        .await
        .unwrap()
        .expect("foreign flair");
    assert_eq!(untouched.flair_order, 0);
}
