//! Integration Tests: listing order and cursor paging over stored rows
//!
//! Runs against a disposable PostgreSQL started with testcontainers.

mod common;

use common::{create_subreddit, create_user, setup_test_db};
use community_service::db::post_repo::{self, NewPost};
use community_service::services::{Listing, ListingQuery};
use cursor_pagination::Paginator;
use uuid::Uuid;

#[tokio::test]
#[ignore] // Run manually: cargo test -p community-service --test post_repo_test -- --ignored
async fn test_posts_list_newest_first_and_page_with_cursors() {
    let pool = setup_test_db().await.expect("Failed to start database");
    let owner = create_user(&pool, "owner").await;
    let sub = create_subreddit(&pool, "rustlang", &owner).await;

    let mut created = Vec::new();
    for i in 0..7 {
        let title = format!("post {}", i);
        let post = post_repo::create_post(
            &pool,
            NewPost {
                subreddit_id: sub.id,
                author_id: owner.id,
                title: &title,
                body: "",
                flair_id: None,
                nsfw: false,
                spoiler: false,
            },
        )
        .await
        .unwrap();
        created.push(post.id);
    }

    // Distinct creation times, oldest first
    for (i, id) in created.iter().enumerate() {
        sqlx::query("UPDATE posts SET created_at = NOW() - make_interval(mins => $2) WHERE id = $1")
            .bind(id)
            .bind(7 - i as i32)
            .execute(&pool)
            .await
            .unwrap();
    }

    let all = post_repo::list_subreddit_posts(&pool, sub.id).await.unwrap();
    let newest_first: Vec<Uuid> = created.iter().rev().copied().collect();
    assert_eq!(all.iter().map(|p| p.id).collect::<Vec<_>>(), newest_first);

    // Walk forward three at a time
    let paginator = Paginator::default();
    let mut seen = Vec::new();
    let mut after: Option<String> = None;
    loop {
        let query = ListingQuery {
            limit: Some("3".to_string()),
            before: None,
            after: after.clone(),
        };
        let listing = Listing::new("posts", &query, &paginator).unwrap();
        let rows = post_repo::list_subreddit_posts(&pool, sub.id).await.unwrap();
        let page = listing.page(rows).unwrap();
        assert!(page.len() <= 3);
        seen.extend(page.children.iter().map(|p| p.id));
        match page.after {
            Some(id) => after = Some(id.to_string()),
            None => break,
        }
    }
    assert_eq!(seen, newest_first);

    // And back from the last item
    let query = ListingQuery {
        limit: Some("2".to_string()),
        before: Some(newest_first[6].to_string()),
        after: None,
    };
    let listing = Listing::new("posts", &query, &paginator).unwrap();
    let page = listing
        .page(post_repo::list_subreddit_posts(&pool, sub.id).await.unwrap())
        .unwrap();
    assert_eq!(
        page.children.iter().map(|p| p.id).collect::<Vec<_>>(),
        newest_first[4..6].to_vec()
    );
}

#[tokio::test]
#[ignore]
async fn test_deleted_posts_leave_listing() {
    let pool = setup_test_db().await.expect("Failed to start database");
    let owner = create_user(&pool, "owner").await;
    let sub = create_subreddit(&pool, "rustlang", &owner).await;

    let mut ids = Vec::new();
    for title in ["kept", "removed"] {
        let post = post_repo::create_post(
            &pool,
            NewPost {
                subreddit_id: sub.id,
                author_id: owner.id,
                title,
                body: "",
                flair_id: None,
                nsfw: false,
                spoiler: false,
            },
        )
        .await
        .unwrap();
        ids.push(post.id);
    }

    assert!(post_repo::soft_delete_post(&pool, ids[1]).await.unwrap());
    assert!(!post_repo::soft_delete_post(&pool, ids[1]).await.unwrap());

    let listed = post_repo::list_subreddit_posts(&pool, sub.id).await.unwrap();
    assert_eq!(listed.iter().map(|p| p.id).collect::<Vec<_>>(), vec![ids[0]]);
    assert!(post_repo::find_post(&pool, ids[1]).await.unwrap().is_none());
}
