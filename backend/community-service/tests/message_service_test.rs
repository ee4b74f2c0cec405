//! Integration Tests: private message read receipts
//!
//! Runs against a disposable PostgreSQL started with testcontainers.

mod common;

use common::{caller, create_user, setup_test_db, test_state};
use community_service::models::SendMessageRequest;
use community_service::services::MessageService;
use community_service::AppError;

#[tokio::test]
#[ignore] // Run manually: cargo test -p community-service --test message_service_test -- --ignored
async fn test_message_read_by_non_recipient_is_not_found() {
    let pool = setup_test_db().await.expect("Failed to start database");
    let (state, _shutdown) = test_state(&pool);
    let service = MessageService::new(&state);

    let alice = create_user(&pool, "alice").await;
    let bob = create_user(&pool, "bob_user").await;
    let eve = create_user(&pool, "eve_user").await;

    let message = service
        .send(
            &caller(&alice),
            &SendMessageRequest {
                to: bob.username.clone(),
                subject: "hello".to_string(),
                body: "hi bob".to_string(),
            },
        )
        .await
        .unwrap();

    for outsider in [&alice, &eve] {
        let err = service
            .mark_read(&caller(outsider), message.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    let read = service.mark_read(&caller(&bob), message.id).await.unwrap();
    assert!(read.is_read);
}
