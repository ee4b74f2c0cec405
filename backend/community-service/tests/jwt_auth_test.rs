use actix_web::http::StatusCode;
use actix_web::{test, web, App, HttpResponse};
use chrono::Utc;
use community_service::config::AuthConfig;
use community_service::middleware::{AuthenticatedUser, JwtAuthMiddleware};
use community_service::security::{Claims, JwtValidator};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use std::sync::Arc;
use uuid::Uuid;

const SECRET: &str = "integration-test-secret-0123456789";

fn validator() -> Arc<JwtValidator> {
    Arc::new(JwtValidator::new(&AuthConfig {
        jwt_secret: SECRET.to_string(),
        jwt_issuer: None,
        leeway_secs: 0,
    }))
}

fn token_for(sub: &str, expires_in_seconds: i64, secret: &str) -> String {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: sub.to_string(),
        username: "alice".to_string(),
        exp: now + expires_in_seconds,
        iat: now,
        iss: None,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

async fn whoami(user: AuthenticatedUser) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "user_id": user.user_id,
        "username": user.username,
    }))
}

async fn open() -> HttpResponse {
    HttpResponse::Ok().finish()
}

macro_rules! app {
    () => {
        test::init_service(
            App::new().route("/health", web::get().to(open)).service(
                web::scope("/api")
                    .wrap(JwtAuthMiddleware::new(validator()))
                    .route("/me", web::get().to(whoami)),
            ),
        )
        .await
    };
}

#[actix_web::test]
async fn valid_token_exposes_caller_identity() {
    let app = app!();
    let user_id = Uuid::new_v4();
    let req = test::TestRequest::get()
        .uri("/api/me")
        .insert_header((
            "Authorization",
            format!("Bearer {}", token_for(&user_id.to_string(), 3600, SECRET)),
        ))
        .to_request();

    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["user_id"], user_id.to_string());
    assert_eq!(body["username"], "alice");
}

#[actix_web::test]
async fn missing_header_is_unauthorized() {
    let app = app!();
    let req = test::TestRequest::get().uri("/api/me").to_request();

    let err = test::try_call_service(&app, req).await.unwrap_err();
    assert_eq!(err.error_response().status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn wrong_scheme_is_unauthorized() {
    let app = app!();
    let req = test::TestRequest::get()
        .uri("/api/me")
        .insert_header(("Authorization", "Basic YWxpY2U6c2VjcmV0"))
        .to_request();

    let err = test::try_call_service(&app, req).await.unwrap_err();
    assert_eq!(err.error_response().status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn expired_or_foreign_tokens_are_rejected() {
    let app = app!();
    let user_id = Uuid::new_v4().to_string();

    for token in [
        token_for(&user_id, -3600, SECRET),
        token_for(&user_id, 3600, "some-other-secret-some-other-secret"),
        token_for("not-a-uuid", 3600, SECRET),
    ] {
        let req = test::TestRequest::get()
            .uri("/api/me")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let err = test::try_call_service(&app, req).await.unwrap_err();
        assert_eq!(err.error_response().status(), StatusCode::UNAUTHORIZED);
    }
}

#[actix_web::test]
async fn routes_outside_the_scope_skip_authentication() {
    let app = app!();
    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
}
