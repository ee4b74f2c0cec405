/// Post handlers
use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use crate::app_state::AppState;
use crate::error::Result;
use crate::middleware::AuthenticatedUser;
use crate::models::CreatePostRequest;
use crate::services::{ListingQuery, PostService};

pub async fn create_post(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    name: web::Path<String>,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    let post = PostService::new(&state).create(&user, &name, &req).await?;
    Ok(HttpResponse::Created().json(post))
}

pub async fn list_posts(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    name: web::Path<String>,
    query: web::Query<ListingQuery>,
) -> Result<HttpResponse> {
    let page = PostService::new(&state).list(&user, &name, &query).await?;
    Ok(HttpResponse::Ok().json(page))
}

pub async fn get_post(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post = PostService::new(&state).get(&user, *post_id).await?;
    Ok(HttpResponse::Ok().json(post))
}

pub async fn delete_post(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    PostService::new(&state).delete(&user, *post_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn lock_post(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post = PostService::new(&state)
        .set_locked(&user, *post_id, true)
        .await?;
    Ok(HttpResponse::Ok().json(post))
}

pub async fn unlock_post(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post = PostService::new(&state)
        .set_locked(&user, *post_id, false)
        .await?;
    Ok(HttpResponse::Ok().json(post))
}
