/// Comment handlers
use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use crate::app_state::AppState;
use crate::error::Result;
use crate::middleware::AuthenticatedUser;
use crate::models::CreateCommentRequest;
use crate::services::{CommentService, ListingQuery};

pub async fn create_comment(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    post_id: web::Path<Uuid>,
    req: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    let comment = CommentService::new(&state)
        .create(&user, *post_id, &req)
        .await?;
    Ok(HttpResponse::Created().json(comment))
}

pub async fn list_comments(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    post_id: web::Path<Uuid>,
    query: web::Query<ListingQuery>,
) -> Result<HttpResponse> {
    let page = CommentService::new(&state)
        .list(&user, *post_id, &query)
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

pub async fn delete_comment(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    comment_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    CommentService::new(&state)
        .delete(&user, *comment_id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
