/// Private message handlers
use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use crate::app_state::AppState;
use crate::error::Result;
use crate::middleware::AuthenticatedUser;
use crate::models::SendMessageRequest;
use crate::services::{ListingQuery, MessageService};

pub async fn send_message(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<SendMessageRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    let message = MessageService::new(&state).send(&user, &req).await?;
    Ok(HttpResponse::Created().json(message))
}

pub async fn inbox(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    query: web::Query<ListingQuery>,
) -> Result<HttpResponse> {
    let page = MessageService::new(&state).inbox(&user, &query).await?;
    Ok(HttpResponse::Ok().json(page))
}

pub async fn sent(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    query: web::Query<ListingQuery>,
) -> Result<HttpResponse> {
    let page = MessageService::new(&state).sent(&user, &query).await?;
    Ok(HttpResponse::Ok().json(page))
}

pub async fn mark_read(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let message = MessageService::new(&state).mark_read(&user, *id).await?;
    Ok(HttpResponse::Ok().json(message))
}
