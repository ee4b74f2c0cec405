/// Notification handlers
use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::app_state::AppState;
use crate::error::Result;
use crate::middleware::AuthenticatedUser;
use crate::services::{ListingQuery, NotificationService};

pub async fn list_notifications(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    query: web::Query<ListingQuery>,
) -> Result<HttpResponse> {
    let listing = NotificationService::new(&state).list(&user, &query).await?;
    Ok(HttpResponse::Ok().json(listing))
}

pub async fn mark_read(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    NotificationService::new(&state).mark_read(&user, *id).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn mark_all_read(state: web::Data<AppState>, user: AuthenticatedUser) -> Result<HttpResponse> {
    let updated = NotificationService::new(&state).mark_all_read(&user).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "updated": updated })))
}

pub async fn hide(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    NotificationService::new(&state)
        .set_hidden(&user, *id, true)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn unhide(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    NotificationService::new(&state)
        .set_hidden(&user, *id, false)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
