/// Flair handlers
use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use crate::app_state::AppState;
use crate::error::Result;
use crate::middleware::AuthenticatedUser;
use crate::models::{CreateFlairRequest, ReorderFlairsRequest, UpdateFlairRequest};
use crate::services::FlairService;

pub async fn list_flairs(
    state: web::Data<AppState>,
    _user: AuthenticatedUser,
    name: web::Path<String>,
) -> Result<HttpResponse> {
    let flairs = FlairService::new(&state).list(&name).await?;
    Ok(HttpResponse::Ok().json(flairs))
}

pub async fn create_flair(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    name: web::Path<String>,
    req: web::Json<CreateFlairRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    let flair = FlairService::new(&state).create(&user, &name, &req).await?;
    Ok(HttpResponse::Created().json(flair))
}

pub async fn update_flair(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<(String, Uuid)>,
    req: web::Json<UpdateFlairRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    let (name, flair_id) = path.into_inner();
    let flair = FlairService::new(&state)
        .update(&user, &name, flair_id, &req)
        .await?;
    Ok(HttpResponse::Ok().json(flair))
}

pub async fn delete_flair(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<(String, Uuid)>,
) -> Result<HttpResponse> {
    let (name, flair_id) = path.into_inner();
    FlairService::new(&state)
        .delete(&user, &name, flair_id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn reorder_flairs(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    name: web::Path<String>,
    req: web::Json<ReorderFlairsRequest>,
) -> Result<HttpResponse> {
    let flairs = FlairService::new(&state)
        .reorder(&user, &name, &req)
        .await?;
    Ok(HttpResponse::Ok().json(flairs))
}
