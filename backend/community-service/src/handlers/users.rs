/// User handlers - profiles and follows
use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::app_state::AppState;
use crate::error::Result;
use crate::middleware::AuthenticatedUser;
use crate::models::UpdateProfileRequest;
use crate::services::UserService;

pub async fn provision_me(state: web::Data<AppState>, user: AuthenticatedUser) -> Result<HttpResponse> {
    let profile = UserService::new(&state).provision(&user).await?;
    Ok(HttpResponse::Ok().json(profile))
}

pub async fn get_me(state: web::Data<AppState>, user: AuthenticatedUser) -> Result<HttpResponse> {
    let profile = UserService::new(&state).me(&user).await?;
    Ok(HttpResponse::Ok().json(profile))
}

pub async fn update_me(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    let profile = UserService::new(&state).update_profile(&user, &req).await?;
    Ok(HttpResponse::Ok().json(profile))
}

pub async fn get_profile(
    state: web::Data<AppState>,
    _user: AuthenticatedUser,
    username: web::Path<String>,
) -> Result<HttpResponse> {
    let profile = UserService::new(&state).profile(&username).await?;
    Ok(HttpResponse::Ok().json(profile))
}

pub async fn follow(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    username: web::Path<String>,
) -> Result<HttpResponse> {
    UserService::new(&state).follow(&user, &username).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn unfollow(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    username: web::Path<String>,
) -> Result<HttpResponse> {
    UserService::new(&state).unfollow(&user, &username).await?;
    Ok(HttpResponse::NoContent().finish())
}
