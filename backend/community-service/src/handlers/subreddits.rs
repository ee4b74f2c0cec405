/// Subreddit handlers - creation, settings and membership
use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::app_state::AppState;
use crate::error::Result;
use crate::middleware::AuthenticatedUser;
use crate::models::{CreateSubredditRequest, UpdateSubredditRequest};
use crate::services::SubredditService;

pub async fn create_subreddit(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<CreateSubredditRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    let subreddit = SubredditService::new(&state).create(&user, &req).await?;
    Ok(HttpResponse::Created().json(subreddit))
}

pub async fn get_subreddit(
    state: web::Data<AppState>,
    _user: AuthenticatedUser,
    name: web::Path<String>,
) -> Result<HttpResponse> {
    let subreddit = SubredditService::new(&state).get(&name).await?;
    Ok(HttpResponse::Ok().json(subreddit))
}

pub async fn update_subreddit(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    name: web::Path<String>,
    req: web::Json<UpdateSubredditRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    let subreddit = SubredditService::new(&state)
        .update_settings(&user, &name, &req)
        .await?;
    Ok(HttpResponse::Ok().json(subreddit))
}

pub async fn join(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    name: web::Path<String>,
) -> Result<HttpResponse> {
    SubredditService::new(&state).join(&user, &name).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn leave(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    name: web::Path<String>,
) -> Result<HttpResponse> {
    SubredditService::new(&state).leave(&user, &name).await?;
    Ok(HttpResponse::NoContent().finish())
}
