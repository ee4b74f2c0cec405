/// Moderation handlers - moderators, approved, muted and banned users
use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::app_state::AppState;
use crate::error::Result;
use crate::middleware::AuthenticatedUser;
use crate::models::{
    BanRequest, InviteModeratorRequest, MuteRequest, SetPermissionsRequest, UsernameRequest,
};
use crate::services::{ListingQuery, ModerationService};

/// `{name}/.../{username}` path segments
type NameAndUser = web::Path<(String, String)>;

pub async fn list_moderators(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    name: web::Path<String>,
    query: web::Query<ListingQuery>,
) -> Result<HttpResponse> {
    let page = ModerationService::new(&state)
        .list_moderators(&user, &name, &query)
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

pub async fn list_invited_moderators(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    name: web::Path<String>,
    query: web::Query<ListingQuery>,
) -> Result<HttpResponse> {
    let page = ModerationService::new(&state)
        .list_invited(&user, &name, &query)
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

pub async fn invite_moderator(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    name: web::Path<String>,
    req: web::Json<InviteModeratorRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    ModerationService::new(&state)
        .invite(&user, &name, &req)
        .await?;
    Ok(HttpResponse::Created().finish())
}

pub async fn accept_invite(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    name: web::Path<String>,
) -> Result<HttpResponse> {
    ModerationService::new(&state)
        .accept_invite(&user, &name)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn revoke_invite(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: NameAndUser,
) -> Result<HttpResponse> {
    let (name, username) = path.into_inner();
    ModerationService::new(&state)
        .revoke_invite(&user, &name, &username)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn remove_moderator(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: NameAndUser,
) -> Result<HttpResponse> {
    let (name, username) = path.into_inner();
    ModerationService::new(&state)
        .remove_moderator(&user, &name, &username)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn set_moderator_permissions(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: NameAndUser,
    req: web::Json<SetPermissionsRequest>,
) -> Result<HttpResponse> {
    let (name, username) = path.into_inner();
    ModerationService::new(&state)
        .set_permissions(&user, &name, &username, &req)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn list_approved(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    name: web::Path<String>,
    query: web::Query<ListingQuery>,
) -> Result<HttpResponse> {
    let page = ModerationService::new(&state)
        .list_approved(&user, &name, &query)
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

pub async fn approve_user(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    name: web::Path<String>,
    req: web::Json<UsernameRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    ModerationService::new(&state)
        .approve(&user, &name, &req.username)
        .await?;
    Ok(HttpResponse::Created().finish())
}

pub async fn unapprove_user(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: NameAndUser,
) -> Result<HttpResponse> {
    let (name, username) = path.into_inner();
    ModerationService::new(&state)
        .unapprove(&user, &name, &username)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn list_muted(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    name: web::Path<String>,
    query: web::Query<ListingQuery>,
) -> Result<HttpResponse> {
    let page = ModerationService::new(&state)
        .list_muted(&user, &name, &query)
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

pub async fn mute_user(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    name: web::Path<String>,
    req: web::Json<MuteRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    ModerationService::new(&state)
        .mute(&user, &name, &req)
        .await?;
    Ok(HttpResponse::Created().finish())
}

pub async fn unmute_user(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: NameAndUser,
) -> Result<HttpResponse> {
    let (name, username) = path.into_inner();
    ModerationService::new(&state)
        .unmute(&user, &name, &username)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn list_banned(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    name: web::Path<String>,
    query: web::Query<ListingQuery>,
) -> Result<HttpResponse> {
    let page = ModerationService::new(&state)
        .list_banned(&user, &name, &query)
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

pub async fn ban_user(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    name: web::Path<String>,
    req: web::Json<BanRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    ModerationService::new(&state)
        .ban(&user, &name, &req)
        .await?;
    Ok(HttpResponse::Created().finish())
}

pub async fn unban_user(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: NameAndUser,
) -> Result<HttpResponse> {
    let (name, username) = path.into_inner();
    ModerationService::new(&state)
        .unban(&user, &name, &username)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
