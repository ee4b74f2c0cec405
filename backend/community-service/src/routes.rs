//! HTTP route table
//!
//! Health and metrics are public. Everything under `/api/v1` other than the
//! health checks requires a bearer token.

use actix_web::web;
use std::sync::Arc;

use crate::handlers::{
    comments, flairs, health, messages, moderation, notifications, posts, subreddits, users,
};
use crate::metrics;
use crate::middleware::JwtAuthMiddleware;
use crate::security::JwtValidator;

pub fn configure(cfg: &mut web::ServiceConfig, jwt: Arc<JwtValidator>) {
    cfg.route("/metrics", web::get().to(metrics::serve_metrics))
        .route("/api/v1/health", web::get().to(health::health))
        .route("/api/v1/health/live", web::get().to(health::liveness))
        .service(
            web::scope("/api/v1")
                .wrap(JwtAuthMiddleware::new(jwt))
                .service(
                    web::scope("/users")
                        .service(
                            web::resource("/me")
                                .route(web::get().to(users::get_me))
                                .route(web::post().to(users::provision_me))
                                .route(web::patch().to(users::update_me)),
                        )
                        .route("/{username}", web::get().to(users::get_profile))
                        .service(
                            web::resource("/{username}/follow")
                                .route(web::post().to(users::follow))
                                .route(web::delete().to(users::unfollow)),
                        ),
                )
                .service(
                    web::scope("/subreddits")
                        .route("", web::post().to(subreddits::create_subreddit))
                        .service(
                            web::resource("/{name}")
                                .route(web::get().to(subreddits::get_subreddit))
                                .route(web::patch().to(subreddits::update_subreddit)),
                        )
                        .service(
                            web::resource("/{name}/membership")
                                .route(web::post().to(subreddits::join))
                                .route(web::delete().to(subreddits::leave)),
                        )
                        // Literal segments must be registered before `{username}`.
                        .route(
                            "/{name}/moderators",
                            web::get().to(moderation::list_moderators),
                        )
                        .route(
                            "/{name}/moderators/invited",
                            web::get().to(moderation::list_invited_moderators),
                        )
                        .route(
                            "/{name}/moderators/invite",
                            web::post().to(moderation::invite_moderator),
                        )
                        .route(
                            "/{name}/moderators/accept",
                            web::post().to(moderation::accept_invite),
                        )
                        .route(
                            "/{name}/moderators/invited/{username}",
                            web::delete().to(moderation::revoke_invite),
                        )
                        .route(
                            "/{name}/moderators/{username}",
                            web::delete().to(moderation::remove_moderator),
                        )
                        .route(
                            "/{name}/moderators/{username}/permissions",
                            web::put().to(moderation::set_moderator_permissions),
                        )
                        .service(
                            web::resource("/{name}/approved")
                                .route(web::get().to(moderation::list_approved))
                                .route(web::post().to(moderation::approve_user)),
                        )
                        .route(
                            "/{name}/approved/{username}",
                            web::delete().to(moderation::unapprove_user),
                        )
                        .service(
                            web::resource("/{name}/muted")
                                .route(web::get().to(moderation::list_muted))
                                .route(web::post().to(moderation::mute_user)),
                        )
                        .route(
                            "/{name}/muted/{username}",
                            web::delete().to(moderation::unmute_user),
                        )
                        .service(
                            web::resource("/{name}/banned")
                                .route(web::get().to(moderation::list_banned))
                                .route(web::post().to(moderation::ban_user)),
                        )
                        .route(
                            "/{name}/banned/{username}",
                            web::delete().to(moderation::unban_user),
                        )
                        .service(
                            web::resource("/{name}/flairs")
                                .route(web::get().to(flairs::list_flairs))
                                .route(web::post().to(flairs::create_flair)),
                        )
                        .route("/{name}/flairs/order", web::put().to(flairs::reorder_flairs))
                        .service(
                            web::resource("/{name}/flairs/{flair_id}")
                                .route(web::patch().to(flairs::update_flair))
                                .route(web::delete().to(flairs::delete_flair)),
                        )
                        .service(
                            web::resource("/{name}/posts")
                                .route(web::get().to(posts::list_posts))
                                .route(web::post().to(posts::create_post)),
                        ),
                )
                .service(
                    web::scope("/posts")
                        .service(
                            web::resource("/{post_id}")
                                .route(web::get().to(posts::get_post))
                                .route(web::delete().to(posts::delete_post)),
                        )
                        .service(
                            web::resource("/{post_id}/lock")
                                .route(web::post().to(posts::lock_post))
                                .route(web::delete().to(posts::unlock_post)),
                        )
                        .service(
                            web::resource("/{post_id}/comments")
                                .route(web::get().to(comments::list_comments))
                                .route(web::post().to(comments::create_comment)),
                        ),
                )
                .route(
                    "/comments/{comment_id}",
                    web::delete().to(comments::delete_comment),
                )
                .service(
                    web::scope("/notifications")
                        .route("", web::get().to(notifications::list_notifications))
                        .route("/read-all", web::post().to(notifications::mark_all_read))
                        .route("/{id}/read", web::post().to(notifications::mark_read))
                        .route("/{id}/hide", web::post().to(notifications::hide))
                        .route("/{id}/unhide", web::post().to(notifications::unhide)),
                )
                .service(
                    web::scope("/messages")
                        .route("", web::post().to(messages::send_message))
                        .route("/inbox", web::get().to(messages::inbox))
                        .route("/sent", web::get().to(messages::sent))
                        .route("/{id}/read", web::post().to(messages::mark_read)),
                ),
        );
}
