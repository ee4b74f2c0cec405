use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use community_service::services::notifications::{
    LogPushSender, NotificationDispatcher, NotificationSink, PushSender, StoreSink,
};
use community_service::{routes, AppState, Config};
use db_pool::{create_pool, DbConfig};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const SERVICE_NAME: &str = "community-service";

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into());
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn build_cors(allowed_origins: &str) -> Cors {
    let mut cors = Cors::default();
    for origin in allowed_origins.split(',') {
        let origin = origin.trim();
        if origin.is_empty() {
            continue;
        }
        if origin == "*" {
            cors = cors.allow_any_origin();
        } else {
            cors = cors.allowed_origin(origin);
        }
    }
    cors.allow_any_method().allow_any_header().max_age(3600)
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = terminate.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable; waiting for Ctrl+C");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

/// Community Service
///
/// Subreddits, moderation, posts, comments, notifications and private
/// messages behind one bearer-token protected HTTP API.
///
/// # Routes
///
/// - `/api/v1/users/*` - profiles and follows
/// - `/api/v1/subreddits/*` - communities, moderation, flairs and posts
/// - `/api/v1/posts/*`, `/api/v1/comments/*` - posts and comment threads
/// - `/api/v1/notifications/*`, `/api/v1/messages/*` - inbox
/// - `/api/v1/health`, `/metrics` - unauthenticated
#[actix_web::main]
async fn main() -> io::Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting {} v{}", SERVICE_NAME, env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    let db_cfg = DbConfig::new(SERVICE_NAME, &config.database.url)
        .with_max_connections(config.database.max_connections);
    db_cfg.log_config();
    let db_pool = match create_pool(db_cfg).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Database pool creation failed: {:#}", e);
            eprintln!("ERROR: Failed to create database pool: {}", e);
            std::process::exit(1);
        }
    };

    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("Migration failed: {e}")))?;
    tracing::info!("Database migrations applied");

    let (shutdown_tx, _) = broadcast::channel(1);

    let push: Option<Arc<dyn PushSender>> = if config.notifications.push_enabled {
        Some(Arc::new(LogPushSender))
    } else {
        None
    };
    let sink: Arc<dyn NotificationSink> = Arc::new(StoreSink::new(db_pool.clone(), push));
    let (notifier, dispatcher) = NotificationDispatcher::spawn(
        sink,
        config.notifications.queue_capacity,
        shutdown_tx.subscribe(),
    );

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    let workers = config.app.workers.max(1);
    let drain_timeout = Duration::from_secs(config.notifications.shutdown_timeout_secs);
    let allowed_origins = config.cors.allowed_origins.clone();

    let state = AppState::new(db_pool, Arc::new(config), notifier);
    let state_data = web::Data::new(state.clone());

    tracing::info!("Starting HTTP server at {}", bind_address);

    let server = HttpServer::new(move || {
        let jwt = state_data.jwt.clone();
        App::new()
            .app_data(state_data.clone())
            .wrap(build_cors(&allowed_origins))
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(|cfg| routes::configure(cfg, jwt))
    })
    .bind(&bind_address)?
    .workers(workers)
    .disable_signals()
    .run();

    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    shutdown_signal().await;
    tracing::info!("Shutdown signal received");

    server_handle.stop(true).await;
    match server_task.await {
        Ok(Err(e)) => tracing::error!(error = %e, "HTTP server exited with error"),
        Err(e) => tracing::error!(error = %e, "HTTP server task failed"),
        Ok(Ok(())) => {}
    }

    // Handlers are gone; the dispatcher drains what they queued.
    let _ = shutdown_tx.send(());
    drop(state);
    if let Some(stats) = dispatcher.join_timeout(drain_timeout).await {
        tracing::info!(
            events = stats.events,
            failed_events = stats.failed_events,
            "Notification dispatcher drained"
        );
    }

    tracing::info!("{} shut down", SERVICE_NAME);
    Ok(())
}
