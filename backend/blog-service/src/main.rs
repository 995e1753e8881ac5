use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use blog_service::auth::JwtValidator;
use blog_service::config::StoreBackend;
use blog_service::db::{create_pool, run_migrations, DbConfig, Stores};
use blog_service::handlers;
use blog_service::jobs::CommentReconciler;
use blog_service::metrics::serve_metrics;
use blog_service::services::BlogServices;
use std::io;
use tokio::sync::broadcast;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

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
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
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

/// Blog Service
///
/// Serves posts, comments, and authors over HTTP.
///
/// # Routes
///
/// - `/api/v1/posts/*` - List, page, read, create, update, delete posts
/// - `/api/v1/posts/{id}/comments` - Comment on a post
/// - `/api/v1/comments/recent` - Latest comments
/// - `/api/v1/auth/me` - Current user
/// - `/api/v1/health`, `/api/v1/health/live` - Health
/// - `/metrics` - Prometheus
#[actix_web::main]
async fn main() -> io::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match blog_service::Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {:#}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting blog-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    let stores = match config.store {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on restart");
            Stores::in_memory()
        }
        StoreBackend::Postgres => {
            let db_cfg = DbConfig::from(&config.database);
            db_cfg.log_config();

            let pool = match create_pool(db_cfg).await {
                Ok(pool) => pool,
                Err(e) => {
                    tracing::error!("Database pool creation failed: {:#}", e);
                    eprintln!("ERROR: Failed to create database pool: {}", e);
                    std::process::exit(1);
                }
            };

            run_migrations(&pool).await.map_err(|e| {
                io::Error::new(
                    io::ErrorKind::Other,
                    format!("Failed to run migrations: {e}"),
                )
            })?;

            Stores::postgres(pool)
        }
    };

    let services = web::Data::new(BlogServices::new(&stores, config.recent_comments_limit));
    let stores_data = web::Data::new(stores.clone());
    let validator = web::Data::new(JwtValidator::new(&config.auth.jwt_secret));

    let (shutdown_tx, _) = broadcast::channel(1);
    let reconciler = CommentReconciler::new(stores.comments.clone(), &config.reconciler)
        .spawn(shutdown_tx.subscribe());

    let http_bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", http_bind_address);

    let allowed_origins = config.cors.allowed_origins.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(services.clone())
            .app_data(stores_data.clone())
            .app_data(validator.clone())
            .wrap(build_cors(&allowed_origins))
            .wrap(tracing_actix_web::TracingLogger::default())
            .route("/metrics", web::get().to(serve_metrics))
            .configure(handlers::configure)
    })
    .bind(&http_bind_address)?
    .disable_signals()
    .run();

    let server_handle = server.handle();
    let mut server_task = tokio::spawn(server);

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    let result = tokio::select! {
        result = &mut server_task => {
            match result {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => {
                    tracing::error!("HTTP server error: {}", e);
                    Err(e)
                }
                Err(e) => {
                    tracing::error!("HTTP server task join error: {}", e);
                    Err(io::Error::new(io::ErrorKind::Other, e.to_string()))
                }
            }
        }
        _ = &mut shutdown => {
            tracing::info!("Shutdown signal received");
            server_handle.stop(true).await;
            Ok(())
        }
    };

    let _ = shutdown_tx.send(());
    if let Err(e) = reconciler.await {
        tracing::warn!("Reconciler task join error: {}", e);
    }

    tracing::info!("Blog-service shutting down");
    result
}
