//! Portfolio content API - library for app wiring and testing.

pub mod chatbot;
pub mod config;
pub mod content;
pub mod logging;
pub mod mailer;
pub mod portfolio;
pub mod routes;
pub mod settings;
pub mod store;

use axum::{
    http::{HeaderValue, Method},
    middleware,
    routing::{get, patch, post, put},
    Router,
};
use std::net::SocketAddr;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer,
};

use config::AppConfig;

/// Configure CORS from environment variables.
/// Uses ALLOWED_ORIGINS (comma-separated) or FRONTEND_ORIGIN.
/// Falls back to the local dev origins.
pub fn configure_cors() -> CorsLayer {
    let allowed_origins = std::env::var("ALLOWED_ORIGINS")
        .ok()
        .and_then(|s| {
            let origins: Vec<HeaderValue> = s
                .split(',')
                .filter_map(|origin| origin.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                None
            } else {
                Some(origins)
            }
        })
        .or_else(|| {
            std::env::var("FRONTEND_ORIGIN")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(|origin| vec![origin])
        })
        .unwrap_or_else(|| {
            vec![
                "http://localhost:3000".parse().unwrap(),
                "http://127.0.0.1:3000".parse().unwrap(),
            ]
        });

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::PUT,
            Method::DELETE,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
        ])
        .allow_credentials(true)
}

/// Create and configure the application router.
pub fn create_app() -> Router {
    let cors = configure_cors();
    tracing::info!("CORS configured");

    Router::new()
        // Public read surface
        .route("/api/profile", get(routes::portfolio::get_profile))
        .route("/api/projects", get(routes::portfolio::get_projects))
        .route("/api/skills", get(routes::portfolio::get_skills))
        .route(
            "/api/skills/grouped",
            get(routes::portfolio::get_skills_grouped),
        )
        .route(
            "/api/certificates",
            get(routes::portfolio::get_certificates),
        )
        .route("/api/roles", get(routes::portfolio::get_roles))
        .route(
            "/api/social-links",
            get(routes::portfolio::get_social_links),
        )
        .route("/api/settings", get(routes::portfolio::get_settings))
        // Visitor-facing side effects
        .route("/api/chat", post(routes::chat::send_message))
        .route("/api/contact", post(routes::contact::submit_contact))
        // Admin console
        .route("/api/admin/stats", get(routes::admin::get_stats))
        .route("/api/admin/profile", put(routes::admin::save_profile))
        .route(
            "/api/admin/blocks",
            get(routes::admin::list_blocks).post(routes::admin::create_block),
        )
        .route(
            "/api/admin/blocks/{id}",
            patch(routes::admin::update_block).delete(routes::admin::delete_block),
        )
        .route(
            "/api/admin/projects",
            get(routes::admin::list_projects).post(routes::admin::create_project),
        )
        .route(
            "/api/admin/projects/{id}",
            patch(routes::admin::update_project).delete(routes::admin::delete_project),
        )
        .route(
            "/api/admin/knowledge",
            get(routes::admin::list_knowledge).post(routes::admin::create_knowledge),
        )
        .route(
            "/api/admin/knowledge/{id}",
            patch(routes::admin::update_knowledge).delete(routes::admin::delete_knowledge),
        )
        .route("/api/admin/messages", get(routes::admin::list_messages))
        .route(
            "/api/admin/messages/{id}/read",
            patch(routes::admin::mark_message_read),
        )
        .route(
            "/api/admin/settings/{key}",
            put(routes::admin::save_setting),
        )
        // Health
        .route("/health", get(routes::health::health_ping))
        .route("/health/detailed", get(routes::health::health_detailed))
        .route("/health/store", get(routes::health::health_store))
        .layer(logging::middleware::propagate_request_id_layer())
        .layer(middleware::from_fn(logging::middleware::log_request))
        .layer(logging::middleware::request_id_layer())
        .layer(TraceLayer::new_for_http())
        // Compress responses with gzip/br/zstd automatically
        .layer(CompressionLayer::new())
        // Global 2 MB request body cap
        .layer(RequestBodyLimitLayer::new(2 * 1024 * 1024))
        .layer(cors)
}

/// Run the server (used by main).
pub async fn run() {
    dotenvy::dotenv().ok();

    // Guards MUST be held for the programme's lifetime; dropping them early
    // shuts down background log-writer threads and loses buffered log lines.
    let _log_guards = logging::init();

    routes::health::init_start_time();

    // Missing store credentials are fatal before anything binds. This is
    // deliberate: there is no degraded mode without the store.
    let app_config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            panic!("FATAL: {e}. Set STORE_URL and STORE_ANON_KEY before starting.");
        }
    };

    if app_config.admin_token.is_none() {
        tracing::warn!("ADMIN_TOKEN is not set; admin endpoints are disabled");
    }
    if app_config.email.is_none() {
        tracing::warn!(
            "Email credentials are not fully set; contact messages will be \
             stored but not forwarded"
        );
    }

    let store = store::init_store(&app_config.store);
    config::init(app_config);

    // Settings load once per process; admin writes refresh them.
    let settings_cache = settings::init();
    settings_cache.refresh(&store).await;
    if let Some(e) = settings_cache.last_error().await {
        tracing::warn!(error = %e, "initial settings load failed, serving defaults");
    }

    let app = create_app();

    // Bind address is configurable via HOST / PORT env vars, defaulting to
    // 127.0.0.1:3001 so existing dev setups keep working unchanged.
    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(3001);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .expect("Invalid HOST/PORT configuration");
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Server error");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_app_returns_router() {
        let _app = create_app();
        // Just test that it compiles and doesn't panic
    }
}
