use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method};
use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::{CorsConfig, ServerConfig};
use crate::handler;
use crate::state::AppState;

/// Build the axum router with all catalog endpoints.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let api = Router::new()
        .route("/health", get(handler::health))
        .route("/stats", get(handler::stats))
        .route(
            "/categories",
            get(handler::list_categories).post(handler::add_category),
        )
        .route(
            "/applications",
            get(handler::list_applications).post(handler::add_application),
        )
        .route("/search", get(handler::search))
        .route(
            "/upload",
            post(handler::upload).layer(DefaultBodyLimit::max(config.max_upload_bytes)),
        )
        .route("/download", get(handler::download_all))
        .route("/download/:category", get(handler::download_category))
        .route("/update/application", put(handler::update_application))
        .route("/delete/application", delete(handler::delete_application))
        .route("/delete/category", delete(handler::delete_category));

    let mut router = Router::new().nest("/api", api);
    if let Some(dir) = &config.static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        .layer(cors_layer(&config.cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
        .max_age(Duration::from_secs(config.max_age_seconds));

    if config.allowed_origins.is_empty() {
        return cors;
    }
    if config.allows_any_origin() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    cors.allow_origin(AllowOrigin::list(origins))
}
