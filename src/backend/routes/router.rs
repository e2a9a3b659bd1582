/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * all route configurations into a single Axum router.
 *
 * # Route Order
 *
 * 1. Health check (`GET /`)
 * 2. Public forest routes (`/api/trees`, `/api/tree`, `/api/nodes`)
 * 3. Private draft routes (`/api/private`)
 * 4. Static files under `/static`, if a directory is configured
 * 5. JSON 404 fallback
 *
 * # Layers
 *
 * Outermost first: permissive CORS, `TraceLayer` spans, request logging.
 */

use axum::{middleware, routing::get, Router};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::backend::error::conversion::not_found_fallback;
use crate::backend::middleware::log_request;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::routes::private_routes::configure_private_routes;
use crate::backend::server::state::AppState;

pub const HEALTH_MESSAGE: &str = "Poetry API Running";

async fn health() -> &'static str {
    HEALTH_MESSAGE
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = Router::new().route("/", get(health));

    let router = configure_api_routes(router);
    let router = configure_private_routes(router);

    let router = match &app_state.config.static_dir {
        Some(dir) => {
            tracing::info!("[STARTUP] Serving static files from {}", dir.display());
            router.nest_service("/static", ServeDir::new(dir))
        }
        None => router,
    };

    router
        .fallback(not_found_fallback)
        .layer(middleware::from_fn(log_request))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
