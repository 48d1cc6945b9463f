pub mod health_routes;
pub mod index_routes;
pub mod route_editor_routes;

use axum::Router;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::middleware::cors_layer;
use crate::state::AppState;

/// Crear el router completo de la aplicación
pub fn create_app_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .merge(index_routes::create_index_router())
        .merge(health_routes::create_health_router())
        .nest("/api", route_editor_routes::create_route_editor_router())
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
