use axum::{response::Html, routing::get, Router};

use crate::state::AppState;

/// Interfaz web del editor (Leaflet + API JSON)
const INDEX_HTML: &str = include_str!("../../assets/index.html");

pub fn create_index_router() -> Router<AppState> {
    Router::new().route("/", get(index))
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
