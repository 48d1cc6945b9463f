use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};

use crate::dto::route_dto::{AddPointRequest, AddPointResponse, DeletePointResponse, RoutesQuery};
use crate::models::{Point, RouteSummary, UserSummary};
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};

pub fn create_route_editor_router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/:user_id/routes", get(list_routes))
        .route(
            "/users/:user_id/routes/:route_date/points",
            get(route_points).post(add_point),
        )
        .route("/users/:user_id/points/:point_id", delete(delete_point))
}

async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<UserSummary>>> {
    let users = state.route_controller().list_users().await?;
    Ok(Json(users))
}

async fn list_routes(
    State(state): State<AppState>,
    user_id: Result<Path<i64>, PathRejection>,
    query: Result<Query<RoutesQuery>, QueryRejection>,
) -> AppResult<Json<Vec<RouteSummary>>> {
    let Path(user_id) = user_id?;
    let Query(query) = query?;
    let routes = state
        .route_controller()
        .list_routes(user_id, query.days)
        .await?;
    Ok(Json(routes))
}

async fn route_points(
    State(state): State<AppState>,
    path: Result<Path<(i64, String)>, PathRejection>,
) -> AppResult<Json<Vec<Point>>> {
    let Path((user_id, route_date)) = path?;
    let points = state
        .route_controller()
        .route_points(user_id, &route_date)
        .await?;
    Ok(Json(points))
}

// Sin cabecera JSON se trata como petición sin coordenadas
async fn add_point(
    State(state): State<AppState>,
    path: Result<Path<(i64, String)>, PathRejection>,
    request: Result<Json<AddPointRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<AddPointResponse>)> {
    let Path((user_id, route_date)) = path?;
    let request = match request {
        Ok(Json(request)) => request,
        Err(JsonRejection::MissingJsonContentType(_)) => AddPointRequest::default(),
        Err(rejection) => return Err(AppError::from(rejection)),
    };
    let response = state
        .route_controller()
        .add_point(user_id, &route_date, request)
        .await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn delete_point(
    State(state): State<AppState>,
    path: Result<Path<(i64, i64)>, PathRejection>,
) -> AppResult<Json<DeletePointResponse>> {
    let Path((user_id, point_id)) = path?;
    let response = state
        .route_controller()
        .delete_point(user_id, point_id)
        .await?;
    Ok(Json(response))
}
