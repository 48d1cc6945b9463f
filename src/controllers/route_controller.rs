use std::sync::Arc;

use chrono::{Duration, Local};
use tracing::{debug, info};
use validator::Validate;

use crate::dto::route_dto::{AddPointRequest, AddPointResponse, DeletePointResponse};
use crate::models::{NewPoint, Point, RouteSummary, UserSummary};
use crate::repositories::PointStore;
use crate::services::insertion_timestamp;
use crate::utils::errors::{bad_request_error, not_found_error, AppError, AppResult};
use crate::utils::validation::{field_error, validate_date, validate_days_back};

/// Precisión asignada a los puntos manuales cuando el cliente no envía una
pub const MANUAL_POINT_ACCURACY: f64 = 20.0;

pub struct RouteController {
    store: Arc<dyn PointStore>,
    default_days_back: i64,
}

impl RouteController {
    pub fn new(store: Arc<dyn PointStore>, default_days_back: i64) -> Self {
        Self {
            store,
            default_days_back,
        }
    }

    pub async fn list_users(&self) -> AppResult<Vec<UserSummary>> {
        self.store.list_users().await
    }

    pub async fn list_routes(
        &self,
        user_id: i64,
        days: Option<i64>,
    ) -> AppResult<Vec<RouteSummary>> {
        let days = days.unwrap_or(self.default_days_back);
        validate_days_back(days).map_err(|e| field_error("days", e))?;

        let since = Duration::try_days(days)
            .and_then(|window| Local::now().naive_local().checked_sub_signed(window))
            .ok_or_else(|| bad_request_error("The 'days' window is too large"))?;

        debug!("🔍 Listando rutas del usuario {} desde {}", user_id, since);
        self.store.list_routes(user_id, since).await
    }

    pub async fn route_points(&self, user_id: i64, route_date: &str) -> AppResult<Vec<Point>> {
        let date = validate_date(route_date).map_err(|e| field_error("route_date", e))?;
        self.store.route_points(user_id, date).await
    }

    pub async fn add_point(
        &self,
        user_id: i64,
        route_date: &str,
        request: AddPointRequest,
    ) -> AppResult<AddPointResponse> {
        let (Some(latitude), Some(longitude)) = (request.latitude, request.longitude) else {
            return Err(bad_request_error("Latitude and longitude are required"));
        };
        request.validate()?;

        let date = validate_date(route_date).map_err(|e| field_error("route_date", e))?;
        let points = self.store.route_points(user_id, date).await?;

        let recorded_at = insertion_timestamp(&points, latitude, longitude)
            .ok_or_else(|| not_found_error("Route", route_date))?;

        let inserted = self
            .store
            .insert_point(NewPoint {
                user_id,
                latitude,
                longitude,
                recorded_at,
                accuracy: request.accuracy.unwrap_or(MANUAL_POINT_ACCURACY),
                altitude: request.altitude,
            })
            .await?;

        info!(
            "📍 Punto manual {} añadido para el usuario {} en {}",
            inserted.id, user_id, inserted.recorded_at
        );

        Ok(AddPointResponse {
            success: true,
            point_id: inserted.id,
            timestamp: inserted.recorded_at,
            message: "Point added successfully".to_string(),
        })
    }

    pub async fn delete_point(&self, user_id: i64, point_id: i64) -> AppResult<DeletePointResponse> {
        if !self.store.delete_point(user_id, point_id).await? {
            return Err(AppError::NotFound(
                "Point not found or not authorized".to_string(),
            ));
        }

        info!("🗑️ Punto {} borrado para el usuario {}", point_id, user_id);

        Ok(DeletePointResponse {
            success: true,
            message: "Point deleted successfully".to_string(),
        })
    }

    /// Comprobar la base de datos para el healthcheck
    pub async fn health(&self) -> AppResult<()> {
        self.store
            .ping()
            .await
            .map_err(|e| AppError::ServiceUnavailable(e.to_string()))
    }
}
