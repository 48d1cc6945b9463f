use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use sqlx::PgPool;

use crate::models::{InsertedPoint, NewPoint, Point, RouteSummary, UserSummary};
use crate::services::shift_on_collision;
use crate::utils::errors::AppResult;

/// Número mínimo de puntos para que un día cuente como ruta
pub const MIN_ROUTE_POINTS: i64 = 5;

/// Acceso a los puntos de Dawarich
#[async_trait]
pub trait PointStore: Send + Sync {
    /// Comprobar que la base de datos responde
    async fn ping(&self) -> AppResult<()>;

    async fn list_users(&self) -> AppResult<Vec<UserSummary>>;

    /// Rutas diarias con al menos `MIN_ROUTE_POINTS` puntos desde `since`
    async fn list_routes(
        &self,
        user_id: i64,
        since: NaiveDateTime,
    ) -> AppResult<Vec<RouteSummary>>;

    /// Puntos de un día ordenados cronológicamente
    async fn route_points(&self, user_id: i64, route_date: NaiveDate) -> AppResult<Vec<Point>>;

    /// Insertar un punto manual, esquivando colisiones exactas de timestamp
    async fn insert_point(&self, point: NewPoint) -> AppResult<InsertedPoint>;

    /// Borrar un punto del usuario; `false` si no existe o es de otro usuario
    async fn delete_point(&self, user_id: i64, point_id: i64) -> AppResult<bool>;
}

pub struct PointRepository {
    pool: PgPool,
}

impl PointRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PointStore for PointRepository {
    async fn ping(&self) -> AppResult<()> {
        crate::database::ping(&self.pool).await?;
        Ok(())
    }

    async fn list_users(&self) -> AppResult<Vec<UserSummary>> {
        let users = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT DISTINCT
                u.id::int8 AS id,
                u.email::text AS email,
                COALESCE(u.first_name || ' ' || u.last_name, u.email)::text AS display_name
            FROM users u
            WHERE u.id IN (SELECT DISTINCT user_id FROM points)
            ORDER BY display_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn list_routes(
        &self,
        user_id: i64,
        since: NaiveDateTime,
    ) -> AppResult<Vec<RouteSummary>> {
        let routes = sqlx::query_as::<_, RouteSummary>(
            r#"
            SELECT
                DATE(recorded_at) AS route_date,
                COUNT(*) AS point_count,
                MIN(recorded_at)::timestamp AS start_time,
                MAX(recorded_at)::timestamp AS end_time,
                MIN(latitude)::float8 AS min_lat,
                MAX(latitude)::float8 AS max_lat,
                MIN(longitude)::float8 AS min_lon,
                MAX(longitude)::float8 AS max_lon
            FROM points
            WHERE user_id = $1
                AND recorded_at >= $2
                AND latitude IS NOT NULL
                AND longitude IS NOT NULL
            GROUP BY DATE(recorded_at)
            HAVING COUNT(*) >= $3
            ORDER BY route_date DESC
            "#,
        )
        .bind(user_id)
        .bind(since)
        .bind(MIN_ROUTE_POINTS)
        .fetch_all(&self.pool)
        .await?;

        Ok(routes)
    }

    async fn route_points(&self, user_id: i64, route_date: NaiveDate) -> AppResult<Vec<Point>> {
        let points = sqlx::query_as::<_, Point>(
            r#"
            SELECT
                id::int8 AS id,
                latitude::float8 AS latitude,
                longitude::float8 AS longitude,
                recorded_at::timestamp AS recorded_at,
                accuracy::float8 AS accuracy,
                altitude::float8 AS altitude,
                speed::float8 AS speed,
                battery::int4 AS battery
            FROM points
            WHERE user_id = $1
                AND DATE(recorded_at) = $2
                AND latitude IS NOT NULL
                AND longitude IS NOT NULL
            ORDER BY recorded_at ASC
            "#,
        )
        .bind(user_id)
        .bind(route_date)
        .fetch_all(&self.pool)
        .await?;

        Ok(points)
    }

    async fn insert_point(&self, point: NewPoint) -> AppResult<InsertedPoint> {
        let mut tx = self.pool.begin().await?;

        let (taken,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM points WHERE user_id = $1 AND recorded_at = $2)",
        )
        .bind(point.user_id)
        .bind(point.recorded_at)
        .fetch_one(&mut *tx)
        .await?;

        let recorded_at = shift_on_collision(point.recorded_at, taken);

        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO points (
                user_id, latitude, longitude, recorded_at,
                accuracy, altitude, speed, battery,
                created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, NULL, NULL, NOW(), NOW()
            )
            RETURNING id::int8
            "#,
        )
        .bind(point.user_id)
        .bind(point.latitude)
        .bind(point.longitude)
        .bind(recorded_at)
        .bind(point.accuracy)
        .bind(point.altitude)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(InsertedPoint { id, recorded_at })
    }

    async fn delete_point(&self, user_id: i64, point_id: i64) -> AppResult<bool> {
        let deleted = sqlx::query_as::<_, (i64,)>(
            "DELETE FROM points WHERE id = $1 AND user_id = $2 RETURNING id::int8",
        )
        .bind(point_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(deleted.is_some())
    }
}
