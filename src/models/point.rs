//! Modelos de puntos y rutas
//!
//! Mapean las filas de la tabla `points` de Dawarich. Una "ruta" no es una
//! tabla: es el conjunto de puntos de un usuario en un mismo día.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Punto GPS registrado
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Point {
    pub id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub recorded_at: NaiveDateTime,
    pub accuracy: Option<f64>,
    pub altitude: Option<f64>,
    pub speed: Option<f64>,
    pub battery: Option<i32>,
}

/// Resumen de una ruta diaria
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct RouteSummary {
    pub route_date: NaiveDate,
    pub point_count: i64,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

/// Usuario con al menos un punto registrado
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct UserSummary {
    pub id: i64,
    pub email: String,
    pub display_name: String,
}

/// Punto añadido manualmente, pendiente de insertar
#[derive(Debug, Clone, PartialEq)]
pub struct NewPoint {
    pub user_id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub recorded_at: NaiveDateTime,
    pub accuracy: f64,
    pub altitude: Option<f64>,
}

/// Resultado de una inserción
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InsertedPoint {
    pub id: i64,
    pub recorded_at: NaiveDateTime,
}
