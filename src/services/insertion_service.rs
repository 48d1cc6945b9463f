//! Ubicación temporal de puntos manuales
//!
//! Un punto añadido a mano no trae timestamp: se le asigna el instante que
//! mejor encaja con su posición dentro de la ruta existente.

use chrono::{Duration, NaiveDateTime};

use crate::models::Point;

/// Radio de la Tierra en metros
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Segundos añadidos tras el último punto cuando la ruta tiene uno solo
pub const SINGLE_POINT_OFFSET_SECONDS: i64 = 30;

/// Desplazamiento aplicado cuando el instante calculado ya está ocupado
pub const CONFLICT_SHIFT_SECONDS: i64 = 5;

/// Distancia de círculo máximo entre dos coordenadas, en metros
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Calcular el timestamp de inserción de un punto nuevo
///
/// Elige el tramo consecutivo `(i, i+1)` cuyo desvío
/// `d(nuevo, p_i) + d(nuevo, p_i+1) - d(p_i, p_i+1)` es mínimo (el primero en
/// caso de empate) y devuelve el punto medio temporal del tramo. Con un único
/// punto devuelve ese instante más 30 segundos. `None` si la ruta está vacía.
///
/// `points` debe venir ordenado por `recorded_at`.
pub fn insertion_timestamp(points: &[Point], latitude: f64, longitude: f64) -> Option<NaiveDateTime> {
    match points {
        [] => None,
        [only] => Some(only.recorded_at + Duration::seconds(SINGLE_POINT_OFFSET_SECONDS)),
        _ => {
            let mut best = 0;
            let mut min_penalty = f64::INFINITY;

            for (i, pair) in points.windows(2).enumerate() {
                let (p1, p2) = (&pair[0], &pair[1]);
                let dist1 = haversine_distance(latitude, longitude, p1.latitude, p1.longitude);
                let dist2 = haversine_distance(latitude, longitude, p2.latitude, p2.longitude);
                let direct = haversine_distance(p1.latitude, p1.longitude, p2.latitude, p2.longitude);

                let penalty = dist1 + dist2 - direct;
                if penalty < min_penalty {
                    min_penalty = penalty;
                    best = i;
                }
            }

            let start = points[best].recorded_at;
            let end = points[best + 1].recorded_at;
            Some(start + (end - start) / 2)
        }
    }
}

/// Mover el instante candidato si otro punto del usuario ya lo tiene
///
/// Se desplaza una sola vez; no se vuelve a comprobar el nuevo instante.
pub fn shift_on_collision(candidate: NaiveDateTime, taken: bool) -> NaiveDateTime {
    if taken {
        candidate + Duration::seconds(CONFLICT_SHIFT_SECONDS)
    } else {
        candidate
    }
}
