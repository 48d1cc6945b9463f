use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{NaiveDate, NaiveDateTime};
use tower::ServiceExt;

use dawarich_route_editor::config::EnvironmentConfig;
use dawarich_route_editor::models::{InsertedPoint, NewPoint, Point, RouteSummary, UserSummary};
use dawarich_route_editor::repositories::point_repository::{PointStore, MIN_ROUTE_POINTS};
use dawarich_route_editor::services::shift_on_collision;
use dawarich_route_editor::utils::errors::AppError;
use dawarich_route_editor::{create_app_router, AppState};

/// Almacén en memoria con las mismas reglas que el repositorio PostgreSQL
#[derive(Default)]
pub struct InMemoryStore {
    users: Mutex<Vec<UserSummary>>,
    points: Mutex<Vec<(i64, Point)>>,
    next_id: AtomicI64,
    down: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            next_id: AtomicI64::new(1000),
            ..Default::default()
        })
    }

    pub fn add_user(&self, id: i64, email: &str, display_name: &str) {
        self.users.lock().unwrap().push(UserSummary {
            id,
            email: email.to_string(),
            display_name: display_name.to_string(),
        });
    }

    pub fn add_point(&self, user_id: i64, id: i64, lat: f64, lon: f64, recorded_at: NaiveDateTime) {
        self.points.lock().unwrap().push((
            user_id,
            Point {
                id,
                latitude: lat,
                longitude: lon,
                recorded_at,
                accuracy: Some(5.0),
                altitude: None,
                speed: None,
                battery: None,
            },
        ));
    }

    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    pub fn point(&self, id: i64) -> Option<(i64, Point)> {
        self.points
            .lock()
            .unwrap()
            .iter()
            .find(|(_, p)| p.id == id)
            .cloned()
    }

    fn check(&self) -> Result<(), AppError> {
        if self.down.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl PointStore for InMemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        self.check()
    }

    async fn list_users(&self) -> Result<Vec<UserSummary>, AppError> {
        self.check()?;
        let points = self.points.lock().unwrap();
        let mut users: Vec<UserSummary> = self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| points.iter().any(|(owner, _)| *owner == u.id))
            .cloned()
            .collect();
        users.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        Ok(users)
    }

    async fn list_routes(
        &self,
        user_id: i64,
        since: NaiveDateTime,
    ) -> Result<Vec<RouteSummary>, AppError> {
        self.check()?;
        let mut by_day: BTreeMap<NaiveDate, Vec<Point>> = BTreeMap::new();
        for (owner, p) in self.points.lock().unwrap().iter() {
            if *owner == user_id && p.recorded_at >= since {
                by_day.entry(p.recorded_at.date()).or_default().push(p.clone());
            }
        }

        Ok(by_day
            .into_iter()
            .rev()
            .filter(|(_, pts)| pts.len() as i64 >= MIN_ROUTE_POINTS)
            .map(|(route_date, pts)| RouteSummary {
                route_date,
                point_count: pts.len() as i64,
                start_time: pts.iter().map(|p| p.recorded_at).min().unwrap(),
                end_time: pts.iter().map(|p| p.recorded_at).max().unwrap(),
                min_lat: pts.iter().map(|p| p.latitude).fold(f64::INFINITY, f64::min),
                max_lat: pts.iter().map(|p| p.latitude).fold(f64::NEG_INFINITY, f64::max),
                min_lon: pts.iter().map(|p| p.longitude).fold(f64::INFINITY, f64::min),
                max_lon: pts.iter().map(|p| p.longitude).fold(f64::NEG_INFINITY, f64::max),
            })
            .collect())
    }

    async fn route_points(&self, user_id: i64, route_date: NaiveDate) -> Result<Vec<Point>, AppError> {
        self.check()?;
        let mut points: Vec<Point> = self
            .points
            .lock()
            .unwrap()
            .iter()
            .filter(|(owner, p)| *owner == user_id && p.recorded_at.date() == route_date)
            .map(|(_, p)| p.clone())
            .collect();
        points.sort_by_key(|p| p.recorded_at);
        Ok(points)
    }

    async fn insert_point(&self, point: NewPoint) -> Result<InsertedPoint, AppError> {
        self.check()?;
        let mut points = self.points.lock().unwrap();
        let taken = points
            .iter()
            .any(|(owner, p)| *owner == point.user_id && p.recorded_at == point.recorded_at);
        let recorded_at = shift_on_collision(point.recorded_at, taken);
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        points.push((
            point.user_id,
            Point {
                id,
                latitude: point.latitude,
                longitude: point.longitude,
                recorded_at,
                accuracy: Some(point.accuracy),
                altitude: point.altitude,
                speed: None,
                battery: None,
            },
        ));
        Ok(InsertedPoint { id, recorded_at })
    }

    async fn delete_point(&self, user_id: i64, point_id: i64) -> Result<bool, AppError> {
        self.check()?;
        let mut points = self.points.lock().unwrap();
        let before = points.len();
        points.retain(|(owner, p)| !(*owner == user_id && p.id == point_id));
        Ok(points.len() != before)
    }
}

pub fn app(store: Arc<InMemoryStore>) -> Router {
    create_app_router(AppState::new(store, EnvironmentConfig::default()))
}

/// Ejecutar una petición y devolver estado + cuerpo
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

pub async fn send_json(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let (status, body) = send(app, request).await;
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}
