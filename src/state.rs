//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::controllers::RouteController;
use crate::repositories::PointStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PointStore>,
    pub config: EnvironmentConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn PointStore>, config: EnvironmentConfig) -> Self {
        Self { store, config }
    }

    /// Controlador de rutas ligado al almacén compartido
    pub fn route_controller(&self) -> RouteController {
        RouteController::new(self.store.clone(), self.config.default_days_back)
    }
}
