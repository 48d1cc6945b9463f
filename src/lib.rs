//! Dawarich Route Editor
//!
//! Servicio HTTP para añadir y borrar puntos a mano en las rutas diarias
//! guardadas en la base de datos de Dawarich.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod healthcheck;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use routes::create_app_router;
pub use state::AppState;
