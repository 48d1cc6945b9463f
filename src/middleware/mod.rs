//! Middleware del sistema
//!
//! Capas HTTP comunes del editor.

pub mod cors;

pub use cors::*;
