//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos que mapean las tablas de
//! Dawarich que el editor lee y escribe.

pub mod point;

pub use point::*;
