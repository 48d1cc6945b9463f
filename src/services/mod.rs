//! Services module
//!
//! Este módulo contiene la lógica de negocio que no depende de la base de
//! datos ni del transporte HTTP.

pub mod insertion_service;

pub use insertion_service::*;
