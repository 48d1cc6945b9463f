//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y conversión de tipos.

use chrono::NaiveDate;
use validator::{ValidationError, ValidationErrors};

use crate::utils::errors::AppError;

/// Validar y convertir string a fecha de ruta (YYYY-MM-DD)
pub fn validate_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        let mut error = ValidationError::new("date");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"YYYY-MM-DD".to_string());
        error
    })
}

/// Validar la ventana de días hacia atrás para listar rutas
pub fn validate_days_back(days: i64) -> Result<(), ValidationError> {
    if days < 0 {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), &days);
        return Err(error);
    }
    Ok(())
}

/// Envolver un `ValidationError` suelto en un `AppError` asociado a un campo
pub fn field_error(field: &'static str, error: ValidationError) -> AppError {
    let mut errors = ValidationErrors::new();
    errors.add(field, error);
    AppError::Validation(errors)
}
