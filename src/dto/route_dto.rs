use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

// Request para añadir un punto manual a una ruta
#[derive(Debug, Default, Deserialize, Validate)]
pub struct AddPointRequest {
    #[serde(default, deserialize_with = "lenient_coordinate")]
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_coordinate")]
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    pub altitude: Option<f64>,
    #[validate(range(min = 0.0))]
    pub accuracy: Option<f64>,
}

/// Coordenada enviada como número o como texto numérico (`"52.52"`)
fn lenient_coordinate<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(f64),
        Text(String),
    }

    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Number(value)) => Ok(Some(value)),
        Some(NumberOrText::Text(raw)) => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("Invalid coordinate: {raw}"))),
    }
}

// Query de listado de rutas
#[derive(Debug, Default, Deserialize)]
pub struct RoutesQuery {
    pub days: Option<i64>,
}

// Response al añadir un punto
#[derive(Debug, Serialize, Deserialize)]
pub struct AddPointResponse {
    pub success: bool,
    pub point_id: i64,
    pub timestamp: NaiveDateTime,
    pub message: String,
}

// Response al borrar un punto
#[derive(Debug, Serialize, Deserialize)]
pub struct DeletePointResponse {
    pub success: bool,
    pub message: String,
}

// Response del healthcheck
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            error: None,
        }
    }

    pub fn unhealthy(error: String) -> Self {
        Self {
            status: "unhealthy".to_string(),
            error: Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_accept_numeric_text() {
        let request: AddPointRequest =
            serde_json::from_str(r#"{"latitude": "52.5", "longitude": " 13.4 "}"#).unwrap();
        assert_eq!(request.latitude, Some(52.5));
        assert_eq!(request.longitude, Some(13.4));
    }

    #[test]
    fn test_coordinates_missing_or_null_are_none() {
        let request: AddPointRequest = serde_json::from_str(r#"{"latitude": null}"#).unwrap();
        assert_eq!(request.latitude, None);
        assert_eq!(request.longitude, None);
    }

    #[test]
    fn test_coordinates_reject_non_numeric_text() {
        let err = serde_json::from_str::<AddPointRequest>(r#"{"latitude": "north", "longitude": 1}"#)
            .unwrap_err();
        assert!(err.to_string().contains("Invalid coordinate: north"), "got {}", err);
    }
}
