//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del servidor HTTP del editor.

use anyhow::{anyhow, Context, Result};

/// Puerto por defecto: el mismo que declara la imagen y que usa el healthcheck
pub const DEFAULT_PORT: u16 = 5000;

/// Ventana por defecto (en días) para listar rutas
pub const DEFAULT_DAYS_BACK: i64 = 30;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub host: String,
    pub port: u16,
    pub debug: bool,
    pub cors_origins: Vec<String>,
    pub default_days_back: i64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            debug: false,
            cors_origins: Vec::new(),
            default_days_back: DEFAULT_DAYS_BACK,
        }
    }
}

impl EnvironmentConfig {
    /// Cargar la configuración desde las variables de entorno del proceso
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Cargar la configuración desde una fuente arbitraria de claves
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = non_empty(lookup("HOST")).unwrap_or(defaults.host);

        let port = match non_empty(lookup("PORT")) {
            Some(raw) => parse_port(&raw)?,
            None => defaults.port,
        };

        let debug = non_empty(lookup("DEBUG"))
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let cors_origins = non_empty(lookup("CORS_ORIGINS"))
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let default_days_back = match non_empty(lookup("DEFAULT_DAYS_BACK")) {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|d| *d >= 0)
                .ok_or_else(|| anyhow!("DEFAULT_DAYS_BACK must be a non-negative integer, got '{}'", raw))?,
            None => defaults.default_days_back,
        };

        Ok(Self {
            host,
            port,
            debug,
            cors_origins,
            default_days_back,
        })
    }

    /// Obtener la dirección de escucha del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Interpretar un puerto TCP; cero no es un puerto de escucha válido
pub fn parse_port(raw: &str) -> Result<u16> {
    let port: u16 = raw
        .trim()
        .parse()
        .with_context(|| format!("PORT must be a valid number, got '{}'", raw))?;
    if port == 0 {
        return Err(anyhow!("PORT must be between 1 and 65535"));
    }
    Ok(port)
}

pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
