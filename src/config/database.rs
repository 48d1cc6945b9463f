//! Configuración de base de datos
//!
//! Este módulo maneja la conexión y configuración de PostgreSQL (la base de
//! datos de Dawarich) con SQLx.

use anyhow::{Context, Result};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::time::Duration;

use super::environment::non_empty;

/// Origen de los datos de conexión
#[derive(Debug, Clone, PartialEq)]
pub enum DatabaseTarget {
    /// `DATABASE_URL` explícita
    Url(String),
    /// Parámetros sueltos `DB_*`
    Parts {
        host: String,
        port: u16,
        database: String,
        user: String,
        password: String,
    },
}

/// Configuración de la base de datos
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub target: DatabaseTarget,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let target = match non_empty(lookup("DATABASE_URL")) {
            Some(url) => DatabaseTarget::Url(url),
            None => {
                let port = match non_empty(lookup("DB_PORT")) {
                    Some(raw) => raw
                        .trim()
                        .parse::<u16>()
                        .with_context(|| format!("DB_PORT must be a valid number, got '{}'", raw))?,
                    None => 5432,
                };
                DatabaseTarget::Parts {
                    host: non_empty(lookup("DB_HOST")).unwrap_or_else(|| "localhost".to_string()),
                    port,
                    database: non_empty(lookup("DB_NAME")).unwrap_or_else(|| "dawarich".to_string()),
                    user: non_empty(lookup("DB_USER")).unwrap_or_else(|| "dawarich".to_string()),
                    password: lookup("DB_PASSWORD").unwrap_or_default(),
                }
            }
        };

        Ok(Self {
            target,
            max_connections: 10,
            min_connections: 0,
            acquire_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(300),
            max_lifetime: Duration::from_secs(1800),
        })
    }

    /// Opciones de conexión de SQLx
    pub fn connect_options(&self) -> Result<PgConnectOptions> {
        match &self.target {
            DatabaseTarget::Url(url) => url
                .parse::<PgConnectOptions>()
                .context("DATABASE_URL is not a valid PostgreSQL URL"),
            DatabaseTarget::Parts {
                host,
                port,
                database,
                user,
                password,
            } => {
                let mut options = PgConnectOptions::new()
                    .host(host)
                    .port(*port)
                    .database(database)
                    .username(user);
                if !password.is_empty() {
                    options = options.password(password);
                }
                Ok(options)
            }
        }
    }

    /// Descripción segura para logs (sin contraseña)
    pub fn describe(&self) -> String {
        match &self.target {
            DatabaseTarget::Url(url) => crate::database::connection::mask_database_url(url),
            DatabaseTarget::Parts {
                host,
                port,
                database,
                user,
                ..
            } => format!("postgres://{}:***@{}:{}/{}", user, host, port, database),
        }
    }

    /// Crear un pool de conexiones perezoso
    ///
    /// No abre ninguna conexión hasta la primera consulta, así el servidor
    /// arranca aunque PostgreSQL no esté disponible y `/health` lo reporta.
    pub fn create_pool(&self) -> Result<PgPool> {
        let options = self.connect_options()?;
        Ok(PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(self.acquire_timeout)
            .idle_timeout(self.idle_timeout)
            .max_lifetime(self.max_lifetime)
            .connect_lazy_with(options))
    }
}
