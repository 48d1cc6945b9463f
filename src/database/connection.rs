//! Configuración de conexión a PostgreSQL
//!
//! Helpers sobre el pool compartido con la base de datos de Dawarich.

use sqlx::PgPool;

/// Verificar que la conexión funciona
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Función helper para enmascarar la URL de la base de datos en logs
pub fn mask_database_url(url: &str) -> String {
    let Some(scheme_end) = url.find("://") else {
        return url.to_string();
    };
    let Some(at_pos) = url.rfind('@') else {
        return url.to_string();
    };
    if at_pos < scheme_end {
        return url.to_string();
    }

    let protocol = &url[..scheme_end + 3];
    let credentials = &url[scheme_end + 3..at_pos];
    let host = &url[at_pos + 1..];

    match credentials.split_once(':') {
        Some((user, _)) => format!("{}{}:***@{}", protocol, user, host),
        None => url.to_string(),
    }
}
