//! Configuración de conexión a PostgreSQL
//!
//! Este módulo abre el pool y crea la tabla `vehicles` si todavía no existe.

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;

use crate::config::DatabaseConfig;

const CREATE_VEHICLES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS vehicles (
    vin TEXT PRIMARY KEY,
    manufacturer_name TEXT NOT NULL,
    description TEXT NOT NULL,
    horse_power BIGINT NOT NULL,
    model_name TEXT NOT NULL,
    model_year INTEGER NOT NULL,
    purchase_price NUMERIC NOT NULL,
    fuel_type TEXT NOT NULL
)
"#;

pub struct DatabaseConnection {
    pool: PgPool,
}

impl DatabaseConnection {
    /// Crear el pool de conexiones a la base de datos
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        info!("🐘 Conectando a {}", mask_database_url(&config.url));

        let pool = config
            .create_pool()
            .await
            .context("Error conectando a la base de datos")?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Crear las tablas que falten
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(CREATE_VEHICLES_TABLE)
            .execute(&self.pool)
            .await
            .context("Error creando la tabla vehicles")?;

        info!("✅ Esquema de base de datos listo");
        Ok(())
    }
}

/// Función helper para enmascarar la URL de la base de datos en logs
fn mask_database_url(url: &str) -> String {
    let Some(at_pos) = url.rfind('@') else {
        return url.to_string();
    };
    let scheme_end = url.find("://").map(|pos| pos + 3).unwrap_or(0);
    if scheme_end > at_pos {
        return url.to_string();
    }
    format!("{}***:***@{}", &url[..scheme_end], &url[at_pos + 1..])
}
