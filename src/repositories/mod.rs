//! Repositorios
//!
//! Acceso a datos de vehículos. [`VehicleStore`] es la frontera que usan el
//! validador y los controladores; hay una implementación sobre PostgreSQL y
//! otra en memoria para desarrollo y tests.

pub mod memory_repository;
pub mod vehicle_repository;

pub use memory_repository::InMemoryVehicleRepository;
pub use vehicle_repository::PgVehicleRepository;

use async_trait::async_trait;
use sqlx::error::ErrorKind;
use thiserror::Error;

use crate::models::vehicle::{Vehicle, VehiclePatch};

/// Errores de la capa de persistencia
#[derive(Error, Debug)]
pub enum StoreError {
    /// Violación de integridad (clave duplicada, restricción NOT NULL...)
    #[error("integrity violation: {0}")]
    Integrity(String),

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_error) = &error {
            if matches!(
                db_error.kind(),
                ErrorKind::UniqueViolation
                    | ErrorKind::NotNullViolation
                    | ErrorKind::CheckViolation
                    | ErrorKind::ForeignKeyViolation
            ) {
                return StoreError::Integrity(db_error.message().to_string());
            }
        }
        StoreError::Database(error)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Operaciones de persistencia sobre la tabla de vehículos.
///
/// Las claves que recibe ya están normalizadas (ver
/// [`normalize_vin`](crate::models::vehicle::normalize_vin)). Cada escritura
/// es atómica: o se aplica entera o no se aplica.
#[async_trait]
pub trait VehicleStore: Send + Sync {
    /// Nombre corto del backend, para logs y health check
    fn backend(&self) -> &'static str;

    async fn find_by_vin(&self, vin: &str) -> StoreResult<Option<Vehicle>>;

    async fn exists(&self, vin: &str) -> StoreResult<bool> {
        Ok(self.find_by_vin(vin).await?.is_some())
    }

    async fn list_all(&self) -> StoreResult<Vec<Vehicle>>;

    /// Insertar; un VIN repetido devuelve [`StoreError::Integrity`]
    async fn insert(&self, vehicle: &Vehicle) -> StoreResult<Vehicle>;

    /// Aplicar un parche parcial; `None` si el vehículo ya no existe
    async fn update(&self, vin: &str, patch: &VehiclePatch) -> StoreResult<Option<Vehicle>>;

    /// Borrar; `false` si no había nada que borrar
    async fn delete(&self, vin: &str) -> StoreResult<bool>;
}
