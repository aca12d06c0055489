//! Repositorio en memoria
//!
//! Se usa cuando no hay `DATABASE_URL` configurada y en los tests. Guarda
//! los vehículos en un `BTreeMap` detrás de un `RwLock`, así que el listado
//! sale ordenado por VIN igual que en PostgreSQL.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{StoreError, StoreResult, VehicleStore};
use crate::models::vehicle::{Vehicle, VehiclePatch};

#[derive(Default)]
pub struct InMemoryVehicleRepository {
    vehicles: RwLock<BTreeMap<String, Vehicle>>,
}

impl InMemoryVehicleRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VehicleStore for InMemoryVehicleRepository {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn find_by_vin(&self, vin: &str) -> StoreResult<Option<Vehicle>> {
        Ok(self.vehicles.read().await.get(vin).cloned())
    }

    async fn list_all(&self) -> StoreResult<Vec<Vehicle>> {
        Ok(self.vehicles.read().await.values().cloned().collect())
    }

    async fn insert(&self, vehicle: &Vehicle) -> StoreResult<Vehicle> {
        let mut vehicles = self.vehicles.write().await;
        if vehicles.contains_key(&vehicle.vin) {
            return Err(StoreError::Integrity(format!(
                "duplicate key value violates unique constraint: vin={}",
                vehicle.vin
            )));
        }
        vehicles.insert(vehicle.vin.clone(), vehicle.clone());
        Ok(vehicle.clone())
    }

    async fn update(&self, vin: &str, patch: &VehiclePatch) -> StoreResult<Option<Vehicle>> {
        let mut vehicles = self.vehicles.write().await;
        Ok(vehicles.get_mut(vin).map(|vehicle| {
            patch.apply_to(vehicle);
            vehicle.clone()
        }))
    }

    async fn delete(&self, vin: &str) -> StoreResult<bool> {
        Ok(self.vehicles.write().await.remove(vin).is_some())
    }
}
