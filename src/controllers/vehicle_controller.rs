use std::sync::Arc;

use serde_json::{Map, Value};

use crate::dto::vehicle_dto::VehicleResponse;
use crate::models::vehicle::normalize_vin;
use crate::repositories::VehicleStore;
use crate::utils::errors::{not_found_error, AppResult};
use crate::utils::validation::{ValidationMode, VehicleValidator};

pub struct VehicleController {
    store: Arc<dyn VehicleStore>,
}

impl VehicleController {
    pub fn new(store: Arc<dyn VehicleStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> AppResult<Vec<VehicleResponse>> {
        let vehicles = self.store.list_all().await?;
        Ok(vehicles.into_iter().map(VehicleResponse::from).collect())
    }

    pub async fn get_by_vin(&self, vin: &str) -> AppResult<VehicleResponse> {
        let vehicle = self
            .store
            .find_by_vin(&normalize_vin(vin))
            .await?
            .ok_or_else(|| not_found_error("Vehicle"))?;

        Ok(vehicle.into())
    }

    pub async fn create(&self, body: Map<String, Value>) -> AppResult<VehicleResponse> {
        // Validar (incluye la comprobación de unicidad del VIN)
        let vehicle = VehicleValidator::new(self.store.as_ref())
            .validate_new(&body)
            .await?;

        // Entre la validación y el insert otro cliente puede registrar el mismo
        // VIN; la primary key lo rechaza y sale como error de integridad
        let created = self.store.insert(&vehicle).await?;
        tracing::info!("🚗 Vehículo creado: {}", created.vin);

        Ok(created.into())
    }

    pub async fn update(&self, vin: &str, body: Map<String, Value>) -> AppResult<VehicleResponse> {
        let key = normalize_vin(vin);

        if !self.store.exists(&key).await? {
            return Err(not_found_error("Vehicle"));
        }

        let patch = VehicleValidator::new(self.store.as_ref())
            .validate(&body, ValidationMode::Update { current_vin: vin })
            .await?;

        // El VIN es la clave: el parche nunca lo reescribe
        let updated = self
            .store
            .update(&key, &patch)
            .await?
            .ok_or_else(|| not_found_error("Vehicle"))?;
        tracing::info!("✏️ Vehículo actualizado: {}", updated.vin);

        Ok(updated.into())
    }

    pub async fn delete(&self, vin: &str) -> AppResult<()> {
        let key = normalize_vin(vin);

        if !self.store.delete(&key).await? {
            return Err(not_found_error("Vehicle"));
        }
        tracing::info!("🗑️ Vehículo eliminado: {}", key);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::vehicle::{Vehicle, VehiclePatch};
    use crate::repositories::{InMemoryVehicleRepository, StoreResult};
    use crate::utils::errors::AppError;
    use async_trait::async_trait;
    use serde_json::json;

    /// Store que nunca encuentra nada al validar, para simular la carrera
    /// entre la comprobación de unicidad y el insert
    struct RacyStore {
        inner: InMemoryVehicleRepository,
    }

    #[async_trait]
    impl VehicleStore for RacyStore {
        fn backend(&self) -> &'static str {
            "racy"
        }

        async fn find_by_vin(&self, _vin: &str) -> StoreResult<Option<Vehicle>> {
            Ok(None)
        }

        async fn list_all(&self) -> StoreResult<Vec<Vehicle>> {
            self.inner.list_all().await
        }

        async fn insert(&self, vehicle: &Vehicle) -> StoreResult<Vehicle> {
            self.inner.insert(vehicle).await
        }

        async fn update(&self, vin: &str, patch: &VehiclePatch) -> StoreResult<Option<Vehicle>> {
            self.inner.update(vin, patch).await
        }

        async fn delete(&self, vin: &str) -> StoreResult<bool> {
            self.inner.delete(vin).await
        }
    }

    fn body() -> Map<String, Value> {
        json!({
            "vin": "5YJ3E1EA7KF317000",
            "manufacturer_name": "Tesla",
            "description": "Electric sedan",
            "horse_power": 283,
            "model_name": "Model 3",
            "model_year": 2019,
            "purchase_price": 39990.5,
            "fuel_type": "Electric"
        })
        .as_object()
        .cloned()
        .unwrap()
    }

    #[tokio::test]
    async fn test_race_surfaces_as_integrity_error() {
        let controller = VehicleController::new(Arc::new(RacyStore {
            inner: InMemoryVehicleRepository::new(),
        }));
        controller.create(body()).await.unwrap();

        let result = controller.create(body()).await;

        assert!(matches!(result, Err(AppError::Integrity(_))));
        assert_eq!(controller.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_keeps_path_vin() {
        let controller = VehicleController::new(Arc::new(InMemoryVehicleRepository::new()));
        controller.create(body()).await.unwrap();

        let updated = controller
            .update(
                "5yj3e1ea7kf317000",
                json!({ "vin": "NEWVIN0000000001", "model_year": 2020 })
                    .as_object()
                    .cloned()
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(updated.vin, "5YJ3E1EA7KF317000");
        assert_eq!(updated.model_year, 2020);
        assert!(matches!(
            controller.get_by_vin("NEWVIN0000000001").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_vehicle_is_not_found() {
        let controller = VehicleController::new(Arc::new(InMemoryVehicleRepository::new()));

        assert!(matches!(
            controller.update("NOPE", Map::new()).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            controller.delete("NOPE").await,
            Err(AppError::NotFound(_))
        ));
    }
}
