use async_trait::async_trait;
use sqlx::PgPool;

use super::{StoreResult, VehicleStore};
use crate::models::vehicle::{Vehicle, VehiclePatch};

const VEHICLE_COLUMNS: &str =
    "vin, manufacturer_name, description, horse_power, model_name, model_year, purchase_price, fuel_type";

pub struct PgVehicleRepository {
    pool: PgPool,
}

impl PgVehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VehicleStore for PgVehicleRepository {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn find_by_vin(&self, vin: &str) -> StoreResult<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>(&format!(
            "SELECT {VEHICLE_COLUMNS} FROM vehicles WHERE vin = $1"
        ))
        .bind(vin)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vehicle)
    }

    async fn exists(&self, vin: &str) -> StoreResult<bool> {
        let result: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM vehicles WHERE vin = $1)")
                .bind(vin)
                .fetch_one(&self.pool)
                .await?;

        Ok(result.0)
    }

    async fn list_all(&self) -> StoreResult<Vec<Vehicle>> {
        let vehicles = sqlx::query_as::<_, Vehicle>(&format!(
            "SELECT {VEHICLE_COLUMNS} FROM vehicles ORDER BY vin"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    async fn insert(&self, vehicle: &Vehicle) -> StoreResult<Vehicle> {
        // Si algo falla antes del commit, el drop de la transacción hace rollback
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Vehicle>(&format!(
            r#"
            INSERT INTO vehicles ({VEHICLE_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {VEHICLE_COLUMNS}
            "#
        ))
        .bind(&vehicle.vin)
        .bind(&vehicle.manufacturer_name)
        .bind(&vehicle.description)
        .bind(vehicle.horse_power)
        .bind(&vehicle.model_name)
        .bind(vehicle.model_year)
        .bind(vehicle.purchase_price)
        .bind(&vehicle.fuel_type)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(created)
    }

    async fn update(&self, vin: &str, patch: &VehiclePatch) -> StoreResult<Option<Vehicle>> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query_as::<_, Vehicle>(&format!(
            r#"
            UPDATE vehicles
            SET manufacturer_name = COALESCE($2, manufacturer_name),
                description = COALESCE($3, description),
                horse_power = COALESCE($4, horse_power),
                model_name = COALESCE($5, model_name),
                model_year = COALESCE($6, model_year),
                purchase_price = COALESCE($7, purchase_price),
                fuel_type = COALESCE($8, fuel_type)
            WHERE vin = $1
            RETURNING {VEHICLE_COLUMNS}
            "#
        ))
        .bind(vin)
        .bind(patch.manufacturer_name.as_deref())
        .bind(patch.description.as_deref())
        .bind(patch.horse_power)
        .bind(patch.model_name.as_deref())
        .bind(patch.model_year)
        .bind(patch.purchase_price)
        .bind(patch.fuel_type.as_deref())
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    async fn delete(&self, vin: &str) -> StoreResult<bool> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM vehicles WHERE vin = $1")
            .bind(vin)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
