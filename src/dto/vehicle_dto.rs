use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

use crate::models::vehicle::Vehicle;

// Response de vehículo: el precio sale siempre como número flotante
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleResponse {
    pub vin: String,
    pub manufacturer_name: String,
    pub description: String,
    pub horse_power: i64,
    pub model_name: String,
    pub model_year: i32,
    pub purchase_price: f64,
    pub fuel_type: String,
}

impl From<Vehicle> for VehicleResponse {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            purchase_price: vehicle.purchase_price.to_f64().unwrap_or_default(),
            vin: vehicle.vin,
            manufacturer_name: vehicle.manufacturer_name,
            description: vehicle.description,
            horse_power: vehicle.horse_power,
            model_name: vehicle.model_name,
            model_year: vehicle.model_year,
            fuel_type: vehicle.fuel_type,
        }
    }
}
