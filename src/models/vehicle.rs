//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle, el parche parcial usado en las
//! actualizaciones y el catálogo de combustibles. Mapea exactamente a la
//! tabla `vehicles`, cuya primary key es el VIN.

use rust_decimal::Decimal;
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

pub const VIN: &str = "vin";
pub const MANUFACTURER_NAME: &str = "manufacturer_name";
pub const DESCRIPTION: &str = "description";
pub const HORSE_POWER: &str = "horse_power";
pub const MODEL_NAME: &str = "model_name";
pub const MODEL_YEAR: &str = "model_year";
pub const PURCHASE_PRICE: &str = "purchase_price";
pub const FUEL_TYPE: &str = "fuel_type";

/// Todos los campos de un vehículo, en el orden en que se validan
pub const VEHICLE_FIELDS: [&str; 8] = [
    VIN,
    MANUFACTURER_NAME,
    DESCRIPTION,
    HORSE_POWER,
    MODEL_NAME,
    MODEL_YEAR,
    PURCHASE_PRICE,
    FUEL_TYPE,
];

/// Vehicle principal - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Vehicle {
    pub vin: String,
    pub manufacturer_name: String,
    pub description: String,
    pub horse_power: i64,
    pub model_name: String,
    pub model_year: i32,
    pub purchase_price: Decimal,
    pub fuel_type: String,
}

/// Cambios parciales ya normalizados.
///
/// Un campo `None` significa "no enviado". El VIN viaja en el parche para
/// las altas, pero nunca se reescribe sobre un registro existente.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VehiclePatch {
    pub vin: Option<String>,
    pub manufacturer_name: Option<String>,
    pub description: Option<String>,
    pub horse_power: Option<i64>,
    pub model_name: Option<String>,
    pub model_year: Option<i32>,
    pub purchase_price: Option<Decimal>,
    pub fuel_type: Option<String>,
}

impl VehiclePatch {
    /// Aplicar el parche sobre un vehículo existente (sin tocar el VIN)
    pub fn apply_to(&self, vehicle: &mut Vehicle) {
        if let Some(manufacturer_name) = &self.manufacturer_name {
            vehicle.manufacturer_name = manufacturer_name.clone();
        }
        if let Some(description) = &self.description {
            vehicle.description = description.clone();
        }
        if let Some(horse_power) = self.horse_power {
            vehicle.horse_power = horse_power;
        }
        if let Some(model_name) = &self.model_name {
            vehicle.model_name = model_name.clone();
        }
        if let Some(model_year) = self.model_year {
            vehicle.model_year = model_year;
        }
        if let Some(purchase_price) = self.purchase_price {
            vehicle.purchase_price = purchase_price;
        }
        if let Some(fuel_type) = &self.fuel_type {
            vehicle.fuel_type = fuel_type.clone();
        }
    }
}

/// Forma canónica de un VIN: sin espacios alrededor y en mayúsculas
pub fn normalize_vin(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Tipos de combustible aceptados
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuelType {
    Gasoline,
    Diesel,
    Electric,
    Hybrid,
    Hydrogen,
    Other,
}

impl FuelType {
    pub const ALL: [FuelType; 6] = [
        FuelType::Gasoline,
        FuelType::Diesel,
        FuelType::Electric,
        FuelType::Hybrid,
        FuelType::Hydrogen,
        FuelType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FuelType::Gasoline => "gasoline",
            FuelType::Diesel => "diesel",
            FuelType::Electric => "electric",
            FuelType::Hybrid => "hybrid",
            FuelType::Hydrogen => "hydrogen",
            FuelType::Other => "other",
        }
    }

    /// Lista legible: "gasoline, diesel, ..."
    pub fn allowed_list() -> String {
        Self::ALL
            .iter()
            .map(FuelType::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error al interpretar un tipo de combustible desconocido
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFuelType(pub String);

impl fmt::Display for UnknownFuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown fuel type '{}'", self.0)
    }
}

impl std::error::Error for UnknownFuelType {}

impl FromStr for FuelType {
    type Err = UnknownFuelType;

    /// Sin distinguir mayúsculas ni espacios alrededor
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|fuel| fuel.as_str() == wanted)
            .ok_or_else(|| UnknownFuelType(s.to_string()))
    }
}
