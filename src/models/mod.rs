//! Modelos del sistema
//! 
//! Este módulo contiene el modelo de datos que mapea exactamente
//! a la tabla `vehicles` de PostgreSQL.

pub mod vehicle;

pub use vehicle::{FuelType, Vehicle, VehiclePatch};
