//! Utilidades de validación
//!
//! Este módulo valida y normaliza el cuerpo JSON de un vehículo antes de
//! persistirlo. Los errores se acumulan por campo (nunca se corta en el
//! primero) para que el cliente reciba la lista completa de correcciones.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt::Display;

use num_traits::Zero;
use rust_decimal::Decimal;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Number, Value};
use thiserror::Error;
use validator::ValidationError;

use crate::models::vehicle::{
    normalize_vin, FuelType, Vehicle, VehiclePatch, DESCRIPTION, FUEL_TYPE, HORSE_POWER,
    MANUFACTURER_NAME, MODEL_NAME, MODEL_YEAR, PURCHASE_PRICE, VEHICLE_FIELDS, VIN,
};
use crate::repositories::VehicleStore;
use crate::utils::errors::{AppError, AppResult};

/// Primer año con automóviles de producción
pub const MIN_MODEL_YEAR: i64 = 1886;
pub const MAX_MODEL_YEAR: i64 = 2026;

/// Crear un ValidationError con código y mensaje legible
pub fn field_error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

fn message_of(error: &ValidationError) -> &str {
    error
        .message
        .as_deref()
        .unwrap_or_else(|| error.code.as_ref())
}

/// Errores acumulados: campo -> errores en orden de detección
#[derive(Debug, Clone, Default)]
pub struct FieldErrors(BTreeMap<String, Vec<ValidationError>>);

impl FieldErrors {
    pub fn add(&mut self, field: impl Into<String>, error: ValidationError) {
        self.0.entry(field.into()).or_default().push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }

    pub fn messages(&self, field: &str) -> Vec<&str> {
        self.0
            .get(field)
            .map(|errors| errors.iter().map(message_of).collect())
            .unwrap_or_default()
    }

    pub fn codes(&self, field: &str) -> Vec<&str> {
        self.0
            .get(field)
            .map(|errors| errors.iter().map(|e| e.code.as_ref()).collect())
            .unwrap_or_default()
    }
}

/// En JSON solo viajan los mensajes: `{"vin": ["VIN already exists"]}`
impl Serialize for FieldErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (field, errors) in &self.0 {
            let messages: Vec<&str> = errors.iter().map(message_of).collect();
            map.serialize_entry(field, &messages)?;
        }
        map.end()
    }
}

/// Fallo de validación con el informe completo por campo
#[derive(Debug, Clone, Error)]
#[error("validation failed on {} field(s)", .errors.len())]
pub struct ValidationFailure {
    pub errors: FieldErrors,
}

impl ValidationFailure {
    pub fn new(errors: FieldErrors) -> Self {
        Self { errors }
    }
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(label: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = field_error("not_empty", format!("{label} cannot be empty"));
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor esté en un rango específico
pub fn validate_range<T: PartialOrd + Display + Serialize>(
    field: &str,
    value: T,
    min: T,
    max: T,
) -> Result<(), ValidationError> {
    if value < min || value > max {
        let mut error = field_error("range", format!("{field} must be between {min} and {max}"));
        error.add_param("min".into(), &min);
        error.add_param("max".into(), &max);
        error.add_param("actual".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea positivo
pub fn validate_positive<T: PartialOrd + Display + Zero>(
    field: &str,
    value: T,
) -> Result<(), ValidationError> {
    if value <= T::zero() {
        let mut error = field_error("positive", format!("{field} must be positive"));
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea no negativo
pub fn validate_non_negative<T: PartialOrd + Display + Zero>(
    field: &str,
    value: T,
) -> Result<(), ValidationError> {
    if value < T::zero() {
        let mut error = field_error("non_negative", format!("{field} cannot be negative"));
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que el combustible esté en el catálogo
pub fn validate_fuel_type(value: &str) -> Result<FuelType, ValidationError> {
    value.parse::<FuelType>().map_err(|_| {
        let allowed = FuelType::allowed_list();
        let mut error = field_error("enum", format!("{FUEL_TYPE} must be one of: {allowed}"));
        error.add_param("value".into(), &value);
        error.add_param("allowed_values".into(), &allowed);
        error
    })
}

/// Modo de validación: alta completa o parche parcial
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode<'a> {
    Create,
    Update { current_vin: &'a str },
}

/// Validador de vehículos.
///
/// No escribe nada: la única interacción con el almacenamiento es la
/// comprobación de unicidad del VIN, que refleja el estado en el momento
/// de la llamada.
pub struct VehicleValidator<'a> {
    store: &'a dyn VehicleStore,
}

impl<'a> VehicleValidator<'a> {
    pub fn new(store: &'a dyn VehicleStore) -> Self {
        Self { store }
    }

    /// Validar un cuerpo y devolver los campos normalizados.
    ///
    /// Los campos ausentes siguen ausentes en el parche devuelto.
    pub async fn validate(
        &self,
        body: &Map<String, Value>,
        mode: ValidationMode<'_>,
    ) -> AppResult<VehiclePatch> {
        let mut errors = FieldErrors::default();

        if mode == ValidationMode::Create {
            for field in VEHICLE_FIELDS {
                if body.get(field).map_or(true, Value::is_null) {
                    errors.add(field, required_error(field));
                }
            }
        }

        // La clave se comprueba aunque venga a null
        if matches!(body.get(VIN), Some(Value::Null)) {
            errors.add(VIN, not_a_string("VIN"));
        }
        if let Some(vin) = check_text(body, VIN, "VIN", &mut errors) {
            let candidate = normalize_vin(vin);
            let must_be_unique = match mode {
                ValidationMode::Create => true,
                ValidationMode::Update { current_vin } => candidate != normalize_vin(current_vin),
            };
            if must_be_unique && self.store.exists(&candidate).await? {
                errors.add(VIN, field_error("unique", "VIN already exists"));
            }
        }

        for field in [MANUFACTURER_NAME, DESCRIPTION, MODEL_NAME] {
            check_text(body, field, field, &mut errors);
        }
        check_horse_power(body, &mut errors);
        check_model_year(body, &mut errors);
        check_purchase_price(body, &mut errors);
        check_fuel_type(body, &mut errors);

        if let ValidationMode::Update { .. } = mode {
            for (field, value) in body {
                if value.is_null() && field != VIN {
                    let error = field_error("null", format!("{field} cannot be null"));
                    errors.add(field.as_str(), error);
                }
            }
        }

        if !errors.is_empty() {
            return Err(ValidationFailure::new(errors).into());
        }

        Ok(normalize(body))
    }

    /// Validar un alta y construir el vehículo completo
    pub async fn validate_new(&self, body: &Map<String, Value>) -> AppResult<Vehicle> {
        let patch = self.validate(body, ValidationMode::Create).await?;
        into_vehicle(patch)
    }
}

fn required_error(field: &'static str) -> ValidationError {
    field_error("required", format!("{field} is required"))
}

/// Valor presente y no nulo
fn present<'b>(body: &'b Map<String, Value>, field: &str) -> Option<&'b Value> {
    body.get(field).filter(|value| !value.is_null())
}

fn not_a_string(label: &str) -> ValidationError {
    field_error("type", format!("{label} must be a string"))
}

/// Entero de 64 bits; los floats y booleanos no cuentan como enteros
fn as_integer(field: &str, value: &Value) -> Result<i64, ValidationError> {
    match value {
        Value::Number(number) if number.is_i64() || number.is_u64() => number
            .as_i64()
            .ok_or_else(|| field_error("range", format!("{field} is out of range"))),
        _ => Err(field_error("type", format!("{field} must be an integer"))),
    }
}

fn as_number(value: &Value) -> Option<&Number> {
    match value {
        Value::Number(number) => Some(number),
        _ => None,
    }
}

fn number_to_decimal(number: &Number) -> Option<Decimal> {
    if let Some(i) = number.as_i64() {
        return Some(Decimal::from(i));
    }
    if let Some(u) = number.as_u64() {
        return Some(Decimal::from(u));
    }
    let text = number.to_string();
    text.parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::from_scientific(&text).ok())
}

fn check_text<'b>(
    body: &'b Map<String, Value>,
    field: &'static str,
    label: &str,
    errors: &mut FieldErrors,
) -> Option<&'b str> {
    let value = present(body, field)?;
    let Some(text) = value.as_str() else {
        errors.add(field, not_a_string(label));
        return None;
    };
    match validate_not_empty(label, text) {
        Ok(()) => Some(text),
        Err(error) => {
            errors.add(field, error);
            None
        }
    }
}

fn check_horse_power(body: &Map<String, Value>, errors: &mut FieldErrors) {
    let Some(value) = present(body, HORSE_POWER) else {
        return;
    };
    let checked = as_integer(HORSE_POWER, value)
        .and_then(|horse_power| validate_positive(HORSE_POWER, horse_power));
    if let Err(error) = checked {
        errors.add(HORSE_POWER, error);
    }
}

fn check_model_year(body: &Map<String, Value>, errors: &mut FieldErrors) {
    let Some(value) = present(body, MODEL_YEAR) else {
        return;
    };
    let checked = as_integer(MODEL_YEAR, value)
        .and_then(|year| validate_range(MODEL_YEAR, year, MIN_MODEL_YEAR, MAX_MODEL_YEAR));
    if let Err(error) = checked {
        errors.add(MODEL_YEAR, error);
    }
}

fn check_purchase_price(body: &Map<String, Value>, errors: &mut FieldErrors) {
    let Some(value) = present(body, PURCHASE_PRICE) else {
        return;
    };
    let Some(number) = as_number(value) else {
        errors.add(
            PURCHASE_PRICE,
            field_error("type", format!("{PURCHASE_PRICE} must be a number")),
        );
        return;
    };
    match number_to_decimal(number) {
        None => errors.add(
            PURCHASE_PRICE,
            field_error("range", format!("{PURCHASE_PRICE} is out of range")),
        ),
        Some(price) => {
            if let Err(error) = validate_non_negative(PURCHASE_PRICE, price) {
                errors.add(PURCHASE_PRICE, error);
            }
        }
    }
}

fn check_fuel_type(body: &Map<String, Value>, errors: &mut FieldErrors) {
    if let Some(fuel_type) = check_text(body, FUEL_TYPE, FUEL_TYPE, errors) {
        if let Err(error) = validate_fuel_type(fuel_type) {
            errors.add(FUEL_TYPE, error);
        }
    }
}

/// Solo se llama sin errores pendientes, así que los tipos ya son correctos
fn normalize(body: &Map<String, Value>) -> VehiclePatch {
    let text = |field: &str| present(body, field).and_then(Value::as_str);
    let trimmed = |field: &str| text(field).map(|s| s.trim().to_string());

    VehiclePatch {
        vin: text(VIN).map(normalize_vin),
        manufacturer_name: trimmed(MANUFACTURER_NAME),
        description: trimmed(DESCRIPTION),
        horse_power: present(body, HORSE_POWER)
            .and_then(|value| as_integer(HORSE_POWER, value).ok()),
        model_name: trimmed(MODEL_NAME),
        model_year: present(body, MODEL_YEAR)
            .and_then(|value| as_integer(MODEL_YEAR, value).ok())
            .and_then(|year| i32::try_from(year).ok()),
        purchase_price: present(body, PURCHASE_PRICE)
            .and_then(as_number)
            .and_then(number_to_decimal),
        fuel_type: text(FUEL_TYPE).map(|s| s.trim().to_lowercase()),
    }
}

/// Un alta validada siempre trae los ocho campos; si no, es un fallo interno
fn into_vehicle(patch: VehiclePatch) -> AppResult<Vehicle> {
    match patch {
        VehiclePatch {
            vin: Some(vin),
            manufacturer_name: Some(manufacturer_name),
            description: Some(description),
            horse_power: Some(horse_power),
            model_name: Some(model_name),
            model_year: Some(model_year),
            purchase_price: Some(purchase_price),
            fuel_type: Some(fuel_type),
        } => Ok(Vehicle {
            vin,
            manufacturer_name,
            description,
            horse_power,
            model_name,
            model_year,
            purchase_price,
            fuel_type,
        }),
        incomplete => {
            let presence = [
                (VIN, incomplete.vin.is_some()),
                (MANUFACTURER_NAME, incomplete.manufacturer_name.is_some()),
                (DESCRIPTION, incomplete.description.is_some()),
                (HORSE_POWER, incomplete.horse_power.is_some()),
                (MODEL_NAME, incomplete.model_name.is_some()),
                (MODEL_YEAR, incomplete.model_year.is_some()),
                (PURCHASE_PRICE, incomplete.purchase_price.is_some()),
                (FUEL_TYPE, incomplete.fuel_type.is_some()),
            ];
            let missing: Vec<&str> = presence
                .into_iter()
                .filter(|(_, is_present)| !is_present)
                .map(|(field, _)| field)
                .collect();
            Err(AppError::Internal(format!(
                "validated vehicle is missing {}",
                missing.join(", ")
            )))
        }
    }
}
