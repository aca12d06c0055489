use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{Map, Value};

use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::vehicle_dto::VehicleResponse;
use crate::state::AppState;
use crate::utils::errors::{invalid_json_error, AppResult};

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/vehicle", get(list_vehicles).post(create_vehicle))
        .route(
            "/vehicle/:vin",
            get(get_vehicle).put(update_vehicle).delete(delete_vehicle),
        )
}

/// Cualquier cuerpo que no sea un objeto JSON es una petición mal formada
fn json_object(payload: Result<Json<Value>, JsonRejection>) -> AppResult<Map<String, Value>> {
    match payload {
        Ok(Json(Value::Object(body))) => Ok(body),
        Ok(_) => Err(invalid_json_error()),
        Err(rejection) => {
            tracing::debug!("JSON rechazado: {}", rejection.body_text());
            Err(invalid_json_error())
        }
    }
}

async fn list_vehicles(State(state): State<AppState>) -> AppResult<Json<Vec<VehicleResponse>>> {
    let controller = VehicleController::new(state.store.clone());
    let response = controller.list().await?;
    Ok(Json(response))
}

async fn create_vehicle(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<(StatusCode, Json<VehicleResponse>)> {
    let body = json_object(payload)?;
    let controller = VehicleController::new(state.store.clone());
    let response = controller.create(body).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn get_vehicle(
    State(state): State<AppState>,
    Path(vin): Path<String>,
) -> AppResult<Json<VehicleResponse>> {
    let controller = VehicleController::new(state.store.clone());
    let response = controller.get_by_vin(&vin).await?;
    Ok(Json(response))
}

async fn update_vehicle(
    State(state): State<AppState>,
    Path(vin): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<VehicleResponse>> {
    let body = json_object(payload)?;
    let controller = VehicleController::new(state.store.clone());
    let response = controller.update(&vin, body).await?;
    Ok(Json(response))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    Path(vin): Path<String>,
) -> AppResult<StatusCode> {
    let controller = VehicleController::new(state.store.clone());
    controller.delete(&vin).await?;
    Ok(StatusCode::NO_CONTENT)
}
