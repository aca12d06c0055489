use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt; // for `oneshot`

use vehicle_registry::config::EnvironmentConfig;
use vehicle_registry::{create_app, AppState};

// Función helper para crear la app de test
fn create_test_app() -> Router {
    create_app(AppState::in_memory(EnvironmentConfig::default()))
}

fn honda() -> Value {
    json!({
        "vin": "1hgbh41jxmn109186",
        "manufacturer_name": "Honda",
        "description": "A reliable sedan",
        "horse_power": 200,
        "model_name": "Accord",
        "model_year": 2020,
        "purchase_price": 25000.00,
        "fuel_type": "GASOLINE"
    })
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(body) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };
    send_request(app, request).await
}

async fn send_request(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app();

    let (status, body) = send(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "memory");
}

#[tokio::test]
async fn test_get_all_vehicles_empty() {
    let app = create_test_app();

    let (status, body) = send(&app, Method::GET, "/vehicle", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_create_vehicle_normalizes_and_echoes() {
    let app = create_test_app();

    let (status, body) = send(&app, Method::POST, "/vehicle", Some(honda())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body,
        json!({
            "vin": "1HGBH41JXMN109186",
            "manufacturer_name": "Honda",
            "description": "A reliable sedan",
            "horse_power": 200,
            "model_name": "Accord",
            "model_year": 2020,
            "purchase_price": 25000.0,
            "fuel_type": "gasoline"
        })
    );

    // Lectura sin distinguir mayúsculas
    let (status, fetched) = send(&app, Method::GET, "/vehicle/1hgbh41jxmn109186", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, body);

    let (_, listed) = send(&app, Method::GET, "/vehicle", None).await;
    assert_eq!(listed, json!([body]));
}

#[tokio::test]
async fn test_create_vehicle_duplicate_vin_differing_case() {
    let app = create_test_app();
    send(&app, Method::POST, "/vehicle", Some(honda())).await;

    let mut duplicate = honda();
    duplicate["vin"] = json!("1HGBH41JXMN109186");
    let (status, body) = send(&app, Method::POST, "/vehicle", Some(duplicate)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"]["vin"], json!(["VIN already exists"]));
}

#[tokio::test]
async fn test_create_vehicle_missing_each_field() {
    let app = create_test_app();

    for field in [
        "vin",
        "manufacturer_name",
        "description",
        "horse_power",
        "model_name",
        "model_year",
        "purchase_price",
        "fuel_type",
    ] {
        let mut payload = honda();
        payload.as_object_mut().unwrap().remove(field);

        let (status, body) = send(&app, Method::POST, "/vehicle", Some(payload)).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "field {field}");
        assert_eq!(
            body["errors"][field],
            json!([format!("{field} is required")])
        );
    }
}

#[tokio::test]
async fn test_create_vehicle_invalid_fuel_type() {
    let app = create_test_app();
    let mut payload = honda();
    payload["fuel_type"] = json!("nuclear");

    let (status, body) = send(&app, Method::POST, "/vehicle", Some(payload)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["errors"]["fuel_type"],
        json!(["fuel_type must be one of: gasoline, diesel, electric, hybrid, hydrogen, other"])
    );
}

#[tokio::test]
async fn test_create_vehicle_reports_every_invalid_field() {
    let app = create_test_app();
    let payload = json!({
        "vin": 12345,
        "manufacturer_name": "  ",
        "description": "Old timer",
        "horse_power": -10,
        "model_name": "T",
        "model_year": 1800,
        "purchase_price": "cheap",
        "fuel_type": "diesel"
    });

    let (status, body) = send(&app, Method::POST, "/vehicle", Some(payload)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let errors = body["errors"].as_object().unwrap();
    let mut fields: Vec<&str> = errors.keys().map(String::as_str).collect();
    fields.sort();
    assert_eq!(
        fields,
        vec![
            "horse_power",
            "manufacturer_name",
            "model_year",
            "purchase_price",
            "vin"
        ]
    );
    assert_eq!(body["errors"]["vin"], json!(["VIN must be a string"]));
}

#[tokio::test]
async fn test_create_vehicle_invalid_json() {
    let app = create_test_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/vehicle")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send_request(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid JSON");
}

#[tokio::test]
async fn test_create_vehicle_non_object_body() {
    let app = create_test_app();

    let (status, body) = send(&app, Method::POST, "/vehicle", Some(json!([honda()]))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid JSON");
}

#[tokio::test]
async fn test_create_vehicle_without_content_type() {
    let app = create_test_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/vehicle")
        .body(Body::from(honda().to_string()))
        .unwrap();

    let (status, _) = send_request(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_vehicle_not_found() {
    let app = create_test_app();

    let (status, body) = send(&app, Method::GET, "/vehicle/DOESNOTEXIST123", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Vehicle not found");
}

#[tokio::test]
async fn test_update_vehicle_partial() {
    let app = create_test_app();
    send(&app, Method::POST, "/vehicle", Some(honda())).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/vehicle/1HGBH41JXMN109186",
        Some(json!({ "fuel_type": "HYBRID", "purchase_price": 23999.99, "description": " Updated " })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fuel_type"], "hybrid");
    assert_eq!(body["purchase_price"], json!(23999.99));
    assert_eq!(body["description"], "Updated");
    assert_eq!(body["model_name"], "Accord");
    assert_eq!(body["vin"], "1HGBH41JXMN109186");
}

#[tokio::test]
async fn test_update_vehicle_null_field() {
    let app = create_test_app();
    send(&app, Method::POST, "/vehicle", Some(honda())).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/vehicle/1hgbh41jxmn109186",
        Some(json!({ "model_name": null, "color": null })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"]["model_name"], json!(["model_name cannot be null"]));
    assert_eq!(body["errors"]["color"], json!(["color cannot be null"]));
}

#[tokio::test]
async fn test_update_vehicle_null_vin_is_rejected() {
    let app = create_test_app();
    send(&app, Method::POST, "/vehicle", Some(honda())).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/vehicle/1HGBH41JXMN109186",
        Some(json!({ "vin": null, "horse_power": 300 })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"], json!({ "vin": ["VIN must be a string"] }));

    // El parche no se aplicó
    let (_, fetched) = send(&app, Method::GET, "/vehicle/1HGBH41JXMN109186", None).await;
    assert_eq!(fetched["horse_power"], 200);
}

#[tokio::test]
async fn test_create_vehicle_null_vin() {
    let app = create_test_app();
    let mut payload = honda();
    payload["vin"] = Value::Null;

    let (status, body) = send(&app, Method::POST, "/vehicle", Some(payload)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["errors"],
        json!({ "vin": ["vin is required", "VIN must be a string"] })
    );
}

#[tokio::test]
async fn test_create_vehicle_horse_power_out_of_range() {
    let app = create_test_app();
    let mut payload = honda();
    payload["horse_power"] = json!(10_000_000_000_000_000_000u64);

    let (status, body) = send(&app, Method::POST, "/vehicle", Some(payload)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["errors"]["horse_power"],
        json!(["horse_power is out of range"])
    );
}

#[tokio::test]
async fn test_update_vehicle_to_existing_vin() {
    let app = create_test_app();
    send(&app, Method::POST, "/vehicle", Some(honda())).await;
    let mut other = honda();
    other["vin"] = json!("JT2BG22K1X0123456");
    send(&app, Method::POST, "/vehicle", Some(other)).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/vehicle/1HGBH41JXMN109186",
        Some(json!({ "vin": "jt2bg22k1x0123456" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"]["vin"], json!(["VIN already exists"]));
}

#[tokio::test]
async fn test_update_vehicle_not_found() {
    let app = create_test_app();

    let (status, _) = send(
        &app,
        Method::PUT,
        "/vehicle/DOESNOTEXIST123",
        Some(json!({ "horse_power": 100 })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_then_get_is_not_found() {
    let app = create_test_app();
    send(&app, Method::POST, "/vehicle", Some(honda())).await;

    let (status, body) = send(&app, Method::DELETE, "/vehicle/1hgbh41jxmn109186", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = send(&app, Method::GET, "/vehicle/1HGBH41JXMN109186", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, "/vehicle/1HGBH41JXMN109186", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
