//! In-process router tests.
//!
//! The app runs over a pool that never connects, so these cover routing,
//! middleware, and validation that rejects a request before any query.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::StatusCode;
use serde_json::Value;

use arycar_integration_tests::{send, test_app};

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_version_reports_service() {
    let resp = send(test_app(), "GET", "/api/version", None).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["service"], "arycar-api");
    assert_eq!(resp.body["version"], "1.0.0");
    assert!(resp.request_id.is_some());
}

#[tokio::test]
async fn test_health_reports_database_down() {
    let resp = send(test_app(), "GET", "/api/health", None).await;

    assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp.body["status"], "error");
    assert_eq!(resp.body["db"], "disconnected");
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let resp = send(test_app(), "GET", "/api/nope", None).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Intake
// =============================================================================

#[tokio::test]
async fn test_search_rejects_invalid_plate() {
    let resp = send(
        test_app(),
        "POST",
        "/api/intake/search",
        Some(r#"{"plate": "AB-12"}"#),
    )
    .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert!(resp.error().is_some());
}

#[tokio::test]
async fn test_search_rejects_malformed_json() {
    let resp = send(test_app(), "POST", "/api/intake/search", Some("{plate")).await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert!(resp.error().is_some());
}

#[tokio::test]
async fn test_register_requires_name_first() {
    let body = r#"{"name": "  ", "cpf": "123", "plate": "x"}"#;
    let resp = send(test_app(), "POST", "/api/intake/register", Some(body)).await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error(), Some("customer name is required"));
}

#[tokio::test]
async fn test_register_rejects_short_cpf() {
    let body = r#"{"name": "Maria", "cpf": "123.456", "plate": "ABC1234"}"#;
    let resp = send(test_app(), "POST", "/api/intake/register", Some(body)).await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert!(resp.error().unwrap().contains("CPF"));
}

#[tokio::test]
async fn test_km_is_required_on_check_in() {
    let resp = send(
        test_app(),
        "POST",
        "/api/intake/vehicles/1/km",
        Some(r#"{"km": "  "}"#),
    )
    .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Catalog
// =============================================================================

#[tokio::test]
async fn test_create_service_requires_name() {
    let body = r#"{"name": "", "pricing": {}}"#;
    let resp = send(test_app(), "POST", "/api/services", Some(body)).await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error(), Some("service name is required"));
}

fn service_body(price: &str) -> String {
    format!(
        r#"{{
            "name": "Polimento",
            "pricing": {{"caminhao": {{
                "cost_p": "0", "cost_m": "0", "cost_g": "0",
                "price_p": "{price}", "price_m": "{price}", "price_g": "{price}"
            }}}}
        }}"#
    )
}

#[tokio::test]
async fn test_create_service_rejects_price_beyond_column() {
    let body = service_body("1000000000");
    let resp = send(test_app(), "POST", "/api/services", Some(&body)).await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert!(resp.error().unwrap().contains("99999999.99"));
}

#[tokio::test]
async fn test_create_service_rejects_fractional_centavos() {
    let body = service_body("10.005");
    let resp = send(test_app(), "POST", "/api/services", Some(&body)).await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert!(resp.error().unwrap().contains("caminhao"));
}

#[tokio::test]
async fn test_available_rejects_bad_selection() {
    let resp = send(
        test_app(),
        "GET",
        "/api/services/available?vehicle_type=carro&size=M&selected=1,abc",
        None,
    )
    .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_available_rejects_unknown_vehicle_type() {
    let resp = send(
        test_app(),
        "GET",
        "/api/services/available?vehicle_type=barco&size=M",
        None,
    )
    .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Orders
// =============================================================================

#[tokio::test]
async fn test_quote_rejects_overflowing_quantity() {
    let body = r#"{
        "vehicle_type": "carro",
        "size": "M",
        "lines": [{"service_id": 7, "quantity": 4294967295}, {"service_id": 7}]
    }"#;
    let resp = send(test_app(), "POST", "/api/cart/quote", Some(body)).await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert!(resp.error().unwrap().contains("4294967295"));
}

#[tokio::test]
async fn test_quote_rejects_repeated_lines_over_limit() {
    let body = r#"{
        "vehicle_type": "carro",
        "size": "M",
        "lines": [{"service_id": 7, "quantity": 600}, {"service_id": 7, "quantity": 600}]
    }"#;
    let resp = send(test_app(), "POST", "/api/cart/quote", Some(body)).await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert!(resp.error().unwrap().contains("1200"));
}

#[tokio::test]
async fn test_create_order_rejects_huge_quantity() {
    let body = r#"{
        "customer_id": 1,
        "vehicle_id": 1,
        "lines": [{"service_id": 1, "quantity": 200000000}]
    }"#;
    let resp = send(test_app(), "POST", "/api/orders", Some(body)).await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert!(resp.error().unwrap().contains("between 1 and 999"));
}

#[tokio::test]
async fn test_order_list_rejects_unknown_status() {
    let resp = send(test_app(), "GET", "/api/orders?status=parked", None).await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert!(resp.error().unwrap().contains("parked"));
}

#[tokio::test]
async fn test_status_update_rejects_unknown_status() {
    let resp = send(
        test_app(),
        "PUT",
        "/api/orders/1/status",
        Some(r#"{"status": "lost"}"#),
    )
    .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_order_path_must_be_numeric() {
    let resp = send(test_app(), "GET", "/api/orders/abc", None).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Employees, checklists, settings
// =============================================================================

#[tokio::test]
async fn test_create_employee_requires_name() {
    let resp = send(
        test_app(),
        "POST",
        "/api/employees",
        Some(r#"{"name": " ", "role": "Lavador"}"#),
    )
    .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_checklist_items_are_listed() {
    let resp = send(test_app(), "GET", "/api/checklists/items", None).await;

    assert_eq!(resp.status, StatusCode::OK);
    let items = resp.body.as_array().unwrap();
    assert_eq!(items.len(), 24);
    assert_eq!(items[0]["key"], "paint_scratches");
}

#[tokio::test]
async fn test_checklist_rejects_unknown_item() {
    let body = r#"{
        "kind": "entry",
        "vehicle_plate": "ABC1234",
        "items": {"flux_capacitor": {"checked": true}}
    }"#;
    let resp = send(test_app(), "POST", "/api/checklists", Some(body)).await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert!(resp.error().unwrap().contains("flux_capacitor"));
}

#[tokio::test]
async fn test_checklist_history_requires_valid_plate() {
    let resp = send(test_app(), "GET", "/api/checklists?plate=12", None).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Lookups
// =============================================================================

#[tokio::test]
async fn test_plate_lookup_without_token_is_unavailable() {
    let resp = send(test_app(), "GET", "/api/lookup/plate/ABC1D23", None).await;

    assert_eq!(resp.status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(resp.error().is_some());
}

#[tokio::test]
async fn test_plate_lookup_validates_before_configuration() {
    let resp = send(test_app(), "GET", "/api/lookup/plate/12", None).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_fipe_models_reject_non_numeric_brand() {
    for code in ["..%2F..%2Fmarcas%3Fx%3D", "abc", "21a"] {
        let uri = format!("/api/lookup/fipe/carro/brands/{code}/models");
        let resp = send(test_app(), "GET", &uri, None).await;

        assert_eq!(resp.status, StatusCode::BAD_REQUEST, "{code}");
        assert!(resp.error().unwrap().contains("brand code"));
    }
}

#[tokio::test]
async fn test_fipe_models_degrade_to_empty() {
    let resp = send(test_app(), "GET", "/api/lookup/fipe/carro/brands/21/models", None).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, Value::Array(Vec::new()));
}

#[tokio::test]
async fn test_fipe_brands_degrade_to_empty() {
    let resp = send(test_app(), "GET", "/api/lookup/fipe/carro/brands", None).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, Value::Array(Vec::new()));
}
