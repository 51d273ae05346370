//! End-to-end flows against a running API server.
//!
//! These tests require:
//! - A migrated database seeded with the bundled catalog (`arycar seed services`)
//! - The API server running (`cargo run -p arycar-api`)
//!
//! Run with: `cargo test -p arycar-integration-tests -- --ignored`

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use arycar_integration_tests::{base_url, unique_cpf, unique_plate};

/// Register a fresh customer and vehicle, returning `(customer_id, vehicle_id, plate)`.
async fn register(client: &Client, vehicle_type: &str, size: &str) -> (i64, i64, String) {
    let plate = unique_plate();
    let resp = client
        .post(format!("{}/api/intake/register", base_url()))
        .json(&json!({
            "name": "Cliente Teste",
            "cpf": unique_cpf(),
            "phone": "(11) 98888-7777",
            "plate": plate,
            "vehicle_type": vehicle_type,
            "size": size,
            "brand": "Fiat",
            "model": "Argo",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["existing_customer"], false);
    (
        body["customer"]["id"].as_i64().unwrap(),
        body["vehicle"]["id"].as_i64().unwrap(),
        plate,
    )
}

async fn create_order(client: &Client, customer_id: i64, vehicle_id: i64, lines: Value) -> Value {
    let resp = client
        .post(format!("{}/api/orders", base_url()))
        .json(&json!({
            "customer_id": customer_id,
            "vehicle_id": vehicle_id,
            "lines": lines,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.unwrap()
}

async fn delete_order(client: &Client, id: i64) {
    let resp = client
        .delete(format!("{}/api/orders/{id}", base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

// =============================================================================
// Intake
// =============================================================================

#[tokio::test]
#[ignore = "Requires running API server with a seeded database"]
async fn test_search_finds_registered_vehicle() {
    let client = Client::new();
    let (customer_id, vehicle_id, plate) = register(&client, "carro", "M").await;

    // Lowercase and masked input finds the same vehicle
    let masked = format!("{}-{}", &plate[..3], &plate[3..]).to_lowercase();
    let resp = client
        .post(format!("{}/api/intake/search", base_url()))
        .json(&json!({ "plate": masked }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["found"], true);
    assert_eq!(body["customer"]["id"].as_i64().unwrap(), customer_id);
    assert_eq!(body["vehicle"]["id"].as_i64().unwrap(), vehicle_id);
    assert_eq!(body["vehicle"]["plate"], plate);
}

#[tokio::test]
#[ignore = "Requires running API server with a seeded database"]
async fn test_search_unknown_plate_is_not_found() {
    let client = Client::new();
    let plate = unique_plate();

    let resp = client
        .post(format!("{}/api/intake/search", base_url()))
        .json(&json!({ "plate": plate }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["found"], false);
    assert_eq!(body["plate"], plate);
}

#[tokio::test]
#[ignore = "Requires running API server with a seeded database"]
async fn test_register_same_plate_twice_conflicts() {
    let client = Client::new();
    let (_, _, plate) = register(&client, "carro", "P").await;

    let resp = client
        .post(format!("{}/api/intake/register", base_url()))
        .json(&json!({ "name": "Outro", "cpf": unique_cpf(), "plate": plate }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running API server with a seeded database"]
async fn test_failed_registration_stores_no_customer() {
    let client = Client::new();
    let plate = unique_plate();
    let cpfs = [unique_cpf(), unique_cpf()];

    // Both pass the plate check; only one vehicle insert can win
    let attempt = |cpf: &str| {
        client
            .post(format!("{}/api/intake/register", base_url()))
            .json(&json!({ "name": "Corrida", "cpf": cpf, "plate": plate }))
            .send()
    };
    let (a, b) = tokio::join!(attempt(&cpfs[0]), attempt(&cpfs[1]));
    let statuses = [a.unwrap().status(), b.unwrap().status()];
    assert!(statuses.contains(&StatusCode::CREATED));
    assert!(statuses.contains(&StatusCode::CONFLICT));

    // The losing CPF was rolled back with its vehicle
    let loser = if statuses[0] == StatusCode::CONFLICT { &cpfs[0] } else { &cpfs[1] };
    let resp = client
        .post(format!("{}/api/intake/register", base_url()))
        .json(&json!({ "name": "Corrida", "cpf": loser, "plate": unique_plate() }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["existing_customer"], false);
}

#[tokio::test]
#[ignore = "Requires running API server with a seeded database"]
async fn test_record_km_on_check_in() {
    let client = Client::new();
    let (_, vehicle_id, _) = register(&client, "carro", "M").await;

    let resp = client
        .post(format!("{}/api/intake/vehicles/{vehicle_id}/km", base_url()))
        .json(&json!({ "km": "45.000" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["km"], "45000");
}

// =============================================================================
// Orders
// =============================================================================

#[tokio::test]
#[ignore = "Requires running API server with a seeded database"]
async fn test_order_lifecycle() {
    let client = Client::new();
    let (customer_id, vehicle_id, plate) = register(&client, "carro", "M").await;

    // Lavagem Simples + Enceramento, medium car
    let order = create_order(
        &client,
        customer_id,
        vehicle_id,
        json!([{ "service_id": 1 }, { "service_id": 11 }]),
    )
    .await;
    let id = order["id"].as_i64().unwrap();
    assert_eq!(order["status"], "waiting");
    assert_eq!(order["vehicle_plate"], plate);
    assert_eq!(order["items"].as_array().unwrap().len(), 2);
    assert_eq!(order["total"], "130.00");

    // Status moves freely
    let resp = client
        .put(format!("{}/api/orders/{id}/status", base_url()))
        .json(&json!({ "status": "in_progress" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "in_progress");

    let resp = client
        .get(format!("{}/api/orders?status=in_progress", base_url()))
        .send()
        .await
        .unwrap();
    let listed: Vec<Value> = resp.json().await.unwrap();
    assert!(listed.iter().any(|o| o["id"].as_i64() == Some(id)));

    // Add a service, then remove one
    let resp = client
        .post(format!("{}/api/orders/{id}/services", base_url()))
        .json(&json!({ "service_id": 7 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["items"].as_array().unwrap().len(), 3);
    assert_eq!(body["total"], "230.00");

    let resp = client
        .delete(format!("{}/api/orders/{id}/services/11", base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["total"], "160.00");

    delete_order(&client, id).await;

    let resp = client
        .get(format!("{}/api/orders/{id}", base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running API server with a seeded database"]
async fn test_order_rejects_excluded_service() {
    let client = Client::new();
    let (customer_id, vehicle_id, _) = register(&client, "carro", "G").await;

    let order = create_order(&client, customer_id, vehicle_id, json!([{ "service_id": 1 }])).await;
    let id = order["id"].as_i64().unwrap();

    // Lavagem Detalhada conflicts with Lavagem Simples
    let resp = client
        .get(format!("{}/api/orders/{id}/addable", base_url()))
        .send()
        .await
        .unwrap();
    let addable: Vec<Value> = resp.json().await.unwrap();
    assert!(!addable.iter().any(|s| s["service_id"].as_i64() == Some(1)));
    let detailed = addable
        .iter()
        .find(|s| s["service_id"].as_i64() == Some(2))
        .unwrap();
    assert_eq!(detailed["disabled"], true);
    assert!(detailed["reason"].is_string());

    let resp = client
        .post(format!("{}/api/orders/{id}/services", base_url()))
        .json(&json!({ "service_id": 2 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Already in the order
    let resp = client
        .post(format!("{}/api/orders/{id}/services", base_url()))
        .json(&json!({ "service_id": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    delete_order(&client, id).await;
}

#[tokio::test]
#[ignore = "Requires running API server with a seeded database"]
async fn test_empty_cart_is_rejected() {
    let client = Client::new();
    let (customer_id, vehicle_id, _) = register(&client, "moto", "P").await;

    let resp = client
        .post(format!("{}/api/orders", base_url()))
        .json(&json!({
            "customer_id": customer_id,
            "vehicle_id": vehicle_id,
            "lines": [],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Catalog
// =============================================================================

#[tokio::test]
#[ignore = "Requires running API server with a seeded database"]
async fn test_service_responses_reflect_stored_row() {
    let client = Client::new();
    let pricing = json!({ "moto": {
        "cost_p": "2", "cost_m": "3", "cost_g": "4",
        "price_p": "10.5", "price_m": "20", "price_g": "30.1",
    }});

    let resp = client
        .post(format!("{}/api/services", base_url()))
        .json(&json!({ "name": "  Teste Arredondamento ", "pricing": pricing, "hours": "1.5" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = resp.json().await.unwrap();
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["name"], "Teste Arredondamento");
    assert_eq!(created["pricing"]["moto"]["price_p"], "10.50");
    assert_eq!(created["pricing"]["moto"]["price_g"], "30.10");
    assert_eq!(created["hours"], "1.50");

    let resp = client
        .put(format!("{}/api/services/{id}", base_url()))
        .json(&json!({ "name": "Teste Arredondamento", "pricing": pricing, "hours": "2" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["pricing"]["moto"]["price_m"], "20.00");
    assert_eq!(updated["hours"], "2.00");

    let resp = client
        .get(format!("{}/api/services", base_url()))
        .send()
        .await
        .unwrap();
    let listed: Vec<Value> = resp.json().await.unwrap();
    let fetched = listed.iter().find(|s| s["id"].as_i64() == Some(id)).unwrap();
    assert_eq!(fetched, &updated);

    let resp = client
        .delete(format!("{}/api/services/{id}", base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

// =============================================================================
// Checklists
// =============================================================================

#[tokio::test]
#[ignore = "Requires running API server with a seeded database"]
async fn test_checklist_history_by_plate() {
    let client = Client::new();
    let (_, _, plate) = register(&client, "carro", "M").await;

    for kind in ["entry", "exit"] {
        let resp = client
            .post(format!("{}/api/checklists", base_url()))
            .json(&json!({
                "kind": kind,
                "vehicle_plate": plate,
                "items": { "dents": { "checked": true, "note": "porta traseira" } },
                "general_obs": "",
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let resp = client
        .get(format!("{}/api/checklists?plate={plate}", base_url()))
        .send()
        .await
        .unwrap();
    let history: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["kind"], "exit");
}
