use anyhow::Result;
use parking_api::config::{ServerConfig, StorageBackend};
use parking_api::{build_router, AppState};
use serde_json::{json, Value};
use tempfile::TempDir;

/// 在隨機埠啟動服務，回傳 API 基底網址
async fn spawn_server(config: ServerConfig) -> Result<String> {
    let state = AppState::from_config(&config).await?;
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        axum::serve(listener, build_router(state))
            .await
            .expect("serve");
    });

    Ok(format!("http://{}/api/parking", addr))
}

async fn post_vehicle(client: &reqwest::Client, url: &str, vehicle: &str) -> Result<(u16, Value)> {
    let response = client
        .post(url)
        .json(&json!({ "vehicleNumber": vehicle }))
        .send()
        .await?;
    let status = response.status().as_u16();
    Ok((status, response.json().await?))
}

#[tokio::test]
async fn test_root_welcome_message() -> Result<()> {
    let base = spawn_server(ServerConfig::default()).await?;
    let root = base.trim_end_matches("/api/parking");

    let body: Value = reqwest::get(root).await?.json().await?;
    assert_eq!(body["success"], true);
    assert!(body["message"].as_str().unwrap().contains("Welcome"));
    Ok(())
}

#[tokio::test]
async fn test_seeded_slots_listed_in_order() -> Result<()> {
    let base = spawn_server(ServerConfig::default()).await?;

    let body: Value = reqwest::get(format!("{}/slots", base)).await?.json().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "List of Slots");

    let slots = body["slots"].as_array().unwrap();
    assert_eq!(slots.len(), 10);
    for (i, slot) in slots.iter().enumerate() {
        assert_eq!(slot["slotNumber"], i as u64 + 1);
        assert_eq!(slot["inMaintenance"], false);
        assert_eq!(slot["status"], "empty");
    }
    Ok(())
}

#[tokio::test]
async fn test_park_then_unpark_flow() -> Result<()> {
    let base = spawn_server(ServerConfig::default()).await?;
    let client = reqwest::Client::new();

    let (status, body) = post_vehicle(&client, &format!("{}/park", base), "KA-01-1234").await?;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["slotNumber"], 1);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Vehicle parked with ID: "));

    let lot: Value = reqwest::get(format!("{}/status", base)).await?.json().await?;
    let records = lot["parkingLot"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["vehicleNumber"], "KA-01-1234");
    assert_eq!(records[0]["slotNumber"], 1);
    assert!(records[0]["exitTime"].is_null());

    let (status, body) = post_vehicle(&client, &format!("{}/unpark", base), "KA-01-1234").await?;
    assert_eq!(status, 200);
    assert_eq!(body["message"], "Vehicle unparked successfully");
    // 同一秒內離場，未滿一小時以 0 或 1 小時計
    assert!(body["parkingFee"].as_u64().unwrap() <= 10);

    let (status, body) = post_vehicle(&client, &format!("{}/unpark", base), "KA-01-1234").await?;
    assert_eq!(status, 404);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Vehicle not found in the parking lot");

    let slots: Value = reqwest::get(format!("{}/slots", base)).await?.json().await?;
    assert_eq!(slots["slots"][0]["status"], "empty");
    Ok(())
}

#[tokio::test]
async fn test_park_validation_failures() -> Result<()> {
    let base = spawn_server(ServerConfig::default()).await?;
    let client = reqwest::Client::new();
    let park_url = format!("{}/park", base);

    let response = client.post(&park_url).json(&json!({})).send().await?;
    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await?;
    assert_eq!(body["success"], false);

    let response = client
        .post(&park_url)
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(response.status().as_u16(), 400);

    post_vehicle(&client, &park_url, "DUP-1").await?;
    let (status, body) = post_vehicle(&client, &park_url, "DUP-1").await?;
    assert_eq!(status, 400);
    assert!(body["message"].as_str().unwrap().contains("already parked"));
    Ok(())
}

#[tokio::test]
async fn test_full_lot_returns_no_slot_available() -> Result<()> {
    let mut config = ServerConfig::default();
    config.lot.capacity = 3;
    let base = spawn_server(config).await?;
    let client = reqwest::Client::new();
    let park_url = format!("{}/park", base);

    post_vehicle(&client, &park_url, "A").await?;
    post_vehicle(&client, &park_url, "B").await?;
    client.put(format!("{}/maintenance/3", base)).send().await?;

    let (status, body) = post_vehicle(&client, &park_url, "C").await?;
    assert_eq!(status, 400);
    assert_eq!(body["message"], "No parking slot available!");
    Ok(())
}

#[tokio::test]
async fn test_maintenance_toggle_keeps_status() -> Result<()> {
    let base = spawn_server(ServerConfig::default()).await?;
    let client = reqwest::Client::new();

    for vehicle in ["A", "B", "C", "D", "E"] {
        post_vehicle(&client, &format!("{}/park", base), vehicle).await?;
    }

    let response = client.put(format!("{}/maintenance/5", base)).send().await?;
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await?;
    assert_eq!(body["message"], "Parking slot with ID 5 is now in maintenance mode");
    assert_eq!(body["slots"][4]["inMaintenance"], true);
    assert_eq!(body["slots"][4]["status"], "booked");

    let body: Value = client
        .put(format!("{}/maintenance/end/5", base))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(body["message"], "Parking slot with ID 5 is now in working state");
    assert_eq!(body["slots"][4]["inMaintenance"], false);
    Ok(())
}

#[tokio::test]
async fn test_maintenance_bad_slot_ids() -> Result<()> {
    let base = spawn_server(ServerConfig::default()).await?;
    let client = reqwest::Client::new();

    let response = client.put(format!("{}/maintenance/42", base)).send().await?;
    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await?;
    assert_eq!(body["message"], "Parking slot 42 not found.");

    let response = client.put(format!("{}/maintenance/end/abc", base)).send().await?;
    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await?;
    assert_eq!(body["success"], false);
    Ok(())
}

#[tokio::test]
async fn test_statistics_and_history() -> Result<()> {
    let base = spawn_server(ServerConfig::default()).await?;
    let client = reqwest::Client::new();

    post_vehicle(&client, &format!("{}/park", base), "A").await?;
    post_vehicle(&client, &format!("{}/park", base), "B").await?;
    post_vehicle(&client, &format!("{}/unpark", base), "A").await?;
    client.put(format!("{}/maintenance/7", base)).send().await?;
    client.put(format!("{}/maintenance/8", base)).send().await?;

    let stats: Value = reqwest::get(format!("{}/statistics", base)).await?.json().await?;
    assert_eq!(stats["success"], true);
    assert_eq!(stats["totalSlots"], 10);
    assert_eq!(stats["maintenanceSlots"], 2);
    assert_eq!(stats["totalParkedVehicles"], 1);
    assert!(stats["totalRevenue"].is_u64());

    let history: Value = reqwest::get(format!("{}/history", base)).await?.json().await?;
    let records = history["records"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["vehicleNumber"], "A");
    assert!(!records[0]["exitTime"].is_null());
    Ok(())
}

#[tokio::test]
async fn test_file_backend_keeps_state_across_restarts() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut config = ServerConfig::default();
    config.storage.backend = StorageBackend::File;
    config.storage.path = Some(temp_dir.path().join("lot.json").to_string_lossy().to_string());

    let client = reqwest::Client::new();
    let first = spawn_server(config.clone()).await?;
    post_vehicle(&client, &format!("{}/park", first), "KEEP-1").await?;

    let second = spawn_server(config).await?;
    let lot: Value = reqwest::get(format!("{}/status", second)).await?.json().await?;
    assert_eq!(lot["parkingLot"][0]["vehicleNumber"], "KEEP-1");

    let slots: Value = reqwest::get(format!("{}/slots", second)).await?.json().await?;
    assert_eq!(slots["slots"].as_array().unwrap().len(), 10);
    Ok(())
}
