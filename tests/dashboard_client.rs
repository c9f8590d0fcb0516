use std::{net::SocketAddr, sync::Arc, time::Duration};

use room_monitor_service::{
    api,
    dashboard::{
        client::{DashboardClient, RetryPolicy},
        DashboardView,
    },
    sensors::MemoryReadingStore,
};
use serde_json::json;
use tokio::net::TcpListener;

async fn spawn_server(store: MemoryReadingStore) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = api::router(Arc::new(store), true);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn fast_retry(attempts: u32) -> RetryPolicy {
    RetryPolicy {
        attempts,
        backoff: Duration::from_millis(50),
    }
}

#[tokio::test]
async fn fetches_readings_posted_over_http() {
    let addr = spawn_server(MemoryReadingStore::new()).await;
    let base = format!("http://{addr}");

    let http = reqwest::Client::new();
    for temperature in [19.5, 20.0] {
        let resp = http
            .post(format!("{base}/api/sensors"))
            .json(&json!({
                "temperature": temperature,
                "humidity": 48,
                "water_sensor": false,
                "sensor_pir": false,
                "sensor_api": false,
                "servo": true
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::CREATED);
    }

    let client = DashboardClient::new(&base);
    let readings = client.fetch_readings().await.unwrap();
    assert_eq!(readings.len(), 2);

    let view = DashboardView::from_readings(&readings);
    let latest = view.latest.unwrap();
    assert_eq!(latest.temperature, 20.0);
    assert_eq!(latest.servo, "Closed");
    assert_eq!(view.chart.temperature, vec![19.5, 20.0]);
}

#[tokio::test]
async fn empty_server_yields_empty_list() {
    let addr = spawn_server(MemoryReadingStore::new()).await;
    let client = DashboardClient::new(&format!("http://{addr}"));
    assert!(client.fetch_readings().await.unwrap().is_empty());
}

#[tokio::test]
async fn server_error_is_reported_with_message() {
    let addr = spawn_server(MemoryReadingStore::failing()).await;
    let client = DashboardClient::new(&format!("http://{addr}"));

    let err = client.fetch_readings().await.unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("500"), "unexpected error: {msg}");
    assert!(msg.contains("Failed to retrieve sensor data"));
}

#[tokio::test]
async fn retry_recovers_once_storage_is_back() {
    let store = MemoryReadingStore::failing();
    let addr = spawn_server(store.clone()).await;
    let client = DashboardClient::new(&format!("http://{addr}"));

    let recover = {
        let store = store.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(80)).await;
            store.set_failing(false);
        })
    };

    let readings = client.fetch_with_retry(fast_retry(20)).await.unwrap();
    assert!(readings.is_empty());
    recover.await.unwrap();
}

#[tokio::test]
async fn retry_gives_up_after_all_attempts() {
    let addr = spawn_server(MemoryReadingStore::failing()).await;
    let client = DashboardClient::new(&format!("http://{addr}"));

    let err = client.fetch_with_retry(fast_retry(2)).await.unwrap_err();
    assert!(err.to_string().contains("giving up after 2 attempt(s)"));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    // Bind then drop to get a port with nothing listening.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = DashboardClient::new(&format!("http://{addr}"));
    let err = client.fetch_with_retry(RetryPolicy::once()).await.unwrap_err();
    assert!(format!("{err:#}").contains("sensor list request failed"));
}
