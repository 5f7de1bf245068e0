//! REST inspection endpoints against a live server.

#![allow(clippy::panic)]

mod common;

use std::time::Duration;

use common::{Client, spawn_server};
use reqwest::StatusCode;
use skirmish_gateway::service::SessionPolicy;

async fn get_json(url: &str) -> (StatusCode, serde_json::Value) {
    let Ok(response) = reqwest::get(url).await else {
        panic!("request failed: {url}");
    };
    let status = response.status();
    let Ok(body) = response.json::<serde_json::Value>().await else {
        panic!("body is not json");
    };
    (status, body)
}

#[tokio::test]
async fn health_reports_counts() {
    let addr = spawn_server(SessionPolicy::default()).await;
    let (status, body) = get_json(&format!("http://{addr}/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["sessions"], 0);
}

#[tokio::test]
async fn session_detail_and_teardown() {
    let addr = spawn_server(SessionPolicy::default()).await;
    let url = format!("http://{addr}/api/v1/sessions/lobby");

    let (status, body) = get_json(&url).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], 2001);

    let mut c1 = Client::connect(addr).await;
    c1.join("lobby").await;
    let _ = c1.recv().await;

    let (status, body) = get_json(&url).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["room"], "lobby");
    assert_eq!(body["phase"], "forming");
    assert_eq!(body["current_player"], "A");
    assert_eq!(body["players"], 1);
    assert_eq!(body["pieces"].as_array().map(Vec::len), Some(10));

    let (_, list) = get_json(&format!("http://{addr}/api/v1/sessions")).await;
    assert_eq!(list["total"], 1);

    c1.close().await;

    // Teardown runs when the server notices the close; poll briefly.
    let mut gone = false;
    for _ in 0..50 {
        let (status, _) = get_json(&url).await;
        if status == StatusCode::NOT_FOUND {
            gone = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(gone, "session was not destroyed after last participant left");
}
