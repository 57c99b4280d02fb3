//! Integration tests for the liveness endpoint.
//!
//! These start a real server on a random port and talk to it over HTTP.

use std::{net::SocketAddr, time::Duration};

use ptb_http::{LivenessServer, PONG};

async fn spawn_test_server() -> (LivenessServer, String) {
    let addr: SocketAddr = ([127, 0, 0, 1], 0).into();
    let server = LivenessServer::start(addr).await.unwrap();
    let base = format!("http://{}", server.local_addr());
    (server, base)
}

#[tokio::test]
async fn get_root_returns_pong() {
    let (server, base) = spawn_test_server().await;

    let resp = reqwest::get(format!("{base}/")).await.unwrap();
    assert_eq!(resp.status(), 200);
    let content_type = resp
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/plain"), "{content_type}");
    assert_eq!(resp.text().await.unwrap(), PONG);

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn repeated_checks_get_the_same_answer() {
    let (server, base) = spawn_test_server().await;
    let client = reqwest::Client::new();

    for _ in 0..3 {
        let body = client
            .get(format!("{base}/"))
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(body, PONG);
    }

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn other_routes_and_methods_are_rejected() {
    let (server, base) = spawn_test_server().await;
    let client = reqwest::Client::new();

    let resp = client.get(format!("{base}/health")).send().await.unwrap();
    assert_eq!(resp.status(), 404);

    let resp = client.post(format!("{base}/")).send().await.unwrap();
    assert_eq!(resp.status(), 405);

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn socket_is_closed_after_shutdown() {
    let (server, _base) = spawn_test_server().await;
    let addr = server.local_addr();

    server.shutdown().await.unwrap();

    let connect = tokio::net::TcpStream::connect(addr).await;
    assert!(connect.is_err(), "listener still accepting on {addr}");
}

#[tokio::test]
async fn dropping_the_handle_stops_the_server() {
    let (server, _base) = spawn_test_server().await;
    let addr = server.local_addr();

    drop(server);

    // Graceful shutdown runs on the server task; give it a moment.
    let mut closed = false;
    for _ in 0..50 {
        if tokio::net::TcpStream::connect(addr).await.is_err() {
            closed = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(closed, "listener still accepting on {addr}");
}
