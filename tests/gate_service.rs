//! End-to-end tests driving the gate service over real TCP connections.
//!
//! Every request originates from 127.0.0.1.

use std::net::SocketAddr;
use std::time::Duration;

use address_gate::config::parse_config;

mod common;

#[tokio::test]
async fn test_whitelisted_peer_is_forwarded() {
    let addr: SocketAddr = "127.0.0.1:28381".parse().unwrap();
    let server = common::start_gate_server(
        addr,
        r#"
        [[gates]]
        name = "local"
        mode = "whitelist"
        addresses = ["127.0.0.1", "not-an-ip"]
        "#,
    )
    .await;

    let res = common::client().get(server.url()).send().await.expect("Gate unreachable");
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "OK\n");
}

#[tokio::test]
async fn test_unlisted_peer_gets_404_without_body() {
    let addr: SocketAddr = "127.0.0.1:28382".parse().unwrap();
    let server = common::start_gate_server(
        addr,
        r#"
        [[gates]]
        name = "remote-office"
        mode = "whitelist"
        addresses = ["127.0.0.2"]
        "#,
    )
    .await;

    let res = common::client().get(server.url()).send().await.expect("Gate unreachable");
    assert_eq!(res.status(), 404);
    assert!(res.text().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_configured_error_code() {
    let addr: SocketAddr = "127.0.0.1:28383".parse().unwrap();
    let server = common::start_gate_server(
        addr,
        r#"
        [[gates]]
        name = "banned"
        mode = "blacklist"
        addresses = "127.0.0.1"
        error_code = 403
        "#,
    )
    .await;

    let res = common::client().get(server.url()).send().await.expect("Gate unreachable");
    assert_eq!(res.status(), 403);
}

#[tokio::test]
async fn test_invalid_error_code_falls_back_to_404() {
    let addr: SocketAddr = "127.0.0.1:28384".parse().unwrap();
    let server = common::start_gate_server(
        addr,
        r#"
        [[gates]]
        name = "banned"
        mode = "blacklist"
        addresses = "127.0.0.1"
        error_code = "teapot"
        "#,
    )
    .await;

    let res = common::client().get(server.url()).send().await.expect("Gate unreachable");
    assert_eq!(res.status(), 404);
}

#[tokio::test]
async fn test_blacklist_of_other_peers_forwards() {
    let addr: SocketAddr = "127.0.0.1:28385".parse().unwrap();
    let server = common::start_gate_server(
        addr,
        r#"
        [[gates]]
        name = "banned"
        mode = "blacklist"
        addresses = ["127.0.1.1", "127.2.0.2"]
        "#,
    )
    .await;

    let res = common::client().get(server.url()).send().await.expect("Gate unreachable");
    assert_eq!(res.status(), 200);
}

#[tokio::test]
async fn test_chain_denies_at_first_refusing_gate() {
    let addr: SocketAddr = "127.0.0.1:28386".parse().unwrap();
    let server = common::start_gate_server(
        addr,
        r#"
        [[gates]]
        name = "local"
        mode = "whitelist"
        addresses = ["127.0.0.1", "127.0.0.2"]
        error_code = 403

        [[gates]]
        name = "banned"
        mode = "blacklist"
        addresses = ["127.0.0.1"]
        error_code = 451
        "#,
    )
    .await;

    let res = common::client().get(server.url()).send().await.expect("Gate unreachable");
    assert_eq!(res.status(), 451, "Whitelist passes, blacklist refuses");
}

#[tokio::test]
async fn test_reload_replaces_gates() {
    let addr: SocketAddr = "127.0.0.1:28387".parse().unwrap();
    let server = common::start_gate_server(
        addr,
        r#"
        [[gates]]
        name = "local"
        mode = "whitelist"
        addresses = ["127.0.0.2"]
        "#,
    )
    .await;
    let client = common::client();

    let res = client.get(server.url()).send().await.expect("Gate unreachable");
    assert_eq!(res.status(), 404);

    let mut updated = parse_config(
        r#"
        [[gates]]
        name = "local"
        mode = "whitelist"
        addresses = ["127.0.0.1", "127.0.0.2"]
        "#,
    )
    .unwrap();
    updated.listener.bind_address = addr.to_string();
    server.updates.send(updated).unwrap();

    let mut status = 0;
    for _ in 0..20 {
        tokio::time::sleep(Duration::from_millis(50)).await;
        status = client.get(server.url()).send().await.expect("Gate unreachable").status().as_u16();
        if status == 200 {
            break;
        }
    }
    assert_eq!(status, 200, "Reloaded gate should admit the peer");
}

#[tokio::test]
async fn test_concurrent_requests_share_gates() {
    let addr: SocketAddr = "127.0.0.1:28388".parse().unwrap();
    let server = common::start_gate_server(
        addr,
        r#"
        [[gates]]
        name = "local"
        mode = "whitelist"
        addresses = "127.0.0.1"
        "#,
    )
    .await;
    let client = common::client();

    let mut handles = Vec::new();
    for _ in 0..50 {
        let client = client.clone();
        let url = server.url();
        handles.push(tokio::spawn(async move {
            client.get(url).send().await.map(|res| res.status().as_u16())
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), 200);
    }
}
