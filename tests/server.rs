//! End-to-end tests over TCP: serving, hot reload and shutdown.

use std::time::Duration;

use axum::http::StatusCode;

use exercise_web::config::{AppConfig, RouteConfig};
use exercise_web::routing::View;

mod common;

fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

#[tokio::test]
async fn test_serves_both_views() {
    let server = common::start_server(AppConfig::default()).await;
    let client = client();

    let res = client.get(server.url("/")).send().await.expect("server unreachable");
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.text().await.unwrap().contains("data-view=\"home\""));

    let res = client.get(server.url("/exercises")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.text().await.unwrap().contains("data-view=\"new-exercise\""));

    let res = client.get(server.url("/missing")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_client_request_id_is_echoed() {
    let server = common::start_server(AppConfig::default()).await;

    let res = client()
        .get(server.url("/"))
        .header("x-request-id", "trace-me-42")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "trace-me-42");

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_config_update_takes_effect_without_restart() {
    let server = common::start_server(AppConfig::default()).await;
    let client = client();

    let res = client.get(server.url("/history")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let mut config = AppConfig::default();
    config.routes.insert(0, RouteConfig::new("/history", View::Home));
    server.config_updates.send(config).unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    let res = client.get(server.url("/history")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // An invalid update is rejected and the previous table keeps serving.
    let mut bad = AppConfig::default();
    bad.routes = vec![RouteConfig::new("no-slash", View::Home)];
    server.config_updates.send(bad).unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    let res = client.get(server.url("/history")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_shutdown_stops_server() {
    let server = common::start_server(AppConfig::default()).await;
    let url = server.url("/");

    server.shutdown.trigger();
    let result = tokio::time::timeout(Duration::from_secs(5), server.handle)
        .await
        .expect("server should stop after shutdown");
    assert!(result.unwrap().is_ok());

    assert!(client().get(url).send().await.is_err());
}
