//! HTTP client tests against an in-process API server

use std::sync::Arc;
use std::time::Duration;

use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use gozer_dashboard::http::{HttpClient, Transport};
use gozer_dashboard::{DashboardError, DeploymentService, ImagesService};
use secrecy::SecretString;
use serde_json::{json, Value};

use crate::fixtures::{deployment, images};

async fn list_deployments() -> Json<Value> {
    Json(json!({"deployments": [
        deployment("web", Some("shop"), &["shop:v2"]),
        deployment("blog", Some("news"), &["blog:v1"]),
    ]}))
}

async fn get_deployment(Path(name): Path<String>) -> Response {
    if name == "web" {
        Json(deployment("web", Some("shop"), &["shop:v2"])).into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

async fn update_deployment(Path(name): Path<String>, Json(body): Json<Value>) -> Json<Value> {
    Json(json!({"updated": name, "request": body}))
}

async fn get_images(Path(name): Path<String>) -> Response {
    match name.as_str() {
        "shop" | "org/shop" => Json(images(&[("shop:v1", "2017-01-01"), ("shop:v2", "2017-01-02")])).into_response(),
        "broken" => (StatusCode::INTERNAL_SERVER_ERROR, "store unavailable").into_response(),
        "garbage" => "not json".into_response(),
        "silent" => StatusCode::OK.into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn whoami(headers: HeaderMap) -> Json<Value> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    Json(json!({"authorization": auth}))
}

async fn start_server() -> String {
    let app = Router::new()
        .route("/deployments", get(list_deployments))
        .route("/deployments/{name}", get(get_deployment).put(update_deployment))
        .route("/images/{name}", get(get_images))
        .route("/whoami", get(whoami));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}/", addr)
}

fn client(base_url: &str) -> HttpClient {
    HttpClient::new(base_url, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_base_url_trailing_slash_trimmed() {
    let base_url = start_server().await;
    let client = client(&base_url);

    assert_eq!(client.base_url(), base_url.trim_end_matches('/'));
    assert!(client.get("/deployments").await.unwrap()["deployments"].is_array());
}

#[tokio::test]
async fn test_status_mapping() {
    let client = client(&start_server().await);

    assert!(client.get("/deployments/ghost").await.unwrap_err().is_not_found());

    match client.get("/images/broken").await {
        Err(DashboardError::FetchError(msg)) => {
            assert!(msg.contains("500"));
            assert!(msg.contains("store unavailable"));
        }
        other => panic!("expected fetch error, got {:?}", other),
    }

    assert!(matches!(client.get("/images/garbage").await, Err(DashboardError::FetchError(_))));
    assert!(client.get("/images/silent").await.unwrap().is_null());
}

#[tokio::test]
async fn test_unreachable_server_is_fetch_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client(&format!("http://{}", addr));
    assert!(matches!(client.get("/deployments").await, Err(DashboardError::FetchError(_))));
}

#[tokio::test]
async fn test_bearer_token_sent() {
    let base_url = start_server().await;
    let client = HttpClient::with_token(&base_url, Duration::from_secs(5), SecretString::from("s3cret".to_string())).unwrap();

    let body = client.get("/whoami").await.unwrap();
    assert_eq!(body["authorization"], "Bearer s3cret");
}

#[tokio::test]
async fn test_services_over_http() {
    let transport: Arc<dyn Transport> = Arc::new(client(&start_server().await));
    let images = ImagesService::new(transport.clone());
    let service = DeploymentService::new(transport, images.clone());

    let views = service.list().await.unwrap();
    assert_eq!(views.len(), 2);

    let web = service.get("web").await.unwrap();
    assert_eq!(web.containers[0].image_name, "shop");

    let ack = service.set("web", "web-0", "shop:v3").await.unwrap();
    assert_eq!(ack["updated"], "web");
    assert_eq!(ack["request"], json!({"container_name": "web-0", "image": "shop:v3"}));

    let nested = images.get("org/shop").await.unwrap();
    assert_eq!(nested.len(), 2);
    assert!(images.get("unknown").await.unwrap().is_empty());

    let details = service.get_application_details("shop").await.unwrap();
    assert_eq!(details.image_lists["shop"][0].image.name, "shop:v2");
    assert_eq!(details.image_lists["shop"][0].deployments[0].name, "web");
}
