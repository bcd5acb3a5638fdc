//! Deployment service tests against the in-memory transport

use std::sync::Arc;

use gozer_api::Deployment;
use gozer_dashboard::http::mock::{Method, MockResponse};
use gozer_dashboard::http::MockTransport;
use gozer_dashboard::images::enhance_image;
use gozer_dashboard::models::{CreatedAt, DeploymentView};
use gozer_dashboard::{DashboardError, DeploymentService, ImagesService};
use serde_json::json;

use crate::fixtures::{deployment, image, images};

fn service(mock: MockTransport) -> (Arc<MockTransport>, DeploymentService) {
    let mock = Arc::new(mock);
    let images = ImagesService::new(mock.clone());
    (mock.clone(), DeploymentService::new(mock, images))
}

fn shop_deployments() -> serde_json::Value {
    json!({"deployments": [
        deployment("web", Some("foo"), &["a:v1"]),
        deployment("blog", Some("bar"), &["a:v1"]),
        deployment("worker", Some("foo"), &["a:v2", "b:v1"]),
        deployment("cron", None, &["b:v1"]),
    ]})
}

#[tokio::test]
async fn test_list_builds_views() {
    let (_, service) = service(MockTransport::new().with_json("/deployments", shop_deployments()));

    let views = service.list().await.unwrap();
    assert_eq!(views.len(), 4);
    assert_eq!(views[0].name, "web");
    assert_eq!(views[2].containers[1].image_name, "b");
    assert!(views.iter().all(|v| !v.status.contains_key("conditions")));
}

#[tokio::test]
async fn test_list_not_found_is_empty() {
    let (_, service) = service(MockTransport::new());
    assert!(service.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_empty_body_is_empty() {
    let (_, service) = service(MockTransport::new().with_json("/deployments", serde_json::Value::Null));
    assert!(service.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_application_details_placeholder_for_unlisted_build() {
    let mock = MockTransport::new()
        .with_json("/deployments", shop_deployments())
        .with_json("/images/a", images(&[("a:v1", "2017-01-01")]))
        .with_json("/images/b", images(&[("b:v0", "2016-12-01")]));
    let (_, service) = service(mock);

    let details = service.get_application_details("foo").await.unwrap();

    // worker runs a:v2, which the loaded history does not list
    let a = &details.image_lists["a"];
    assert_eq!(a.len(), 2);
    assert_eq!(a[1].image.name, "a:v2");
    assert_eq!(a[1].image.created_at(), CreatedAt::INVALID);
    assert_eq!(a[1].deployments[0].name, "worker");
}

#[tokio::test]
async fn test_get_not_found() {
    let (_, service) = service(MockTransport::new());
    assert!(service.get("ghost").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_get_returns_view_with_original() {
    let (_, service) =
        service(MockTransport::new().with_json("/deployments/web", deployment("web", Some("foo"), &["a:v1"])));

    let view = service.get("web").await.unwrap();
    assert_eq!(view.name, view.original.metadata.name);
    assert_eq!(view.max_unresponsive_time_before_termination, Some(30));
}

#[tokio::test]
async fn test_set_sends_container_and_image() {
    let (mock, service) = service(MockTransport::new());

    service.set("web", "web-0", "a:v9").await.unwrap();

    let puts = mock.requests_with(Method::Put);
    assert_eq!(puts.len(), 1);
    assert_eq!(puts[0].path, "/deployments/web");
    assert_eq!(puts[0].body, Some(json!({"container_name": "web-0", "image": "a:v9"})));
}

#[tokio::test]
async fn test_set_image_for_all_deployments_only_matching() {
    let (mock, service) = service(MockTransport::new().with_json(
        "/deployments",
        json!({"deployments": [
            deployment("one", None, &["x:v1"]),
            deployment("two", None, &["y:v1"]),
            deployment("three", None, &["z:v1"]),
        ]}),
    ));
    let views = service.list().await.unwrap();
    let new_image = enhance_image(serde_json::from_value(image("y:v2", "2017-02-01")).unwrap());

    let acks = service.set_image_for_all_deployments(&views, &new_image, "y").await.unwrap();

    assert_eq!(acks.len(), 1);
    let puts = mock.requests_with(Method::Put);
    assert_eq!(puts.len(), 1);
    assert_eq!(puts[0].path, "/deployments/two");
    assert_eq!(puts[0].body, Some(json!({"container_name": "two-0", "image": "y:v2"})));
}

#[tokio::test]
async fn test_set_image_for_all_deployments_propagates_failure() {
    let mock = MockTransport::new()
        .with_json("/deployments", json!({"deployments": [deployment("one", None, &["x:v1"])]}))
        .respond(
            Method::Put,
            "/deployments/one",
            MockResponse::Failure("500 Internal Server Error".to_string()),
        );
    let (_, service) = service(mock);
    let views = service.list().await.unwrap();
    let new_image = enhance_image(serde_json::from_value(image("x:v2", "2017-02-01")).unwrap());

    let result = service.set_image_for_all_deployments(&views, &new_image, "x").await;
    assert!(matches!(result, Err(DashboardError::FetchError(_))));
}

#[tokio::test]
async fn test_get_application_deployments_keeps_order() {
    let (_, service) = service(MockTransport::new().with_json("/deployments", shop_deployments()));

    let foo = service.get_application_deployments("foo").await.unwrap();
    let names: Vec<_> = foo.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["web", "worker"]);

    assert!(service.get_application_deployments("nope").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_application_details_tolerates_history_failure() {
    let mock = MockTransport::new()
        .with_json("/deployments", shop_deployments())
        .with_json("/images/a", images(&[("a:v1", "2017-01-01"), ("a:v2", "2017-01-02")]))
        .with_failure("/images/b", "connection reset by peer");
    let (_, service) = service(mock);

    let details = service.get_application_details("foo").await.unwrap();

    assert_eq!(details.deployments.len(), 2);
    let keys: Vec<_> = details.image_lists.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["a", "b"]);

    let a = &details.image_lists["a"];
    assert_eq!(a.len(), 2);
    assert_eq!(a[0].image.name, "a:v2");
    assert_eq!(a[0].deployments[0].name, "worker");
    assert_eq!(a[1].image.name, "a:v1");
    assert_eq!(a[1].deployments[0].name, "web");

    // b's history failed to load, so nothing is attached to it
    assert!(details.image_lists["b"].is_empty());
}

#[tokio::test]
async fn test_history_failure_does_not_affect_other_images() {
    let (_, service) = service(
        MockTransport::new()
            .with_json("/images/a", images(&[("a:v1", "2017-01-01")]))
            .with_failure("/images/b", "timeout"),
    );
    let views: Vec<DeploymentView> = [deployment("web", None, &["a:v1"]), deployment("job", None, &["b:v1"])]
        .into_iter()
        .map(|raw| DeploymentView::from(serde_json::from_value::<Deployment>(raw).unwrap()))
        .collect();

    let histories = service.deployments_to_application_details(views).await.image_lists;

    assert_eq!(histories["a"].len(), 1);
    assert_eq!(histories["a"][0].deployments[0].name, "web");
    assert!(histories["a"][0].image.created_at().is_valid());
    assert!(histories["b"].is_empty());
}

#[tokio::test]
async fn test_deployment_with_image_data_skips_unknown_containers() {
    let mock = MockTransport::new()
        .with_json("/deployments/web", deployment("web", Some("foo"), &["sidecar:v1", "a:v2"]))
        .with_json("/images/a/v2", image("a:v2", "2017-01-02"))
        .with_json(
            "/images/a",
            images(&[("a:v1", "2017-01-01"), ("a:v3", "2017-01-03"), ("a:v2", "2017-01-02")]),
        );
    let (_, service) = service(mock);

    let data = service.get_deployment_with_image_data("web").await.unwrap();

    assert_eq!(data.deployment.name, "web");
    assert_eq!(data.deployment_app_image_name, "a:v2");
    assert_eq!(data.deployment_app_image.name, "a:v2");
    let names: Vec<_> = data.deployment_images.iter().map(|i| i.deployment_image_name.as_str()).collect();
    assert_eq!(names, vec!["a:v3", "a:v2", "a:v1"]);
    assert!(data.deployment_images.iter().all(|i| i.age.ends_with("ago")));
}

#[tokio::test]
async fn test_deployment_with_image_data_no_image_found() {
    let (_, service) =
        service(MockTransport::new().with_json("/deployments/web", deployment("web", None, &["x:v1", "nginx"])));

    let err = service.get_deployment_with_image_data("web").await.unwrap_err();
    assert!(matches!(err, DashboardError::AggregationError(_)));
}

#[tokio::test]
async fn test_deployment_with_image_data_propagates_transport_failure() {
    let (_, service) = service(
        MockTransport::new()
            .with_json("/deployments/web", deployment("web", None, &["x:v1", "a:v1"]))
            .with_failure("/images/x/v1", "connection refused"),
    );

    let err = service.get_deployment_with_image_data("web").await.unwrap_err();
    assert!(matches!(err, DashboardError::FetchError(_)));
}
