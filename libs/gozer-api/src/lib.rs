//! Gozer API models
//!
//! Raw JSON shapes served by the Gozer web API. Deployments follow the
//! Kubernetes `extensions/v1beta1` layout; images follow the Gozer metadata
//! store layout (hyphenated keys).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Label key used to group deployments into applications
pub const APPLICATION_LABEL: &str = "application";

/// `GET /deployments` response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeploymentList {
    #[serde(default)]
    pub deployments: Vec<Deployment>,
}

/// A deployment as returned by `GET /deployments/{name}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deployment {
    pub metadata: ObjectMeta,

    #[serde(default)]
    pub spec: DeploymentSpec,

    /// Free-form status object
    #[serde(default)]
    pub status: serde_json::Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectMeta {
    pub name: String,

    #[serde(default)]
    pub uid: String,

    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeploymentSpec {
    #[serde(default)]
    pub template: PodTemplateSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PodTemplateSpec {
    #[serde(default)]
    pub spec: PodSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodSpec {
    #[serde(default)]
    pub containers: Vec<Container>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub termination_grace_period_seconds: Option<i64>,
}

/// Container spec; `image` is `<imageName>:<version>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    pub name: String,
    pub image: String,

    #[serde(default)]
    pub ports: Vec<ContainerPort>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerPort {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub container_port: i32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_port: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
}

/// Body of `PUT /deployments/{name}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateDeploymentRequest {
    pub container_name: String,
    pub image: String,
}

/// `GET /images/{name}` response and the static `images.json` file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageList {
    #[serde(default)]
    pub images: Vec<Image>,
}

/// A stored image build; `name` is `<imageName>:<version>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub name: String,

    #[serde(default)]
    pub metadata: ImageMetadata,
}

/// Metadata recorded when an image is built
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageMetadata {
    #[serde(rename = "git-commit", default)]
    pub git_commit: String,

    #[serde(rename = "git-tag", default)]
    pub git_tag: Vec<String>,

    #[serde(rename = "git-annotation", default)]
    pub git_annotation: Vec<String>,

    #[serde(rename = "git-origin", default)]
    pub git_origin: String,

    #[serde(rename = "created-at", default)]
    pub created_at: String,
}
