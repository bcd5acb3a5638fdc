//! Deployment view models

use std::collections::BTreeMap;

use gozer_api::{ContainerPort, Deployment, APPLICATION_LABEL};
use serde::Serialize;

use crate::images::split_image_ref;

/// Read-only projection of a raw deployment, shaped for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeploymentView {
    /// Deployment name
    pub name: String,

    /// Kubernetes UID
    pub uid: String,

    /// Metadata labels
    pub labels: BTreeMap<String, String>,

    /// Containers of the pod template, in spec order
    pub containers: Vec<ContainerView>,

    /// Pod termination grace period in seconds
    pub max_unresponsive_time_before_termination: Option<i64>,

    /// Deployment status without `conditions`
    pub status: serde_json::Map<String, serde_json::Value>,

    /// The raw record this view was built from
    #[serde(skip)]
    pub original: Deployment,
}

/// Container of a deployment view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContainerView {
    pub name: String,

    /// Full image reference, `<imageName>:<version>`
    pub image: String,

    /// Image reference up to the first `:`
    pub image_name: String,

    pub ports: Vec<ContainerPort>,
}

impl From<Deployment> for DeploymentView {
    fn from(deployment: Deployment) -> Self {
        let pod = &deployment.spec.template.spec;
        let containers = pod
            .containers
            .iter()
            .map(|container| ContainerView {
                name: container.name.clone(),
                image: container.image.clone(),
                image_name: split_image_ref(&container.image).0.to_string(),
                ports: container.ports.clone(),
            })
            .collect();

        let mut status = match &deployment.status {
            serde_json::Value::Object(map) => map.clone(),
            _ => serde_json::Map::new(),
        };
        status.remove("conditions");

        Self {
            name: deployment.metadata.name.clone(),
            uid: deployment.metadata.uid.clone(),
            labels: deployment.metadata.labels.clone(),
            containers,
            max_unresponsive_time_before_termination: pod.termination_grace_period_seconds,
            status,
            original: deployment,
        }
    }
}

impl DeploymentView {
    /// Value of the `application` label, if any
    pub fn application(&self) -> Option<&str> {
        self.labels.get(APPLICATION_LABEL).map(String::as_str)
    }

    /// First container running an image with the given image name
    pub fn container_for_image(&self, image_name: &str) -> Option<&ContainerView> {
        self.containers.iter().find(|c| c.image_name == image_name)
    }
}
