//! Application aggregates

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::deployment::DeploymentView;
use crate::models::image::{AnnotatedImage, EnhancedImage};

/// Grouping key for deployments by their `application` label
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ApplicationKey {
    Named(String),
    /// Deployments without an `application` label
    Unlabeled,
}

impl ApplicationKey {
    pub fn of(deployment: &DeploymentView) -> Self {
        match deployment.application() {
            Some(name) => ApplicationKey::Named(name.to_string()),
            None => ApplicationKey::Unlabeled,
        }
    }
}

/// Image history entry with the deployments currently running it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageHistoryEntry {
    #[serde(flatten)]
    pub image: EnhancedImage,

    pub deployments: Vec<DeploymentView>,
}

impl From<EnhancedImage> for ImageHistoryEntry {
    fn from(image: EnhancedImage) -> Self {
        Self {
            image,
            deployments: Vec::new(),
        }
    }
}

/// Deployments of one application plus image history per image name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationDetails {
    pub deployments: Vec<DeploymentView>,

    /// Image name to history, newest first
    pub image_lists: BTreeMap<String, Vec<ImageHistoryEntry>>,
}

/// A deployment with the image it runs and that image's history
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeploymentWithImageData {
    pub deployment: DeploymentView,
    pub deployment_app_image: EnhancedImage,
    pub deployment_app_image_name: String,
    pub deployment_images: Vec<AnnotatedImage>,
}
