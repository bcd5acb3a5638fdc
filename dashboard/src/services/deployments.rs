//! Deployment service
//!
//! Reads deployments, groups them into applications and links each
//! deployment to the image builds its containers run.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::Utc;
use futures::future::{join_all, try_join_all};
use gozer_api::{Deployment, DeploymentList, UpdateDeploymentRequest};
use tracing::{debug, info, warn};

use crate::errors::DashboardError;
use crate::http::{decode, path_segment, Transport};
use crate::images::{display_name, human_age, sort_images_by_created_at_desc, split_image_ref};
use crate::models::application::{ApplicationDetails, ApplicationKey, DeploymentWithImageData, ImageHistoryEntry};
use crate::models::deployment::DeploymentView;
use crate::models::image::{AnnotatedImage, EnhancedImage};
use crate::services::images::ImagesService;

/// Deployment operations of the dashboard
#[derive(Clone)]
pub struct DeploymentService {
    transport: Arc<dyn Transport>,
    images: ImagesService,
}

impl DeploymentService {
    pub fn new(transport: Arc<dyn Transport>, images: ImagesService) -> Self {
        Self { transport, images }
    }

    /// All deployments
    ///
    /// The API answers 404 or an empty body when there are none; both yield
    /// an empty list.
    pub async fn list(&self) -> Result<Vec<DeploymentView>, DashboardError> {
        let path = "/deployments";
        let body = match self.transport.get(path).await {
            Ok(serde_json::Value::Null) | Err(DashboardError::NotFound(_)) => return Ok(Vec::new()),
            Ok(body) => body,
            Err(e) => return Err(e),
        };
        let list: DeploymentList = decode(body, path)?;

        Ok(list.deployments.into_iter().map(DeploymentView::from).collect())
    }

    /// A single deployment by name
    pub async fn get(&self, name: &str) -> Result<DeploymentView, DashboardError> {
        let path = format!("/deployments/{}", path_segment(name));
        let body = self.transport.get(&path).await?;
        let deployment: Deployment = decode(body, &path)?;

        Ok(DeploymentView::from(deployment))
    }

    /// Point container `container_name` of a deployment at `image`
    ///
    /// Returns the acknowledgement as sent by the server.
    pub async fn set(
        &self,
        deployment_name: &str,
        container_name: &str,
        image: &str,
    ) -> Result<serde_json::Value, DashboardError> {
        let path = format!("/deployments/{}", path_segment(deployment_name));
        let request = UpdateDeploymentRequest {
            container_name: container_name.to_string(),
            image: image.to_string(),
        };
        info!("Setting {}/{} to {}", deployment_name, container_name, image);

        self.transport.put(&path, serde_json::to_value(request)?).await
    }

    /// Roll `image` out to every deployment running a build of `image_name`
    ///
    /// Deployments without such a container are skipped. Updates run
    /// concurrently and the first failure is returned.
    pub async fn set_image_for_all_deployments(
        &self,
        deployments: &[DeploymentView],
        image: &EnhancedImage,
        image_name: &str,
    ) -> Result<Vec<serde_json::Value>, DashboardError> {
        let updates = deployments.iter().filter_map(|deployment| {
            deployment
                .container_for_image(image_name)
                .map(|container| self.set(&deployment.name, &container.name, &image.name))
        });

        try_join_all(updates).await
    }

    /// Deployments labelled `application: <application_name>`, in list order
    pub async fn get_application_deployments(
        &self,
        application_name: &str,
    ) -> Result<Vec<DeploymentView>, DashboardError> {
        let mut groups = group_by_application(self.list().await?);

        Ok(groups
            .remove(&ApplicationKey::Named(application_name.to_string()))
            .unwrap_or_default())
    }

    /// Fetch image history for every image the deployments run and link
    /// each deployment to the entry it runs
    ///
    /// A history that fails to load stays empty and is left out of the
    /// association.
    pub async fn deployments_to_application_details(
        &self,
        deployments: Vec<DeploymentView>,
    ) -> ApplicationDetails {
        let image_names: BTreeSet<&str> = deployments
            .iter()
            .flat_map(|d| d.containers.iter().map(|c| c.image_name.as_str()))
            .collect();

        let fetches = image_names.into_iter().map(|name| async move {
            let history = match self.images.get(name).await {
                Ok(images) => Some(sort_images_by_created_at_desc(images)),
                Err(e) => {
                    warn!("Unable to fetch image history for {}: {}", name, e);
                    None
                }
            };
            (name.to_string(), history)
        });

        let mut histories: BTreeMap<String, Vec<EnhancedImage>> = BTreeMap::new();
        let mut failed: BTreeSet<String> = BTreeSet::new();
        for (name, history) in join_all(fetches).await {
            match history {
                Some(images) => {
                    histories.insert(name, images);
                }
                None => {
                    histories.insert(name.clone(), Vec::new());
                    failed.insert(name);
                }
            }
        }

        let image_lists = cross_associate(&deployments, histories, &failed);
        ApplicationDetails {
            deployments,
            image_lists,
        }
    }

    /// Deployments of an application with their image history
    pub async fn get_application_details(
        &self,
        application_name: &str,
    ) -> Result<ApplicationDetails, DashboardError> {
        let deployments = self.get_application_deployments(application_name).await?;
        debug!("Application {} has {} deployments", application_name, deployments.len());

        Ok(self.deployments_to_application_details(deployments).await)
    }

    /// A deployment, the image its first resolvable container runs, and the
    /// history of that image
    ///
    /// Containers are tried in order; one whose image is unknown (404) is
    /// skipped. Fails with [`DashboardError::AggregationError`] when no
    /// container resolves.
    pub async fn get_deployment_with_image_data(
        &self,
        name: &str,
    ) -> Result<DeploymentWithImageData, DashboardError> {
        let deployment = self.get(name).await?;

        let mut resolved = None;
        for container in &deployment.containers {
            let (image_name, Some(version)) = split_image_ref(&container.image) else {
                debug!("Container {} image {} has no version", container.name, container.image);
                continue;
            };
            match self.images.get_by_version(image_name, version).await {
                Ok(image) => {
                    resolved = Some((image_name.to_string(), image));
                    break;
                }
                Err(DashboardError::NotFound(_)) => {
                    debug!("No image data for {}", container.image);
                }
                Err(e) => return Err(e),
            }
        }

        let Some((image_name, app_image)) = resolved else {
            return Err(DashboardError::AggregationError(format!(
                "No image data found for deployment {}",
                name
            )));
        };

        let now = Utc::now();
        let deployment_images = sort_images_by_created_at_desc(self.images.get(&image_name).await?)
            .into_iter()
            .map(|image| AnnotatedImage {
                age: human_age(image.created_at(), now),
                deployment_image_name: display_name(&image.name),
                image,
            })
            .collect();

        Ok(DeploymentWithImageData {
            deployment,
            deployment_app_image_name: app_image.name.clone(),
            deployment_app_image: app_image,
            deployment_images,
        })
    }
}

/// Group deployments by `application` label, keeping list order per group
pub fn group_by_application(deployments: Vec<DeploymentView>) -> BTreeMap<ApplicationKey, Vec<DeploymentView>> {
    let mut groups: BTreeMap<ApplicationKey, Vec<DeploymentView>> = BTreeMap::new();
    for deployment in deployments {
        groups.entry(ApplicationKey::of(&deployment)).or_default().push(deployment);
    }
    groups
}

/// Attach each deployment to the history entry of every image it runs
///
/// Images missing from their history get a placeholder entry appended.
/// Images named in `failed` keep an empty list.
pub fn cross_associate(
    deployments: &[DeploymentView],
    histories: BTreeMap<String, Vec<EnhancedImage>>,
    failed: &BTreeSet<String>,
) -> BTreeMap<String, Vec<ImageHistoryEntry>> {
    let mut image_lists: BTreeMap<String, Vec<ImageHistoryEntry>> = histories
        .into_iter()
        .map(|(name, images)| (name, images.into_iter().map(ImageHistoryEntry::from).collect()))
        .collect();

    for deployment in deployments {
        for container in &deployment.containers {
            let entries = image_lists.entry(container.image_name.clone()).or_default();
            if failed.contains(&container.image_name) {
                continue;
            }
            match entries.iter_mut().find(|entry| entry.image.name == container.image) {
                Some(entry) => {
                    if !entry.deployments.iter().any(|d| d.name == deployment.name) {
                        entry.deployments.push(deployment.clone());
                    }
                }
                None => entries.push(ImageHistoryEntry {
                    image: EnhancedImage::placeholder(&container.image),
                    deployments: vec![deployment.clone()],
                }),
            }
        }
    }

    image_lists
}
