//! Image history service

use std::sync::Arc;

use gozer_api::{Image, ImageList};
use tracing::debug;

use crate::errors::DashboardError;
use crate::http::{decode, path_segment, Transport};
use crate::images::{enhance_image, split_image_ref};
use crate::models::image::EnhancedImage;
use crate::settings::ImagesSource;

/// Fetches image build records and enhances them
#[derive(Clone)]
pub struct ImagesService {
    transport: Arc<dyn Transport>,
    source: ImagesSource,
}

impl ImagesService {
    /// Service reading from the `/images` API
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_source(transport, ImagesSource::Api)
    }

    pub fn with_source(transport: Arc<dyn Transport>, source: ImagesSource) -> Self {
        Self { transport, source }
    }

    /// All known builds of the image `name`
    ///
    /// A 404 means no builds and yields an empty list.
    pub async fn get(&self, name: &str) -> Result<Vec<EnhancedImage>, DashboardError> {
        let images = match &self.source {
            ImagesSource::Api => self.fetch_list(&format!("/images/{}", path_segment(name))).await?,
            ImagesSource::Static { path } => self
                .fetch_list(path)
                .await?
                .into_iter()
                .filter(|image| split_image_ref(&image.name).0 == name)
                .collect(),
        };
        debug!("Found {} images for {}", images.len(), name);

        Ok(images.into_iter().map(enhance_image).collect())
    }

    /// The build `name:version`
    pub async fn get_by_version(&self, name: &str, version: &str) -> Result<EnhancedImage, DashboardError> {
        let image = match &self.source {
            ImagesSource::Api => {
                let path = format!("/images/{}/{}", path_segment(name), path_segment(version));
                let body = self.transport.get(&path).await?;
                decode::<Image>(body, &path)?
            }
            ImagesSource::Static { path } => {
                let full_name = format!("{}:{}", name, version);
                self.fetch_list(path)
                    .await?
                    .into_iter()
                    .find(|image| image.name == full_name)
                    .ok_or(DashboardError::NotFound(full_name))?
            }
        };

        Ok(enhance_image(image))
    }

    async fn fetch_list(&self, path: &str) -> Result<Vec<Image>, DashboardError> {
        match self.transport.get(path).await {
            Ok(serde_json::Value::Null) => Ok(Vec::new()),
            Ok(body) => Ok(decode::<ImageList>(body, path)?.images),
            Err(DashboardError::NotFound(_)) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }
}
