//! View models

pub mod application;
pub mod deployment;
pub mod image;

pub use application::{ApplicationDetails, ApplicationKey, DeploymentWithImageData, ImageHistoryEntry};
pub use deployment::{ContainerView, DeploymentView};
pub use image::{AnnotatedImage, CreatedAt, EnhancedImage, EnhancedImageMetadata};
