//! Services consumed by the presentation layer

pub mod deployments;
pub mod images;

pub use deployments::DeploymentService;
pub use images::ImagesService;
