//! Gozer Dashboard Library
//!
//! Typed client and view layer for the Gozer deployment console.

pub mod errors;
pub mod http;
pub mod images;
pub mod logs;
pub mod models;
pub mod services;
pub mod settings;
pub mod utils;

pub use errors::DashboardError;
pub use services::{DeploymentService, ImagesService};
