//! Uploaded study resources and their background processing

mod models;
mod processor;

pub use models::{Resource, ResourceKind, ResourceRequest, ResourceStatus};
pub use processor::{ProcessingHandle, ResourceProcessor};
