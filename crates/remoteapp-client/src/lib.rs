//! Backend access for remoteapp
//!
//! This crate provides an abstraction over the remote application manager
//! with a consistent API for listing, starting and stopping applications,
//! plus the HTTP implementation used in production.

mod error;
mod http;
mod types;
pub mod urlutils;

pub use error::*;
pub use http::HttpBackend;
pub use types::*;

use async_trait::async_trait;

/// Trait for application manager backends
#[async_trait]
pub trait Backend: Send + Sync {
    /// List the applications available to the current user, each with its
    /// running container if one exists
    async fn applications(&self) -> Result<Vec<ApplicationData>>;

    /// Start a container for an application
    async fn start(&self, request: &StartRequest) -> Result<Container>;

    /// Stop the container identified by its URL id
    async fn stop(&self, url_id: &str) -> Result<()>;

    /// Get backend information
    fn info(&self) -> BackendInfo;
}

/// Create the default backend from global config
pub fn create_backend(config: &remoteapp_config::GlobalConfig) -> Result<Box<dyn Backend>> {
    let backend = HttpBackend::new(
        &config.server.base_url,
        std::time::Duration::from_secs(config.server.request_timeout_secs),
        config.server.api_token.as_deref(),
    )?;
    Ok(Box::new(backend))
}
