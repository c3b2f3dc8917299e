mod chrome;
mod document;
mod request;

pub use chrome::ChromeRenderer;
pub use document::Document;
pub use request::{RequestRenderer, DEFAULT_USER_AGENT};

use crate::config::RendererConfig;
use crate::error::ScrapeError;
use async_trait::async_trait;
use std::time::Duration;

/// Something that can hand out isolated page-loading sessions
pub trait Renderer: Send + Sync {
    /// Get the backend name (e.g., "request", "chrome")
    fn backend_name(&self) -> &str;

    /// Start a fresh session. Sessions are never shared between targets.
    fn session(&self) -> Result<Box<dyn RenderingSession>, ScrapeError>;
}

/// A single page-loading session.
///
/// `close` must be safe to call more than once. Implementations also
/// release their resources when dropped, so a session that is never
/// closed explicitly does not leak.
#[async_trait]
pub trait RenderingSession: Send {
    /// Navigate to `url` and return the loaded document
    async fn open(&mut self, url: &str) -> Result<Document, ScrapeError>;

    /// Release everything tied to this session
    fn close(&mut self);
}

/// Pick a backend from configuration: the render service when an endpoint
/// is configured, plain HTTP otherwise.
pub fn from_config(config: &RendererConfig) -> Box<dyn Renderer> {
    let timeout = Duration::from_secs(config.timeout);
    match &config.endpoint {
        Some(endpoint) => Box::new(ChromeRenderer::new(endpoint, Some(timeout))),
        None => Box::new(
            RequestRenderer::new(Some(timeout)).with_user_agent(config.user_agent.clone()),
        ),
    }
}

/// Bound a navigation future by `timeout`, mapping expiry to a navigation error
pub(crate) async fn with_deadline<T, F>(url: &str, timeout: Duration, fut: F) -> Result<T, ScrapeError>
where
    F: std::future::Future<Output = Result<T, ScrapeError>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(ScrapeError::navigation(
            url,
            format!("timed out after {}s", timeout.as_secs_f32()),
        )),
    }
}
