use super::{with_deadline, Document, Renderer, RenderingSession};
use crate::error::ScrapeError;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/130.0.6723.92 Safari/537.36";

/// Loads pages with a plain HTTP GET, without running scripts
pub struct RequestRenderer {
    timeout: Duration,
    user_agent: String,
}

impl RequestRenderer {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            timeout: timeout.unwrap_or(Duration::from_secs(30)),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl Renderer for RequestRenderer {
    fn backend_name(&self) -> &str {
        "request"
    }

    fn session(&self) -> Result<Box<dyn RenderingSession>, ScrapeError> {
        let client = Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str())
            .build()
            .map_err(|e| ScrapeError::Renderer(e.to_string()))?;

        Ok(Box::new(RequestSession {
            client: Some(client),
            timeout: self.timeout,
        }))
    }
}

struct RequestSession {
    client: Option<Client>,
    timeout: Duration,
}

#[async_trait]
impl RenderingSession for RequestSession {
    async fn open(&mut self, url: &str) -> Result<Document, ScrapeError> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| ScrapeError::navigation(url, "session already closed"))?;

        let (final_url, body) = with_deadline(url, self.timeout, async {
            let response = client
                .get(url)
                .send()
                .await
                .map_err(|e| ScrapeError::navigation(url, e))?;

            if !response.status().is_success() {
                return Err(ScrapeError::navigation(
                    url,
                    format!("status {}", response.status()),
                ));
            }

            let final_url = response.url().to_string();
            let body = response
                .text()
                .await
                .map_err(|e| ScrapeError::navigation(url, e))?;
            Ok((final_url, body))
        })
        .await?;

        debug!("Fetched {} bytes from {}", body.len(), final_url);
        Ok(Document::parse(final_url, &body))
    }

    fn close(&mut self) {
        if self.client.take().is_some() {
            debug!("Closed request session");
        }
    }
}

impl Drop for RequestSession {
    fn drop(&mut self) {
        self.close();
    }
}
