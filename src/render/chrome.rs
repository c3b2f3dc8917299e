use super::{with_deadline, Document, Renderer, RenderingSession};
use crate::error::ScrapeError;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Serialize)]
struct ContentRequest<'a> {
    url: &'a str,
}

#[derive(Deserialize)]
struct ContentResponse {
    content: String,
}

/// Loads pages through a headless-browser render service.
///
/// The service takes `POST {endpoint}/api/fetch-content` with `{"url": ..}`
/// and answers `{"content": ..}` with the HTML after scripts have run.
pub struct ChromeRenderer {
    endpoint: String,
    timeout: Duration,
}

impl ChromeRenderer {
    pub fn new(service_url: &str, timeout: Option<Duration>) -> Self {
        let endpoint = format!("{}/api/fetch-content", service_url.trim_end_matches('/'));
        Self {
            endpoint,
            timeout: timeout.unwrap_or(Duration::from_secs(30)),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Renderer for ChromeRenderer {
    fn backend_name(&self) -> &str {
        "chrome"
    }

    fn session(&self) -> Result<Box<dyn RenderingSession>, ScrapeError> {
        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| ScrapeError::Renderer(e.to_string()))?;

        Ok(Box::new(ChromeSession {
            endpoint: self.endpoint.clone(),
            client: Some(client),
            timeout: self.timeout,
        }))
    }
}

struct ChromeSession {
    endpoint: String,
    client: Option<Client>,
    timeout: Duration,
}

#[async_trait]
impl RenderingSession for ChromeSession {
    async fn open(&mut self, url: &str) -> Result<Document, ScrapeError> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| ScrapeError::navigation(url, "session already closed"))?;
        let endpoint = self.endpoint.as_str();

        let content = with_deadline(url, self.timeout, async {
            let response = client
                .post(endpoint)
                .json(&ContentRequest { url })
                .send()
                .await
                .map_err(|e| ScrapeError::navigation(url, e))?;

            if !response.status().is_success() {
                return Err(ScrapeError::navigation(
                    url,
                    format!("render service returned status {}", response.status()),
                ));
            }

            let content: ContentResponse = response
                .json()
                .await
                .map_err(|e| ScrapeError::navigation(url, e))?;
            Ok(content.content)
        })
        .await?;

        debug!("Rendered {} bytes for {}", content.len(), url);
        Ok(Document::parse(url, &content))
    }

    fn close(&mut self) {
        if self.client.take().is_some() {
            debug!("Closed render service session");
        }
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trailing_slash() {
        let renderer = ChromeRenderer::new("http://localhost:3000/", None);
        assert_eq!(renderer.endpoint(), "http://localhost:3000/api/fetch-content");
    }
}
