use thiserror::Error;

/// Errors that can occur while configuring or running a scrape
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// Target list missing, unparsable or inconsistent
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Configuration sources could not be read or deserialized
    #[error("Configuration error: {0}")]
    ConfigSource(#[from] config::ConfigError),

    /// A target's page failed to load
    #[error("Failed to load {url}: {reason}")]
    Navigation { url: String, reason: String },

    /// A rendering session could not be started
    #[error("Failed to start rendering session: {0}")]
    Renderer(String),

    /// A selector in an extraction schema could not be parsed
    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    /// An extraction schema or tagger was assembled inconsistently
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// Pipeline builder was missing a required part
    #[error("Builder error: {0}")]
    BuilderError(String),

    /// Writing the output artifact failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing the output artifact failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ScrapeError {
    pub(crate) fn navigation(url: &str, reason: impl ToString) -> Self {
        ScrapeError::Navigation {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}
