use crate::error::ScrapeError;
use crate::pipeline::FailurePolicy;
use crate::render::DEFAULT_USER_AGENT;
use crate::target::{TalentEntry, TargetDescriptor, TheaterEntry};
use config::{Config, Environment, File};
use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ScrapeConfig {
    /// Prefix that performer ids are appended to
    pub talent_base_url: Option<String>,
    /// Performers whose ticket feeds are scraped
    pub talents: Option<Vec<TalentEntry>>,
    /// Venues whose schedule pages are scraped
    pub theaters: Option<Vec<TheaterEntry>>,
    /// How pages are loaded
    #[serde(default)]
    pub renderer: RendererConfig,
    /// Where results are written
    #[serde(default)]
    pub output: OutputConfig,
    /// What to do when one target fails to load
    #[serde(default)]
    pub failure_policy: FailurePolicy,
    /// Schedule records whose title contains any of these are dropped
    #[serde(default)]
    pub exclude_titles: Vec<String>,
}

/// Configuration for the page renderer
#[derive(Debug, Deserialize, Clone)]
pub struct RendererConfig {
    /// Base URL of a headless-browser render service; plain HTTP when unset
    pub endpoint: Option<String>,
    /// Navigation timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// User agent sent by the plain HTTP renderer
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// Output file locations
#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    #[serde(default = "default_talent_output")]
    pub talent_tickets: String,
    #[serde(default = "default_theater_output")]
    pub theater_schedules: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            talent_tickets: default_talent_output(),
            theater_schedules: default_theater_output(),
        }
    }
}

// Default value functions
fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_talent_output() -> String {
    "talent_tickets.json".to_string()
}

fn default_theater_output() -> String {
    "theater_schedules.json".to_string()
}

impl ScrapeConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with EVENT_SCRAPE__ prefix
    /// 2. config.toml file in current directory
    /// 3. TALENT_BASE_URL, TALENTS and THEATERS (JSON) environment variables
    /// 4. Default values
    pub fn load() -> Result<Self, ScrapeError> {
        load_config()
    }

    /// Fill unset target settings from the plain `TALENT_BASE_URL`,
    /// `TALENTS` and `THEATERS` variables, where the lists are JSON arrays.
    pub fn merge_plain_vars<F>(mut self, lookup: F) -> Result<Self, ScrapeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.talent_base_url.is_none() {
            self.talent_base_url = lookup("TALENT_BASE_URL");
        }
        if self.talents.is_none() {
            if let Some(raw) = lookup("TALENTS") {
                self.talents = Some(parse_json_list("TALENTS", &raw)?);
            }
        }
        if self.theaters.is_none() {
            if let Some(raw) = lookup("THEATERS") {
                self.theaters = Some(parse_json_list("THEATERS", &raw)?);
            }
        }
        Ok(self)
    }

    /// Reject configurations that leave nothing to scrape or cannot build
    /// performer URLs
    pub fn validate(&self) -> Result<(), ScrapeError> {
        if self.talents.is_none() && self.theaters.is_none() {
            return Err(ScrapeError::Configuration(
                "no targets configured; set TALENTS and/or THEATERS".to_string(),
            ));
        }
        let has_talents = self.talents.as_ref().is_some_and(|t| !t.is_empty());
        if has_talents && self.talent_base_url.is_none() {
            return Err(ScrapeError::Configuration(
                "TALENTS is set but TALENT_BASE_URL is missing".to_string(),
            ));
        }
        Ok(())
    }

    /// Performer targets, or `None` when no performer list is configured
    pub fn talent_targets(&self) -> Option<Vec<TargetDescriptor>> {
        let base_url = self.talent_base_url.as_deref().unwrap_or_default();
        self.talents.as_ref().map(|talents| {
            talents
                .iter()
                .map(|talent| talent.to_target(base_url))
                .collect()
        })
    }

    /// Venue targets, or `None` when no venue list is configured
    pub fn theater_targets(&self) -> Option<Vec<TargetDescriptor>> {
        self.theaters
            .as_ref()
            .map(|theaters| theaters.iter().map(TheaterEntry::to_target).collect())
    }
}

fn parse_json_list<T: serde::de::DeserializeOwned>(
    key: &str,
    raw: &str,
) -> Result<Vec<T>, ScrapeError> {
    serde_json::from_str(raw)
        .map_err(|e| ScrapeError::Configuration(format!("{} is not a valid JSON list: {}", key, e)))
}

/// Load configuration from file and environment variables
///
/// Environment variable format: EVENT_SCRAPE__RENDERER__TIMEOUT
pub fn load_config() -> Result<ScrapeConfig, ScrapeError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        // Use double underscore for nested: EVENT_SCRAPE__RENDERER__ENDPOINT
        .add_source(
            Environment::with_prefix("EVENT_SCRAPE")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config: ScrapeConfig = settings.try_deserialize()?;
    let config = config.merge_plain_vars(|key| std::env::var(key).ok())?;
    config.validate()?;
    Ok(config)
}
