use std::sync::Arc;

use crate::extract::{parse_selector, schemas, ExtractionSchema};
use crate::pipeline::{FailurePolicy, Pipeline};
use crate::render::Renderer;
use crate::tagger::SourceTagger;
use crate::ScrapeError;

/// Builder for configuring a scrape pipeline
#[derive(Default)]
pub struct PipelineBuilder {
    renderer: Option<Arc<dyn Renderer>>,
    schema: Option<ExtractionSchema>,
    tag_field: Option<String>,
    hide: Option<String>,
    failure_policy: FailurePolicy,
    exclude_titles: Vec<String>,
}

impl PipelineBuilder {
    /// Preset for performer ticket feeds: `ticket_feed` schema tagged with
    /// `TalentName`
    pub fn talent_tickets() -> Result<Self, ScrapeError> {
        Ok(Self::default()
            .schema(schemas::ticket_feed()?)
            .tag_field(schemas::TALENT_TAG))
    }

    /// Preset for theater schedules: `theater_schedule` schema tagged with
    /// `Venue`, with the cookie banner hidden before extraction
    pub fn theater_schedules() -> Result<Self, ScrapeError> {
        Ok(Self::default()
            .schema(schemas::theater_schedule()?)
            .tag_field(schemas::VENUE_TAG)
            .hide(schemas::CONSENT_BANNER))
    }

    /// Set the backend used to load pages
    ///
    /// # Example
    /// ```
    /// use event_scrape::{Pipeline, RequestRenderer};
    /// use std::sync::Arc;
    ///
    /// let builder = Pipeline::builder()
    ///     .renderer(Arc::new(RequestRenderer::new(None)));
    /// ```
    pub fn renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn schema(mut self, schema: ExtractionSchema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Name of the field that carries the target's display name
    pub fn tag_field(mut self, field: impl Into<String>) -> Self {
        self.tag_field = Some(field.into());
        self
    }

    /// Remove elements matching `selector` before extraction.
    /// Missing elements are ignored.
    pub fn hide(mut self, selector: impl Into<String>) -> Self {
        self.hide = Some(selector.into());
        self
    }

    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Drop records whose title contains any of `keywords`
    pub fn exclude_titles<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_titles.extend(keywords.into_iter().map(Into::into));
        self
    }

    /// Assemble the pipeline
    ///
    /// # Errors
    /// Returns `ScrapeError` if:
    /// - No renderer, schema or tag field was set
    /// - The tag field collides with a schema field
    /// - The hide selector does not parse
    pub fn build(self) -> Result<Pipeline, ScrapeError> {
        let renderer = self
            .renderer
            .ok_or_else(|| ScrapeError::BuilderError("No renderer specified".to_string()))?;
        let schema = self
            .schema
            .ok_or_else(|| ScrapeError::BuilderError("No extraction schema specified".to_string()))?;
        let tag_field = self
            .tag_field
            .ok_or_else(|| ScrapeError::BuilderError("No tag field specified".to_string()))?;

        let tagger = SourceTagger::new(tag_field, &schema)?;
        let hide = self.hide.as_deref().map(parse_selector).transpose()?;

        Ok(Pipeline {
            renderer,
            schema,
            tagger,
            hide,
            failure_policy: self.failure_policy,
            exclude_titles: self.exclude_titles,
        })
    }
}

impl Pipeline {
    /// Creates a new builder for a scrape pipeline
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }
}
