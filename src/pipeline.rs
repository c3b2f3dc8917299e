use crate::error::ScrapeError;
use crate::extract::{self, ExtractionSchema};
use crate::model::{RawRecord, ResultCollection, TaggedRecord};
use crate::render::{Document, Renderer};
use crate::tagger::SourceTagger;
use crate::target::TargetDescriptor;
use log::{debug, error, info, warn};
use scraper::Selector;
use serde::Deserialize;
use std::sync::Arc;

/// Field consulted by the title exclusion list
pub const TITLE_FIELD: &str = "title";

/// What a run does when one target cannot be loaded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Log the failure and continue with the next target
    #[default]
    Skip,
    /// Stop the run and return the error
    Abort,
}

/// Result of scraping a single target
#[derive(Debug)]
pub enum TargetOutcome {
    Success(Vec<TaggedRecord>),
    Failure(ScrapeError),
}

/// Scrapes a list of targets one after another into one collection.
///
/// Each target gets its own rendering session, which is closed before the
/// next target starts.
pub struct Pipeline {
    pub(crate) renderer: Arc<dyn Renderer>,
    pub(crate) schema: ExtractionSchema,
    pub(crate) tagger: SourceTagger,
    pub(crate) hide: Option<Selector>,
    pub(crate) failure_policy: FailurePolicy,
    pub(crate) exclude_titles: Vec<String>,
}

impl Pipeline {
    pub fn schema(&self) -> &ExtractionSchema {
        &self.schema
    }

    pub fn tag_field(&self) -> &str {
        self.tagger.field()
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    /// Scrape every target in order.
    ///
    /// Records keep target order, then document order. With
    /// `FailurePolicy::Skip` a failed target contributes nothing and the
    /// run goes on; with `FailurePolicy::Abort` the first failure is
    /// returned.
    pub async fn run(&self, targets: &[TargetDescriptor]) -> Result<ResultCollection, ScrapeError> {
        let mut collection = ResultCollection::default();

        for target in targets {
            match self.scrape_target(target).await {
                TargetOutcome::Success(records) => {
                    info!(
                        "Collected {} record(s) for {}",
                        records.len(),
                        target.display_name()
                    );
                    collection.extend(records);
                }
                TargetOutcome::Failure(e) => match self.failure_policy {
                    FailurePolicy::Skip => {
                        warn!("Skipping {}: {}", target.display_name(), e);
                    }
                    FailurePolicy::Abort => {
                        error!("Aborting run at {}: {}", target.display_name(), e);
                        return Err(e);
                    }
                },
            }
        }

        Ok(collection)
    }

    /// Load one target in a fresh session and extract its records
    pub async fn scrape_target(&self, target: &TargetDescriptor) -> TargetOutcome {
        let url = target.url();
        debug!(
            "Scraping {} ({}) with {} renderer",
            target.display_name(),
            url,
            self.renderer.backend_name()
        );

        let mut session = match self.renderer.session() {
            Ok(session) => session,
            Err(e) => return TargetOutcome::Failure(e),
        };
        let loaded = session.open(&url).await;
        session.close();

        match loaded {
            Ok(document) => TargetOutcome::Success(self.process(document, target)),
            Err(e) => TargetOutcome::Failure(e),
        }
    }

    fn process(&self, mut document: Document, target: &TargetDescriptor) -> Vec<TaggedRecord> {
        if let Some(selector) = &self.hide {
            document.hide(selector);
        }

        let records: Vec<RawRecord> = extract::extract(&document, &self.schema)
            .into_iter()
            .filter(|record| !self.is_excluded(record))
            .collect();

        self.tagger.tag(records, target)
    }

    fn is_excluded(&self, record: &RawRecord) -> bool {
        let Some(title) = record.get(TITLE_FIELD) else {
            return false;
        };
        match self.exclude_titles.iter().find(|k| title.contains(k.as_str())) {
            Some(keyword) => {
                debug!("Dropping '{}' (matches '{}')", title, keyword);
                true
            }
            None => false,
        }
    }
}
