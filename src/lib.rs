pub mod builder;
pub mod config;
pub mod error;
pub mod extract;
pub mod model;
pub mod pipeline;
pub mod render;
pub mod sink;
pub mod tagger;
pub mod target;

pub use builder::PipelineBuilder;
pub use crate::config::ScrapeConfig;
pub use error::ScrapeError;
pub use extract::{extract, ExtractionMode, ExtractionRule, ExtractionSchema};
pub use model::{RawRecord, ResultCollection, TaggedRecord};
pub use pipeline::{FailurePolicy, Pipeline, TargetOutcome};
pub use render::{ChromeRenderer, Document, Renderer, RenderingSession, RequestRenderer};
pub use sink::JsonFileSink;
pub use tagger::SourceTagger;
pub use target::TargetDescriptor;

use log::info;
use std::path::PathBuf;
use std::sync::Arc;

/// One output file written by a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenOutput {
    pub path: PathBuf,
    pub records: usize,
}

/// Run every configured pipeline with the renderer named in `config`
pub async fn run(config: &ScrapeConfig) -> Result<Vec<WrittenOutput>, ScrapeError> {
    let renderer: Arc<dyn Renderer> = Arc::from(render::from_config(&config.renderer));
    run_with_renderer(config, renderer).await
}

/// Run every configured pipeline and write its output file.
///
/// Pipelines whose target list is not configured are skipped; a configured
/// but empty list still writes an empty array.
pub async fn run_with_renderer(
    config: &ScrapeConfig,
    renderer: Arc<dyn Renderer>,
) -> Result<Vec<WrittenOutput>, ScrapeError> {
    config.validate()?;
    let mut written = Vec::new();

    if let Some(targets) = config.talent_targets() {
        let pipeline = PipelineBuilder::talent_tickets()?
            .renderer(renderer.clone())
            .failure_policy(config.failure_policy)
            .build()?;
        let results = pipeline.run(&targets).await?;
        written.push(save(&config.output.talent_tickets, &results).await?);
        info!("Talent tickets data saved.");
    }

    if let Some(targets) = config.theater_targets() {
        let pipeline = PipelineBuilder::theater_schedules()?
            .renderer(renderer)
            .failure_policy(config.failure_policy)
            .exclude_titles(config.exclude_titles.iter().cloned())
            .build()?;
        let results = pipeline.run(&targets).await?;
        written.push(save(&config.output.theater_schedules, &results).await?);
        info!("Theater schedule data saved.");
    }

    Ok(written)
}

async fn save(path: &str, results: &ResultCollection) -> Result<WrittenOutput, ScrapeError> {
    let sink = JsonFileSink::new(path);
    sink.write(results).await?;
    Ok(WrittenOutput {
        path: sink.path().to_path_buf(),
        records: results.len(),
    })
}
