use crate::error::ScrapeError;
use crate::model::ResultCollection;
use log::info;
use std::path::{Path, PathBuf};

/// Render a collection as a pretty-printed JSON array
pub fn to_pretty_json(results: &ResultCollection) -> Result<String, ScrapeError> {
    Ok(serde_json::to_string_pretty(results)?)
}

/// Writes a collection to a JSON file, replacing any previous contents
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn write(&self, results: &ResultCollection) -> Result<(), ScrapeError> {
        let json = to_pretty_json(results)?;
        tokio::fs::write(&self.path, json).await?;
        info!("Saved {} record(s) to {}", results.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_collection_is_empty_array() {
        assert_eq!(to_pretty_json(&ResultCollection::default()).unwrap(), "[]");
    }

    #[tokio::test]
    async fn test_write_creates_file() {
        let path = std::env::temp_dir().join(format!("event_scrape_sink_{}.json", std::process::id()));
        let sink = JsonFileSink::new(&path);
        sink.write(&ResultCollection::default()).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "[]");
        std::fs::remove_file(&path).unwrap();
    }
}
