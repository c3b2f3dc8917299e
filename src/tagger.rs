use crate::error::ScrapeError;
use crate::extract::ExtractionSchema;
use crate::model::{RawRecord, TaggedRecord};
use crate::target::TargetDescriptor;

/// Labels records with the display name of the target they came from
#[derive(Debug, Clone)]
pub struct SourceTagger {
    field: String,
}

impl SourceTagger {
    /// Fails if `field` is already one of the schema's own fields
    pub fn new(field: impl Into<String>, schema: &ExtractionSchema) -> Result<Self, ScrapeError> {
        let field = field.into();
        if schema.has_field(&field) {
            return Err(ScrapeError::InvalidSchema(format!(
                "tag field '{}' collides with a field of schema '{}'",
                field,
                schema.name()
            )));
        }
        Ok(Self { field })
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn tag(&self, records: Vec<RawRecord>, target: &TargetDescriptor) -> Vec<TaggedRecord> {
        records
            .into_iter()
            .map(|record| TaggedRecord::new(&self.field, target.display_name(), record))
            .collect()
    }
}
