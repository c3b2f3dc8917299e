use super::text::inner_text_lines;
use crate::error::ScrapeError;
use reqwest::Url;
use scraper::{ElementRef, Selector};
use std::collections::HashSet;

/// Value used when a field cannot be extracted
pub const DEFAULT_VALUE: &str = "-";

/// Delimiter used for joinable multi-line fields
pub const DEFAULT_JOIN: &str = "|";

pub(crate) fn parse_selector(selector: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(selector).map_err(|e| ScrapeError::InvalidSelector {
        selector: selector.to_string(),
        reason: format!("{:?}", e),
    })
}

/// Where a rule reads from, relative to the record fragment
#[derive(Debug, Clone)]
pub enum FieldSource {
    /// The fragment element itself
    Fragment,
    /// First descendant of the fragment matching the selector
    Selector(Selector),
}

/// How a located element is turned into a string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionMode {
    /// Rendered text content
    Text,
    /// Raw attribute value
    Attribute(String),
    /// Attribute value resolved against the document URL
    Link(String),
    /// One segment of the rendered text split on a delimiter
    Split { delimiter: String, index: usize },
    /// Attribute value with a fixed prefix removed
    Identifier { attribute: String, prefix: String },
}

/// Declarative description of one output field
#[derive(Debug, Clone)]
pub struct ExtractionRule {
    name: String,
    source: FieldSource,
    mode: ExtractionMode,
    default: String,
    join: Option<String>,
    strip: Vec<String>,
}

impl ExtractionRule {
    fn new(name: impl Into<String>, source: FieldSource, mode: ExtractionMode) -> Self {
        Self {
            name: name.into(),
            source,
            mode,
            default: DEFAULT_VALUE.to_string(),
            join: None,
            strip: Vec::new(),
        }
    }

    pub fn text(name: impl Into<String>, selector: &str) -> Result<Self, ScrapeError> {
        Ok(Self::new(
            name,
            FieldSource::Selector(parse_selector(selector)?),
            ExtractionMode::Text,
        ))
    }

    pub fn attribute(
        name: impl Into<String>,
        selector: &str,
        attribute: impl Into<String>,
    ) -> Result<Self, ScrapeError> {
        Ok(Self::new(
            name,
            FieldSource::Selector(parse_selector(selector)?),
            ExtractionMode::Attribute(attribute.into()),
        ))
    }

    pub fn link(
        name: impl Into<String>,
        selector: &str,
        attribute: impl Into<String>,
    ) -> Result<Self, ScrapeError> {
        Ok(Self::new(
            name,
            FieldSource::Selector(parse_selector(selector)?),
            ExtractionMode::Link(attribute.into()),
        ))
    }

    pub fn split(
        name: impl Into<String>,
        selector: &str,
        delimiter: impl Into<String>,
        index: usize,
    ) -> Result<Self, ScrapeError> {
        Ok(Self::new(
            name,
            FieldSource::Selector(parse_selector(selector)?),
            ExtractionMode::Split {
                delimiter: delimiter.into(),
                index,
            },
        ))
    }

    /// Read an attribute of the fragment itself, dropping a fixed prefix.
    /// `id="schedule20240501"` with prefix `schedule` yields `20240501`.
    pub fn identifier(
        name: impl Into<String>,
        attribute: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        Self::new(
            name,
            FieldSource::Fragment,
            ExtractionMode::Identifier {
                attribute: attribute.into(),
                prefix: prefix.into(),
            },
        )
    }

    /// Collapse line breaks to `delimiter` instead of keeping them
    pub fn joined(mut self, delimiter: impl Into<String>) -> Self {
        self.join = Some(delimiter.into());
        self
    }

    /// Remove a literal label (e.g. `開演`) from the extracted value
    pub fn strip(mut self, token: impl Into<String>) -> Self {
        self.strip.push(token.into());
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = default.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> &ExtractionMode {
        &self.mode
    }

    pub fn default_value(&self) -> &str {
        &self.default
    }

    pub fn is_joinable(&self) -> bool {
        self.join.is_some()
    }

    /// Resolve this field for one fragment. Never fails: anything that
    /// cannot be read becomes the default value.
    pub(crate) fn resolve(&self, fragment: ElementRef<'_>, base: Option<&Url>) -> String {
        self.locate(fragment, base)
            .map(|value| self.clean(value))
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| self.default.clone())
    }

    fn locate(&self, fragment: ElementRef<'_>, base: Option<&Url>) -> Option<String> {
        let node = match &self.source {
            FieldSource::Fragment => fragment,
            FieldSource::Selector(selector) => fragment.select(selector).next()?,
        };

        match &self.mode {
            ExtractionMode::Text => Some(self.render_text(node)),
            ExtractionMode::Attribute(attribute) => node.value().attr(attribute).map(str::to_string),
            ExtractionMode::Link(attribute) => {
                let raw = node.value().attr(attribute)?.trim();
                if raw.is_empty() {
                    return None;
                }
                Some(
                    base.and_then(|base| base.join(raw).ok())
                        .map(|url| url.to_string())
                        .unwrap_or_else(|| raw.to_string()),
                )
            }
            ExtractionMode::Split { delimiter, index } => self
                .render_text(node)
                .split(delimiter.as_str())
                .nth(*index)
                .map(str::to_string),
            ExtractionMode::Identifier { attribute, prefix } => node
                .value()
                .attr(attribute)
                .map(|value| value.replacen(prefix.as_str(), "", 1)),
        }
    }

    fn render_text(&self, node: ElementRef<'_>) -> String {
        let separator = self.join.as_deref().unwrap_or("\n");
        inner_text_lines(node).join(separator)
    }

    fn clean(&self, mut value: String) -> String {
        for token in &self.strip {
            value = value.replace(token.as_str(), "");
        }
        value.trim().to_string()
    }
}

/// Ordered set of rules for one page layout
#[derive(Debug, Clone)]
pub struct ExtractionSchema {
    name: String,
    record_selector: Selector,
    rules: Vec<ExtractionRule>,
}

impl ExtractionSchema {
    pub fn new(
        name: impl Into<String>,
        record_selector: &str,
        rules: Vec<ExtractionRule>,
    ) -> Result<Self, ScrapeError> {
        let name = name.into();
        {
            let mut seen = HashSet::new();
            for rule in &rules {
                if !seen.insert(rule.name()) {
                    return Err(ScrapeError::InvalidSchema(format!(
                        "field '{}' declared twice in schema '{}'",
                        rule.name(),
                        name
                    )));
                }
            }
        }

        Ok(Self {
            record_selector: parse_selector(record_selector)?,
            name,
            rules,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn record_selector(&self) -> &Selector {
        &self.record_selector
    }

    pub fn rules(&self) -> &[ExtractionRule] {
        &self.rules
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.name())
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field_names().any(|field| field == name)
    }
}
