use serde::Deserialize;

/// A performer as it appears in configuration: `{ "id": .., "name": .. }`
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TalentEntry {
    pub id: String,
    pub name: String,
}

/// A venue as it appears in configuration: `{ "name": .., "url": .. }`
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TheaterEntry {
    pub name: String,
    pub url: String,
}

/// One configured source to scrape.
///
/// Performer targets carry an id that is appended to a shared base URL,
/// venue targets carry their page URL directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDescriptor {
    id_or_url: String,
    display_name: String,
    base_url: Option<String>,
}

impl TargetDescriptor {
    pub fn performer(
        base_url: impl Into<String>,
        id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id_or_url: id.into(),
            display_name: name.into(),
            base_url: Some(base_url.into()),
        }
    }

    pub fn venue(url: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id_or_url: url.into(),
            display_name: name.into(),
            base_url: None,
        }
    }

    pub fn id_or_url(&self) -> &str {
        &self.id_or_url
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// The page to render for this target
    pub fn url(&self) -> String {
        match &self.base_url {
            Some(base) => format!("{}{}", base, self.id_or_url),
            None => self.id_or_url.clone(),
        }
    }
}

impl TalentEntry {
    pub fn to_target(&self, base_url: &str) -> TargetDescriptor {
        TargetDescriptor::performer(base_url, &self.id, &self.name)
    }
}

impl TheaterEntry {
    pub fn to_target(&self) -> TargetDescriptor {
        TargetDescriptor::venue(&self.url, &self.name)
    }
}
