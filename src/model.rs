use serde::ser::{Serialize, SerializeMap, Serializer};

/// Field values extracted from one record fragment, in schema order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    fields: Vec<(String, String)>,
}

impl RawRecord {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, String)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl Serialize for RawRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// A record labelled with the target it came from.
///
/// Serializes as one flat object with the tag field first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedRecord {
    tag_field: String,
    tag: String,
    record: RawRecord,
}

impl TaggedRecord {
    pub(crate) fn new(tag_field: impl Into<String>, tag: impl Into<String>, record: RawRecord) -> Self {
        Self {
            tag_field: tag_field.into(),
            tag: tag.into(),
            record,
        }
    }

    pub fn tag_field(&self) -> &str {
        &self.tag_field
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn record(&self) -> &RawRecord {
        &self.record
    }

    /// Look up a field by name, including the tag field
    pub fn get(&self, name: &str) -> Option<&str> {
        if name == self.tag_field {
            Some(&self.tag)
        } else {
            self.record.get(name)
        }
    }
}

impl Serialize for TaggedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.record.len() + 1))?;
        map.serialize_entry(&self.tag_field, &self.tag)?;
        for (key, value) in self.record.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Every record of a run: target order first, then document order
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct ResultCollection {
    records: Vec<TaggedRecord>,
}

impl ResultCollection {
    pub(crate) fn extend(&mut self, records: impl IntoIterator<Item = TaggedRecord>) {
        self.records.extend(records);
    }

    pub fn records(&self) -> &[TaggedRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TaggedRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<TaggedRecord> {
        self.records
    }
}
