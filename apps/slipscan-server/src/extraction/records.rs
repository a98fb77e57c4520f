//! Per-document extraction results

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

/// What the LLM step produced for one document
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum ExtractionValue {
    /// Already keyed fields
    Structured(Map<String, Value>),
    /// Free text, parsed later with the numbered-list heuristic
    Raw(String),
    /// The call for this document failed
    Failed { error: String },
}

impl ExtractionValue {
    pub fn failed(error: impl ToString) -> Self {
        Self::Failed {
            error: error.to_string(),
        }
    }
}

/// Ordered mapping from document id to its extraction result
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionRecords {
    entries: Vec<(String, ExtractionValue)>,
}

impl ExtractionRecords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record. An existing id keeps its position and gets the new value.
    pub fn insert(&mut self, id: impl Into<String>, value: ExtractionValue) {
        let id = id.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == id) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((id, value)),
        }
    }

    pub fn get(&self, id: &str) -> Option<&ExtractionValue> {
        self.entries.iter().find(|(existing, _)| existing == id).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ExtractionValue)> {
        self.entries.iter().map(|(id, v)| (id.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, ExtractionValue)> for ExtractionRecords {
    fn from_iter<I: IntoIterator<Item = (String, ExtractionValue)>>(iter: I) -> Self {
        let mut records = Self::new();
        for (id, value) in iter {
            records.insert(id, value);
        }
        records
    }
}

impl Serialize for ExtractionRecords {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, value) in &self.entries {
            map.serialize_entry(id, value)?;
        }
        map.end()
    }
}
