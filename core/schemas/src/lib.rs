use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ============================================================================
// ULID and ID Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UploadId(pub String);

impl fmt::Display for UploadId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Person Record Schema
// ============================================================================

/// Marker attached to a person record in place of structured fields.
/// Richer parsing (events, relationships, sub-records) would replace this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordMarker {
    #[serde(rename = "placeholder")]
    Placeholder,
}

impl RecordMarker {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordMarker::Placeholder => "placeholder",
        }
    }
}

/// One discovered individual, keyed by display name in an ExtractionResult.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
    pub marker: RecordMarker,
}

impl PersonRecord {
    pub fn placeholder() -> Self {
        Self {
            marker: RecordMarker::Placeholder,
        }
    }
}

// ============================================================================
// Extraction Result Schema
// ============================================================================

/// Flat mapping from display name to person record.
///
/// Built in one pass by the extractor and handed to the caller; duplicate
/// names collapse last-write-wins, so `len()` counts distinct names. Key
/// order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    records: HashMap<String, PersonRecord>,
}

impl ExtractionResult {
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
        }
    }

    /// Insert or overwrite the record for a display name.
    pub fn insert(&mut self, name: String, record: PersonRecord) {
        self.records.insert(name, record);
    }

    pub fn get(&self, name: &str) -> Option<&PersonRecord> {
        self.records.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    /// Number of distinct display names.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    /// Display names in lexicographic order, for stable reporting.
    pub fn sorted_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.records.keys().cloned().collect();
        names.sort();
        names
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

pub fn generate_upload_id() -> UploadId {
    UploadId(format!("upl_{}", ulid::Ulid::new()))
}
