//! Types for extraction inputs and results

use phasemine_domain::Phase;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::sanitizer::EmptyReason;

/// JSON field holding the alloy composition
pub const ALLOY_FIELD: &str = "Alloy";

/// JSON field holding the phase label
pub const PHASE_FIELD: &str = "Phase";

/// One extracted alloy/phase record
///
/// Records are kept as the JSON objects the model produced. `Alloy` and
/// `Phase` are expected but not guaranteed; see [`Record::is_well_formed`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Create a record with the two schema fields
    pub fn new(alloy: impl Into<String>, phase: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert(ALLOY_FIELD.to_string(), Value::String(alloy.into()));
        fields.insert(PHASE_FIELD.to_string(), Value::String(phase.into()));
        Self(fields)
    }

    /// Wrap an arbitrary JSON object
    pub fn from_object(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Alloy composition, if present and a string
    pub fn alloy(&self) -> Option<&str> {
        self.0.get(ALLOY_FIELD).and_then(Value::as_str)
    }

    /// Phase label, if present and a string
    pub fn phase(&self) -> Option<&str> {
        self.0.get(PHASE_FIELD).and_then(Value::as_str)
    }

    /// All fields of the record
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Whether the record satisfies the on-disk schema
    ///
    /// Requires a non-empty string `Alloy` and a string `Phase` from the
    /// closed vocabulary. This is schema validation only.
    pub fn is_well_formed(&self) -> bool {
        let alloy_ok = self.alloy().is_some_and(|a| !a.trim().is_empty());
        let phase_ok = self.phase().and_then(Phase::parse).is_some();
        alloy_ok && phase_ok
    }

    /// Canonical form used for duplicate detection
    ///
    /// Two records share a key iff they hold the same key/value pairs,
    /// regardless of field order. List values compare as ordered sequences
    /// and nested objects compare by their own canonical form. Numbers
    /// compare by value, so an integer equals the same integral float.
    pub fn canonical_key(&self) -> RecordKey {
        RecordKey(canonical_fields(&self.0))
    }
}

/// Hashable, totally ordered canonical form of a [`Record`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordKey(Vec<(String, CanonicalValue)>);

/// Canonical form of a JSON value
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CanonicalValue {
    /// `null`
    Null,
    /// `true` / `false`
    Bool(bool),
    /// Numbers compare by value, so `1`, `1.0` and `-0.0`/`0` coincide
    Number(String),
    /// String
    String(String),
    /// Ordered sequence
    List(Vec<CanonicalValue>),
    /// Key-sorted object
    Object(Vec<(String, CanonicalValue)>),
}

impl From<&Value> for CanonicalValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => CanonicalValue::Null,
            Value::Bool(b) => CanonicalValue::Bool(*b),
            Value::Number(n) => CanonicalValue::Number(canonical_number(n)),
            Value::String(s) => CanonicalValue::String(s.clone()),
            Value::Array(items) => CanonicalValue::List(items.iter().map(Into::into).collect()),
            Value::Object(map) => CanonicalValue::Object(canonical_fields(map)),
        }
    }
}

/// Floats render through `f64`'s `Display`, which drops a zero fraction
fn canonical_number(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f == 0.0 => "0".to_string(),
        Some(f) if n.is_f64() => f.to_string(),
        _ => n.to_string(),
    }
}

fn canonical_fields(map: &Map<String, Value>) -> Vec<(String, CanonicalValue)> {
    let mut fields: Vec<(String, CanonicalValue)> = map
        .iter()
        .map(|(k, v)| (k.clone(), CanonicalValue::from(v)))
        .collect();
    fields.sort();
    fields
}

/// A contiguous run of document lines sized for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Position of the chunk within its document
    pub index: usize,

    /// Lines of the chunk, without separators
    pub lines: Vec<String>,

    /// Token count of the joined text
    pub token_count: usize,
}

impl Chunk {
    /// Lines joined by `'\n'`
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// How a chunk's request ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkOutcome {
    /// The response held at least one record
    Parsed,

    /// The response held nothing usable
    Empty(EmptyReason),

    /// The provider failed for this request only
    Failed(String),
}

/// Records extracted from one chunk
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkExtraction {
    /// Index of the source chunk
    pub chunk_index: usize,

    /// Records in response order, possibly empty
    pub records: Vec<Record>,

    /// Outcome tag
    pub outcome: ChunkOutcome,
}

/// Counters describing one document's extraction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentStats {
    /// Document id (file stem)
    pub id: String,

    /// Chunks sent to the provider
    pub chunks: usize,

    /// Records before deduplication
    pub raw_records: usize,

    /// Records after deduplication
    pub unique_records: usize,

    /// Chunks whose response held no records
    pub empty_chunks: usize,

    /// Chunks whose request failed
    pub failed_chunks: usize,
}

/// Deduplicated records for one document
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentResult {
    /// Document id (file stem)
    pub id: String,

    /// Unique records, in order of first occurrence
    pub records: Vec<Record>,

    /// Counters
    pub stats: DocumentStats,
}
