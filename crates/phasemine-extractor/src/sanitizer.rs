//! Turning untrusted model output into records
//!
//! The completion service is treated as an adversarial text source. Every
//! `{ ... }` span (non-greedy, newlines included) is collected, the spans are
//! joined into a JSON array and parsed once. Anything that does not parse is
//! discarded whole; nothing here ever fails.

use crate::types::Record;
use serde_json::Value;
use tracing::debug;

/// Why a response produced no records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    /// No brace-delimited span in the response
    NoCandidates,

    /// The assembled array was not valid JSON
    InvalidJson,

    /// The array parsed but held no usable records
    NoRecords,
}

/// Outcome of sanitizing one response
#[derive(Debug, Clone, PartialEq)]
pub enum SanitizedResponse {
    /// At least one record
    Parsed(Vec<Record>),

    /// Nothing usable
    Empty(EmptyReason),
}

impl SanitizedResponse {
    /// The records, empty for [`SanitizedResponse::Empty`]
    pub fn records(&self) -> &[Record] {
        match self {
            SanitizedResponse::Parsed(records) => records,
            SanitizedResponse::Empty(_) => &[],
        }
    }

    /// Consume into the records
    pub fn into_records(self) -> Vec<Record> {
        match self {
            SanitizedResponse::Parsed(records) => records,
            SanitizedResponse::Empty(_) => Vec::new(),
        }
    }

    /// Compact JSON array text; always valid JSON
    pub fn to_json_string(&self) -> String {
        match self {
            SanitizedResponse::Parsed(records) => {
                serde_json::to_string(records).unwrap_or_else(|_| "[]".to_string())
            }
            SanitizedResponse::Empty(_) => "[]".to_string(),
        }
    }
}

/// Response sanitizer
#[derive(Debug, Clone, Copy, Default)]
pub struct Sanitizer {
    strict: bool,
}

impl Sanitizer {
    /// Create a sanitizer; `strict` drops records that fail [`Record::is_well_formed`]
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    /// Sanitize one response
    pub fn sanitize(&self, response: &str) -> SanitizedResponse {
        let candidates = candidate_objects(response);
        if candidates.is_empty() {
            return SanitizedResponse::Empty(EmptyReason::NoCandidates);
        }

        let assembled = format!("[{}]", candidates.join(","));
        let items = match serde_json::from_str::<Vec<Value>>(&assembled) {
            Ok(items) => items,
            Err(e) => {
                debug!("Discarding malformed response ({} candidates): {}", candidates.len(), e);
                return SanitizedResponse::Empty(EmptyReason::InvalidJson);
            }
        };

        let records: Vec<Record> = items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(fields) => Some(Record::from_object(fields)),
                _ => None,
            })
            .filter(|record| !self.strict || record.is_well_formed())
            .collect();

        if records.is_empty() {
            SanitizedResponse::Empty(EmptyReason::NoRecords)
        } else {
            SanitizedResponse::Parsed(records)
        }
    }
}

/// Sanitize with default (non-strict) settings
pub fn sanitize_response(response: &str) -> SanitizedResponse {
    Sanitizer::default().sanitize(response)
}

/// Non-overlapping spans from each `{` to the nearest following `}`
fn candidate_objects(text: &str) -> Vec<&str> {
    let mut spans = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}') else {
            break;
        };
        let end = open + close + 1;
        spans.push(&rest[open..end]);
        rest = &rest[end..];
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_with_trailing_prose() {
        let out = sanitize_response(r#"{"Alloy":"AlCoCrFeNi","Phase":"BCC"} plus trailing prose"#);
        assert_eq!(out, SanitizedResponse::Parsed(vec![Record::new("AlCoCrFeNi", "BCC")]));
    }

    #[test]
    fn test_array_in_code_fence() {
        let response = "Here you go:\n```json\n[\n  {\"Alloy\": \"CoCrFeMnNi\", \"Phase\": \"FCC\"},\n  {\"Alloy\": \"AlCoCrFeNi\",\n   \"Phase\": \"BCC\"}\n]\n```";
        let records = sanitize_response(response).into_records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].alloy(), Some("AlCoCrFeNi"));
        assert_eq!(records[1].phase(), Some("BCC"));
    }

    #[test]
    fn test_empty_and_prose() {
        assert_eq!(sanitize_response(""), SanitizedResponse::Empty(EmptyReason::NoCandidates));
        assert_eq!(
            sanitize_response("No alloys were found."),
            SanitizedResponse::Empty(EmptyReason::NoCandidates)
        );
    }

    #[test]
    fn test_malformed_discarded_whole() {
        let response = r#"{"Alloy":"CoCrNi","Phase":"FCC"} {"Alloy": "x", "Phase"}"#;
        assert_eq!(sanitize_response(response), SanitizedResponse::Empty(EmptyReason::InvalidJson));
    }

    #[test]
    fn test_nested_braces_not_repaired() {
        let response = r#"{"Alloy": "CoCrNi", "Meta": {"note": "x"}}"#;
        assert_eq!(sanitize_response(response), SanitizedResponse::Empty(EmptyReason::InvalidJson));
    }

    #[test]
    fn test_unclosed_brace() {
        assert_eq!(
            sanitize_response(r#"{"Alloy": "CoCrNi""#),
            SanitizedResponse::Empty(EmptyReason::NoCandidates)
        );
    }

    #[test]
    fn test_empty_object_kept_unless_strict() {
        assert_eq!(sanitize_response("{}").records().len(), 1);
        assert_eq!(
            Sanitizer::new(true).sanitize("{}"),
            SanitizedResponse::Empty(EmptyReason::NoRecords)
        );
    }

    #[test]
    fn test_strict_filters_vocabulary() {
        let response = r#"[{"Alloy":"CoCrNi","Phase":"FCC"},{"Alloy":"Ti6Al4V","Phase":"HCP"}]"#;
        assert_eq!(sanitize_response(response).records().len(), 2);

        let strict = Sanitizer::new(true).sanitize(response);
        assert_eq!(strict.records(), &[Record::new("CoCrNi", "FCC")]);
    }

    #[test]
    fn test_to_json_string() {
        let parsed = sanitize_response(r#"{"Alloy":"CoCrNi","Phase":"FCC"}"#);
        assert_eq!(parsed.to_json_string(), r#"[{"Alloy":"CoCrNi","Phase":"FCC"}]"#);
        assert_eq!(SanitizedResponse::Empty(EmptyReason::InvalidJson).to_json_string(), "[]");
    }

    #[test]
    fn test_multibyte_text_around_objects() {
        let response = "Résumé — {\"Alloy\":\"CoCrNi\",\"Phase\":\"FCC\"} — fin";
        assert_eq!(sanitize_response(response).records().len(), 1);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: any input yields valid JSON and never panics
        #[test]
        fn prop_output_is_valid_json(response in ".*") {
            let out = sanitize_response(&response);
            let parsed: Value = serde_json::from_str(&out.to_json_string()).unwrap();
            prop_assert!(parsed.is_array());
        }

        /// Property: brace-heavy noise is handled the same way
        #[test]
        fn prop_brace_noise(response in "[{}\\[\\]\":, a-z0-9]{0,64}") {
            let out = sanitize_response(&response);
            prop_assert!(serde_json::from_str::<Vec<Value>>(&out.to_json_string()).is_ok());
            if let SanitizedResponse::Parsed(records) = out {
                prop_assert!(!records.is_empty());
            }
        }
    }
}
