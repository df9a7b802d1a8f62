//! Per-document record deduplication

use crate::types::Record;
use std::collections::HashSet;

/// Remove records whose canonical form was already seen
///
/// The first occurrence of each record is kept and the relative order of the
/// survivors is preserved, so output is deterministic for a given input.
pub fn dedup_records(records: Vec<Record>) -> Vec<Record> {
    let mut seen = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|record| seen.insert(record.canonical_key()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_occurrence_wins() {
        let records = vec![
            Record::new("CoCrNi", "FCC"),
            Record::new("AlCoCrFeNi", "BCC"),
            Record::new("CoCrNi", "FCC"),
            Record::new("CoCrNi", "BCC"),
        ];
        let unique = dedup_records(records);
        assert_eq!(
            unique,
            vec![
                Record::new("CoCrNi", "FCC"),
                Record::new("AlCoCrFeNi", "BCC"),
                Record::new("CoCrNi", "BCC"),
            ]
        );
    }

    #[test]
    fn test_list_values_compared_as_sequences() {
        let a: Record = serde_json::from_value(json!({"Alloy": "x", "Phase": ["FCC", "BCC"]})).unwrap();
        let b = a.clone();
        let c: Record = serde_json::from_value(json!({"Alloy": "x", "Phase": ["BCC", "FCC"]})).unwrap();
        assert_eq!(dedup_records(vec![a, b, c]).len(), 2);
    }

    #[test]
    fn test_integral_float_duplicates_integer() {
        let int: Record = serde_json::from_value(json!({"Alloy": "x", "Phase": "FCC", "VEC": 8})).unwrap();
        let float: Record =
            serde_json::from_value(json!({"Alloy": "x", "Phase": "FCC", "VEC": 8.0})).unwrap();
        assert_eq!(dedup_records(vec![int.clone(), float]), vec![int]);
    }

    #[test]
    fn test_empty() {
        assert!(dedup_records(Vec::new()).is_empty());
    }
}
