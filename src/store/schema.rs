use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const STORAGE_FILE: &str = "storage.json";
pub const SCORE_KEY: &str = "totalScore";

/// Flat map of named keys. Values this crate writes are strings; anything
/// else already in the file is carried through untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageData {
    entries: BTreeMap<String, Value>,
}

impl StorageData {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(Value::as_str)
    }

    pub fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), Value::String(value));
    }

    /// Score under [`SCORE_KEY`]; missing, negative or non-numeric values read as 0.
    pub fn total_score(&self) -> u64 {
        self.get(SCORE_KEY)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0)
    }

    pub fn set_total_score(&mut self, total: u64) {
        self.set(SCORE_KEY, total.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_score_parsing() {
        let mut data = StorageData::default();
        assert_eq!(data.total_score(), 0);
        data.set(SCORE_KEY, "120".to_string());
        assert_eq!(data.total_score(), 120);
        data.set(SCORE_KEY, "-4".to_string());
        assert_eq!(data.total_score(), 0);
        data.set(SCORE_KEY, "lots".to_string());
        assert_eq!(data.total_score(), 0);
    }

    #[test]
    fn test_serializes_as_flat_object() {
        let mut data = StorageData::default();
        data.set_total_score(35);
        let json = serde_json::to_string(&data).unwrap();
        assert_eq!(json, r#"{"totalScore":"35"}"#);
    }

    #[test]
    fn test_non_string_values_survive() {
        let mut data: StorageData =
            serde_json::from_str(r#"{"volume": 3, "muted": false, "totalScore": "40"}"#).unwrap();
        assert_eq!(data.total_score(), 40);
        assert_eq!(data.get("volume"), None);

        data.set_total_score(45);
        let back: Value = serde_json::to_value(&data).unwrap();
        assert_eq!(back["volume"], 3);
        assert_eq!(back["muted"], false);
        assert_eq!(back["totalScore"], "45");
    }
}
