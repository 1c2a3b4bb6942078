//! Backend data types
//!
//! - `EcgRecord`: one uploaded recording with its raw samples
//! - `EcgImage`: the plot endpoint's answer
//! - `UploadReceipt`: what a tracked upload reports back

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named, dated ECG recording
///
/// Samples are kept as the JSON numbers the backend sent so they can be
/// shown verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EcgRecord {
    /// Unique within a user's list
    pub name: String,
    /// Display-formatted timestamp
    pub date: String,
    #[serde(default)]
    pub values: Vec<serde_json::Number>,
}

impl EcgRecord {
    pub fn new(name: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            date: date.into(),
            values: Vec::new(),
        }
    }

    /// Builder method: set the samples
    pub fn values<I, N>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<serde_json::Number>,
    {
        self.values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Samples as floats
    pub fn samples(&self) -> Vec<f64> {
        self.values.iter().filter_map(|v| v.as_f64()).collect()
    }

    /// Literal JSON rendering of the samples, e.g. `[1,2,3]`
    pub fn values_literal(&self) -> String {
        serde_json::to_string(&self.values).unwrap_or_default()
    }
}

/// Rendered plot of a recording
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EcgImage {
    /// Backend queued a render job; ask again later
    Pending,
    /// PNG bytes
    Ready(Vec<u8>),
}

/// Outcome of a tracked upload
#[derive(Debug, Clone, Serialize)]
pub struct UploadReceipt {
    pub file_name: String,
    pub status: u16,
    pub body: String,
    pub uploaded_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_deserializes_backend_shape() {
        let json = r#"[{"name": "ecg_1", "date": "2024-01-01 10:00:00", "values": [1, 2.5, -3]}]"#;
        let records: Vec<EcgRecord> = serde_json::from_str(json).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "ecg_1");
        assert_eq!(records[0].samples(), vec![1.0, 2.5, -3.0]);
        assert_eq!(records[0].values_literal(), "[1,2.5,-3]");
    }

    #[test]
    fn test_missing_values_default_to_empty() {
        let record: EcgRecord = serde_json::from_str(r#"{"name": "a", "date": "d"}"#).unwrap();
        assert!(record.values.is_empty());
        assert_eq!(record.values_literal(), "[]");
    }

    #[test]
    fn test_builder_keeps_integer_literals() {
        let record = EcgRecord::new("rec1", "2024-01-01").values([1u64, 2, 3]);
        assert_eq!(record.values_literal(), "[1,2,3]");
    }
}
