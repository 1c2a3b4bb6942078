//! ECG records as served by the backend.

/// One uploaded recording
#[derive(Clone, Debug, serde::Deserialize, serde::Serialize, PartialEq)]
pub struct EcgRecord {
    pub name: String,
    pub date: String,
    #[serde(default)]
    pub values: Vec<serde_json::Number>,
}

impl EcgRecord {
    /// Literal JSON rendering of the samples, e.g. `[1,2,3]`
    pub fn values_literal(&self) -> String {
        serde_json::to_string(&self.values).unwrap_or_default()
    }
}

/// Values of the record named `selected`, if it is in `records`
pub fn selected_values(records: &[EcgRecord], selected: &str) -> Option<String> {
    records
        .iter()
        .find(|r| r.name == selected)
        .map(EcgRecord::values_literal)
}
