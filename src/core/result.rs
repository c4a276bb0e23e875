use serde::{Deserialize, Serialize};
use std::fmt;

/// Name used for both fields when the plant could not be identified.
pub const UNKNOWN_NAME: &str = "unknown";
pub const FALLBACK_NOTE: &str = "Unable to parse response";

/// One identification outcome.
///
/// Serialized in camelCase to match the JSON schema the model is asked to
/// produce. `confidence` is expected in `0.0..=1.0` and `care` to hold at
/// most two tips; neither is enforced here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantResult {
    pub common_name: String,
    pub scientific_name: String,
    pub confidence: f64,
    pub care: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl PlantResult {
    /// Substituted for any failed live identification.
    pub fn unknown() -> Self {
        Self {
            common_name: UNKNOWN_NAME.to_string(),
            scientific_name: UNKNOWN_NAME.to_string(),
            confidence: 0.0,
            care: Vec::new(),
            notes: Some(FALLBACK_NOTE.to_string()),
        }
    }

    /// Fixed result returned in demo mode.
    pub fn demo() -> Self {
        Self {
            common_name: "Peace Lily".to_string(),
            scientific_name: "Spathiphyllum".to_string(),
            confidence: 0.95,
            care: vec![
                "Keep soil moist".to_string(),
                "Bright indirect light".to_string(),
            ],
            notes: None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.common_name == UNKNOWN_NAME && self.scientific_name == UNKNOWN_NAME
    }
}

impl fmt::Display for PlantResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Common Name: {}", self.common_name)?;
        writeln!(f, "Scientific Name: {}", self.scientific_name)?;
        writeln!(f, "Confidence: {:.2}", self.confidence)?;
        writeln!(f, "Care Tips:")?;
        for tip in &self.care {
            writeln!(f, "  \u{2022} {tip}")?;
        }
        if let Some(notes) = self.notes.as_deref().filter(|n| !n.is_empty()) {
            writeln!(f, "Notes: {notes}")?;
        }
        Ok(())
    }
}
