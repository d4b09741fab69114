//! Cached tempo lookup outcome.

use serde::{Deserialize, Serialize};

/// The outcome of one tempo lookup for a track.
///
/// `bpm: None` is a negative entry: the lookup was attempted and found
/// nothing. It is distinct from having no record at all. The `bpm` key must
/// be present when reading; a record without it is treated as corrupt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TempoRecord {
    #[serde(deserialize_with = "Option::deserialize")]
    pub bpm: Option<f64>,
}

impl TempoRecord {
    /// Creates a record holding a found tempo.
    pub fn found(bpm: f64) -> Self {
        Self { bpm: Some(bpm) }
    }

    /// Creates a negative record.
    pub fn not_found() -> Self {
        Self { bpm: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_bpm_is_a_valid_record() {
        let record: TempoRecord = serde_json::from_str(r#"{"bpm": null}"#).unwrap();
        assert_eq!(record, TempoRecord::not_found());
    }

    #[test]
    fn missing_bpm_key_is_rejected() {
        assert!(serde_json::from_str::<TempoRecord>("{}").is_err());
    }

    #[test]
    fn serializes_null_for_not_found() {
        let json = serde_json::to_string(&TempoRecord::not_found()).unwrap();
        assert_eq!(json, r#"{"bpm":null}"#);
        let json = serde_json::to_string(&TempoRecord::found(180.0)).unwrap();
        assert_eq!(json, r#"{"bpm":180.0}"#);
    }
}
