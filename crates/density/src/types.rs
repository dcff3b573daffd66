//! Domain types shared by the store, the HTTP API and the chart client.

use serde::{Deserialize, Serialize};

/// The single table holding density records.
pub const DENSITY_TABLE: &str = "density_table";

/// Branch count and PM2.5 reading for one census tract.
///
/// Serialized as `{"census_tract": .., "branch_count": .., "PM25": ..}`; this
/// is the record shape served by the API and consumed by the chart client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityRecord {
    pub census_tract: String,
    pub branch_count: i64,
    /// `None` when the tract has no usable air-quality value
    #[serde(rename = "PM25")]
    pub pm25: Option<f64>,
}

impl DensityRecord {
    pub fn new(census_tract: impl Into<String>, branch_count: i64, pm25: Option<f64>) -> Self {
        Self {
            census_tract: census_tract.into(),
            branch_count,
            pm25,
        }
    }

    pub fn has_branches(&self) -> bool {
        self.branch_count > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_json_shape() {
        let record = DensityRecord::new("17031010100", 3, Some(9.5));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"census_tract": "17031010100", "branch_count": 3, "PM25": 9.5})
        );

        let missing = DensityRecord::new("17031010200", 0, None);
        let json = serde_json::to_value(&missing).unwrap();
        assert!(json["PM25"].is_null());
        assert!(!missing.has_branches());
    }

    #[test]
    fn test_record_without_pm25_key_deserializes() {
        let record: DensityRecord =
            serde_json::from_str(r#"{"census_tract": "A", "branch_count": 2}"#).unwrap();
        assert_eq!(record.pm25, None);
    }
}
