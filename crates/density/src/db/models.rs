//! Database row model for `density_table`.

use crate::types::DensityRecord;
use sqlx::FromRow;

/// Database row for one census tract.
///
/// `branch_count` is nullable at the SQL level; rows written by ingestion
/// always carry a value.
#[derive(Debug, Clone, FromRow)]
pub struct DensityRow {
    pub census_tract: String,
    pub branch_count: Option<i64>,
    #[sqlx(rename = "PM25")]
    pub pm25: Option<f64>,
}

impl DensityRow {
    /// Convert to the domain type.
    pub fn to_domain(self) -> DensityRecord {
        DensityRecord {
            census_tract: self.census_tract,
            branch_count: self.branch_count.unwrap_or(0),
            pm25: self.pm25,
        }
    }
}

impl From<&DensityRecord> for DensityRow {
    fn from(record: &DensityRecord) -> Self {
        Self {
            census_tract: record.census_tract.clone(),
            branch_count: Some(record.branch_count),
            pm25: record.pm25,
        }
    }
}
