//! Branch counting and the air-quality left join.

use crate::error::IngestResult;
use crate::sheet::{normalize_tract, reading_value, SheetTable};
use config::{AirQualitySheetConfig, BranchSheetConfig};
use density::DensityRecord;
use std::collections::{HashMap, HashSet};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BranchType {
    Bank,
    CreditUnion,
}

impl BranchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BranchType::Bank => "Bank",
            BranchType::CreditUnion => "Credit Union",
        }
    }
}

impl fmt::Display for BranchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AirQualityReading {
    pub census_tract: String,
    pub pm25: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BranchLocation {
    pub census_tract: String,
    pub branch_type: BranchType,
}

/// Rows read from the three source sheets.
#[derive(Debug, Clone, Default)]
pub struct SourceTables {
    pub air_quality: Vec<AirQualityReading>,
    pub branches: Vec<BranchLocation>,
}

impl SourceTables {
    pub fn branch_rows(&self, branch_type: BranchType) -> usize {
        self.branches
            .iter()
            .filter(|b| b.branch_type == branch_type)
            .count()
    }
}

/// Counts from one ingestion run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub air_quality_rows: usize,
    pub bank_rows: usize,
    pub credit_union_rows: usize,
    pub tracts_written: usize,
    pub tracts_without_branches: usize,
    /// Tracts seen in branch sheets but not in the air-quality sheet
    pub dropped_branch_tracts: usize,
    /// Air-quality rows folded into an earlier row for the same tract
    pub merged_duplicate_rows: usize,
}

impl fmt::Display for IngestSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Air-quality rows:         {}", self.air_quality_rows)?;
        writeln!(f, "Bank branch rows:         {}", self.bank_rows)?;
        writeln!(f, "Credit union branch rows: {}", self.credit_union_rows)?;
        writeln!(f, "Tracts written:           {}", self.tracts_written)?;
        writeln!(f, "  with zero branches:     {}", self.tracts_without_branches)?;
        writeln!(f, "Branch-only tracts dropped: {}", self.dropped_branch_tracts)?;
        write!(f, "Duplicate readings merged:  {}", self.merged_duplicate_rows)
    }
}

/// Air-quality rows with a tract; the reading may be missing.
pub fn read_air_quality(
    table: &SheetTable,
    columns: &AirQualitySheetConfig,
) -> IngestResult<Vec<AirQualityReading>> {
    let tracts = table.column(&columns.tract_column)?;
    let values = table.column(&columns.value_column)?;

    Ok(tracts
        .into_iter()
        .zip(values)
        .filter_map(|(tract, value)| {
            normalize_tract(tract).map(|census_tract| AirQualityReading {
                census_tract,
                pm25: reading_value(value),
            })
        })
        .collect())
}

/// Branch rows with a tract, tagged with their source.
pub fn read_branches(
    table: &SheetTable,
    columns: &BranchSheetConfig,
    branch_type: BranchType,
) -> IngestResult<Vec<BranchLocation>> {
    Ok(table
        .column(&columns.tract_column)?
        .into_iter()
        .filter_map(normalize_tract)
        .map(|census_tract| BranchLocation {
            census_tract,
            branch_type,
        })
        .collect())
}

/// Number of branches (of any type) per tract.
pub fn count_branches(branches: &[BranchLocation]) -> HashMap<&str, i64> {
    let mut counts: HashMap<&str, i64> = HashMap::new();
    for branch in branches {
        *counts.entry(branch.census_tract.as_str()).or_insert(0) += 1;
    }
    counts
}

/// Left-join branch counts onto the air-quality tracts.
///
/// The air-quality sheet defines the tract universe: tracts without branches
/// get a count of 0 and branch-only tracts are dropped. Repeated air-quality
/// tracts collapse into one record holding the mean of their readings.
/// Records keep first-appearance order.
pub fn merge_sources(sources: &SourceTables) -> (Vec<DensityRecord>, IngestSummary) {
    let counts = count_branches(&sources.branches);

    // tract -> (sum of readings, non-null readings)
    let mut order: Vec<&str> = Vec::new();
    let mut readings: HashMap<&str, (f64, usize)> = HashMap::new();
    for reading in &sources.air_quality {
        let entry = readings
            .entry(reading.census_tract.as_str())
            .or_insert_with(|| {
                order.push(reading.census_tract.as_str());
                (0.0, 0)
            });
        if let Some(pm25) = reading.pm25 {
            entry.0 += pm25;
            entry.1 += 1;
        }
    }

    let records: Vec<DensityRecord> = order
        .iter()
        .map(|tract| {
            let (sum, n) = readings[tract];
            let pm25 = (n > 0).then(|| sum / n as f64);
            DensityRecord::new(*tract, counts.get(tract).copied().unwrap_or(0), pm25)
        })
        .collect();

    let known: HashSet<&str> = order.iter().copied().collect();
    let summary = IngestSummary {
        air_quality_rows: sources.air_quality.len(),
        bank_rows: sources.branch_rows(BranchType::Bank),
        credit_union_rows: sources.branch_rows(BranchType::CreditUnion),
        tracts_written: records.len(),
        tracts_without_branches: records.iter().filter(|r| !r.has_branches()).count(),
        dropped_branch_tracts: counts.keys().filter(|t| !known.contains(*t)).count(),
        merged_duplicate_rows: sources.air_quality.len() - records.len(),
    };

    (records, summary)
}
