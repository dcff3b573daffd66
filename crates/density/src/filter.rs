//! Filter composition for density reads.
//!
//! A [`DensityFilter`] becomes a [`FilterQuery`]: SQL text plus the values to
//! bind, in clause order. The same filter round-trips through URL query pairs
//! so the chart client and the API agree on parameter names.

use crate::error::{DensityError, DensityResult};
use crate::types::{DensityRecord, DENSITY_TABLE};

/// Query parameter selecting tracts; may repeat.
pub const CENSUS_TRACT_PARAM: &str = "census_tract";
/// Query parameter for the inclusive PM2.5 lower bound.
pub const PM25_THRESHOLD_PARAM: &str = "pm25_threshold";
/// Query parameter for the inclusive branch-count lower bound.
pub const BRANCH_THRESHOLD_PARAM: &str = "branch_threshold";

/// A value bound to a `?` placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    Real(f64),
    Integer(i64),
}

/// SQL text and its bound parameters. `params[i]` binds the i-th `?`.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterQuery {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

/// Conjunctive filter over density records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DensityFilter {
    /// Set membership; empty means no tract restriction
    pub census_tracts: Vec<String>,
    pub pm25_threshold: Option<f64>,
    pub branch_threshold: Option<i64>,
}

impl DensityFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tract(mut self, tract: impl Into<String>) -> Self {
        self.census_tracts.push(tract.into());
        self
    }

    pub fn with_tracts<I, S>(mut self, tracts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.census_tracts.extend(tracts.into_iter().map(Into::into));
        self
    }

    pub fn with_pm25_threshold(mut self, threshold: f64) -> Self {
        self.pm25_threshold = Some(threshold);
        self
    }

    pub fn with_branch_threshold(mut self, threshold: i64) -> Self {
        self.branch_threshold = Some(threshold);
        self
    }

    /// Compose the read for this filter.
    ///
    /// Clauses are appended in a fixed order (tracts, PM2.5, branches) and the
    /// parameters are pushed in the same order. No clauses, no `WHERE`.
    pub fn build_query(&self) -> FilterQuery {
        let mut sql = format!("SELECT * FROM {}", DENSITY_TABLE);
        let mut clauses: Vec<String> = Vec::new();
        let mut params: Vec<SqlParam> = Vec::new();

        if !self.census_tracts.is_empty() {
            let placeholders = vec!["?"; self.census_tracts.len()].join(", ");
            clauses.push(format!("census_tract IN ({})", placeholders));
            params.extend(self.census_tracts.iter().cloned().map(SqlParam::Text));
        }
        if let Some(pm25) = self.pm25_threshold {
            clauses.push("PM25 >= ?".to_string());
            params.push(SqlParam::Real(pm25));
        }
        if let Some(branches) = self.branch_threshold {
            clauses.push("branch_count >= ?".to_string());
            params.push(SqlParam::Integer(branches));
        }

        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }

        FilterQuery { sql, params }
    }

    /// Evaluate the filter in memory with the same semantics as the SQL:
    /// a missing PM2.5 value never passes a PM2.5 threshold.
    pub fn matches(&self, record: &DensityRecord) -> bool {
        if !self.census_tracts.is_empty() && !self.census_tracts.contains(&record.census_tract) {
            return false;
        }
        if let Some(threshold) = self.pm25_threshold {
            match record.pm25 {
                Some(pm25) if pm25 >= threshold => {}
                _ => return false,
            }
        }
        if let Some(threshold) = self.branch_threshold {
            if record.branch_count < threshold {
                return false;
            }
        }
        true
    }

    /// Build a filter from decoded URL query pairs.
    ///
    /// `census_tract` may repeat; for the thresholds the last occurrence wins.
    /// Unknown names are ignored.
    pub fn from_query_pairs(pairs: &[(String, String)]) -> DensityResult<Self> {
        let mut filter = Self::new();

        for (name, value) in pairs {
            match name.as_str() {
                CENSUS_TRACT_PARAM => filter.census_tracts.push(value.clone()),
                PM25_THRESHOLD_PARAM => {
                    let parsed = value.trim().parse::<f64>().map_err(|e| {
                        DensityError::InvalidParameter {
                            name: name.clone(),
                            value: value.clone(),
                            reason: e.to_string(),
                        }
                    })?;
                    filter.pm25_threshold = Some(parsed);
                }
                BRANCH_THRESHOLD_PARAM => {
                    let parsed = value.trim().parse::<i64>().map_err(|e| {
                        DensityError::InvalidParameter {
                            name: name.clone(),
                            value: value.clone(),
                            reason: e.to_string(),
                        }
                    })?;
                    filter.branch_threshold = Some(parsed);
                }
                _ => {}
            }
        }

        Ok(filter)
    }

    /// The URL query pairs that [`DensityFilter::from_query_pairs`] reads back.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .census_tracts
            .iter()
            .map(|t| (CENSUS_TRACT_PARAM.to_string(), t.clone()))
            .collect();
        if let Some(pm25) = self.pm25_threshold {
            pairs.push((PM25_THRESHOLD_PARAM.to_string(), pm25.to_string()));
        }
        if let Some(branches) = self.branch_threshold {
            pairs.push((BRANCH_THRESHOLD_PARAM.to_string(), branches.to_string()));
        }
        pairs
    }
}
