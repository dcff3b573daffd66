//! Fixed-grammar keyword matcher behind `/query-nlp`.
//!
//! Recognises exactly two phrases, `pm2.5 >` and `more than`, and reads the
//! first whitespace-delimited token after each one as a threshold. Nothing
//! else is understood.

use crate::filter::DensityFilter;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

const PM25_PHRASE: &str = "pm2.5 >";
const BRANCH_PHRASE: &str = "more than";

static PM25_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"pm2\.5 >\s*(\S*)").expect("valid regex"));
static BRANCH_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"more than\s*(\S*)").expect("valid regex"));

/// Thresholds extracted from a keyword query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdQuery {
    pub pm25_threshold: f64,
    pub branch_threshold: i64,
}

impl ThresholdQuery {
    /// The `/density` filter this query is equivalent to.
    pub fn into_filter(self) -> DensityFilter {
        DensityFilter::new()
            .with_pm25_threshold(self.pm25_threshold)
            .with_branch_threshold(self.branch_threshold)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum KeywordQueryError {
    /// One or both phrases are absent.
    #[error("Unsupported query format")]
    Unsupported,

    #[error("no value after '{phrase}'")]
    MissingValue { phrase: &'static str },

    #[error("could not convert '{value}' to a PM2.5 threshold: {reason}")]
    InvalidPm25 { value: String, reason: String },

    #[error("could not convert '{value}' to a branch count: {reason}")]
    InvalidBranchCount { value: String, reason: String },
}

impl KeywordQueryError {
    /// Text placed in the `{"error": ..}` response body.
    pub fn response_message(&self) -> String {
        match self {
            KeywordQueryError::Unsupported => self.to_string(),
            other => format!("Failed to parse query: {}", other),
        }
    }
}

/// Extract both thresholds from `query`. Matching is case-insensitive.
pub fn parse_keyword_query(query: &str) -> Result<ThresholdQuery, KeywordQueryError> {
    let query = query.to_lowercase();

    if !query.contains(PM25_PHRASE) || !query.contains(BRANCH_PHRASE) {
        return Err(KeywordQueryError::Unsupported);
    }

    let pm25_token = token_after(&PM25_TOKEN, &query, PM25_PHRASE)?;
    let branch_token = token_after(&BRANCH_TOKEN, &query, BRANCH_PHRASE)?;

    let pm25_threshold =
        pm25_token
            .parse::<f64>()
            .map_err(|e| KeywordQueryError::InvalidPm25 {
                value: pm25_token.to_string(),
                reason: e.to_string(),
            })?;
    let branch_threshold =
        branch_token
            .parse::<i64>()
            .map_err(|e| KeywordQueryError::InvalidBranchCount {
                value: branch_token.to_string(),
                reason: e.to_string(),
            })?;

    Ok(ThresholdQuery {
        pm25_threshold,
        branch_threshold,
    })
}

fn token_after<'q>(
    pattern: &Regex,
    query: &'q str,
    phrase: &'static str,
) -> Result<&'q str, KeywordQueryError> {
    pattern
        .captures(query)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|token| !token.is_empty())
        .ok_or(KeywordQueryError::MissingValue { phrase })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_parses_both_thresholds() {
        let parsed =
            parse_keyword_query("Show tracts with PM2.5 > 15 and more than 10 branches.").unwrap();
        assert_eq!(
            parsed,
            ThresholdQuery {
                pm25_threshold: 15.0,
                branch_threshold: 10
            }
        );

        let filter = parsed.into_filter();
        assert_eq!(filter, DensityFilter::new().with_pm25_threshold(15.0).with_branch_threshold(10));
    }

    #[test]
    fn test_token_may_follow_without_space() {
        let parsed = parse_keyword_query("pm2.5 >9.5 and more than   3").unwrap();
        assert_eq!(parsed.pm25_threshold, 9.5);
        assert_eq!(parsed.branch_threshold, 3);
        // the token runs to the next whitespace
        let err = parse_keyword_query("pm2.5 >9.5, and more than 3").unwrap_err();
        assert_matches!(err, KeywordQueryError::InvalidPm25 { value, .. } if value == "9.5,");
    }

    #[test]
    fn test_phrase_order_and_separators() {
        let parsed = parse_keyword_query("More than\t3 branches where PM2.5 > 12").unwrap();
        assert_eq!(parsed.pm25_threshold, 12.0);
        assert_eq!(parsed.branch_threshold, 3);

        // ">=" leaves "=" as the token after "pm2.5 >"
        let err = parse_keyword_query("pm2.5 >= 10 and more than 2").unwrap_err();
        assert_matches!(err, KeywordQueryError::InvalidPm25 { value, .. } if value == "=");
    }

    #[test]
    fn test_unsupported_phrasing() {
        for query in [
            "which tracts are most polluted?",
            "pm2.5 > 12 only",
            "more than 4 branches",
            "PM2.5 above 12 and more than 4 branches",
        ] {
            let err = parse_keyword_query(query).unwrap_err();
            assert_eq!(err, KeywordQueryError::Unsupported);
            assert_eq!(err.response_message(), "Unsupported query format");
        }
    }

    #[test]
    fn test_malformed_numbers_are_reported() {
        let err = parse_keyword_query("pm2.5 > abc and more than 10 branches").unwrap_err();
        assert_matches!(err, KeywordQueryError::InvalidPm25 { .. });
        assert!(err.response_message().starts_with("Failed to parse query: "));

        let err = parse_keyword_query("pm2.5 > 12 and more than ten branches").unwrap_err();
        assert_matches!(err, KeywordQueryError::InvalidBranchCount { .. });

        let err = parse_keyword_query("more than 10 and pm2.5 >").unwrap_err();
        assert_eq!(err, KeywordQueryError::MissingValue { phrase: "pm2.5 >" });
        assert!(err.response_message().starts_with("Failed to parse query: "));
    }
}
