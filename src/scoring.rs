//! Score aggregation over per-case judge messages
//!
//! Each case contributes the first number found in its free-text message.
//! The total is the sum of those contributions, but collapses to zero as
//! soon as any case failed.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::types::CaseResult;

/// Signed ASCII decimal with optional thousands separators and fraction
static SCORE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-?[0-9][0-9,]*(?:\.[0-9]+)?").expect("score pattern is valid"));

/// A case result together with the value parsed out of its message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCase {
    #[serde(flatten)]
    pub case: CaseResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_value: Option<f64>,
}

impl ScoredCase {
    /// Amount added to the running sum
    pub fn contribution(&self) -> f64 {
        self.extracted_value.unwrap_or(0.0)
    }
}

/// Scored cases in judge order plus the final total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateScore {
    pub per_case: Vec<ScoredCase>,
    pub total: f64,
    /// Sum of extracted values before failure zeroing
    pub raw_sum: f64,
    pub any_failed: bool,
}

impl AggregateScore {
    pub fn passed(&self) -> usize {
        self.per_case.iter().filter(|c| c.case.ok).count()
    }

    pub fn len(&self) -> usize {
        self.per_case.len()
    }

    pub fn is_empty(&self) -> bool {
        self.per_case.is_empty()
    }
}

/// Parse the first numeric token out of a judge message.
///
/// `"Wrong answer, score: 1,234.5"` yields `1234.5`.
pub fn extract_value(message: &str) -> Option<f64> {
    let token = SCORE_PATTERN.find(message)?;
    token.as_str().replace(',', "").parse::<f64>().ok()
}

/// Score every case in order. Never fails: cases without a usable message
/// contribute zero.
pub fn aggregate(cases: &[CaseResult]) -> AggregateScore {
    let mut per_case = Vec::with_capacity(cases.len());
    let mut raw_sum = 0.0;
    let mut any_failed = false;

    for case in cases {
        if !case.ok {
            any_failed = true;
        }
        let extracted_value = case.message.as_deref().and_then(extract_value);
        raw_sum += extracted_value.unwrap_or(0.0);
        per_case.push(ScoredCase {
            case: case.clone(),
            extracted_value,
        });
    }

    let total = if any_failed { 0.0 } else { raw_sum };

    AggregateScore {
        per_case,
        total,
        raw_sum,
        any_failed,
    }
}
