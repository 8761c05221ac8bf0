//! Plain-text formatting of scored cases

use crate::scoring::{AggregateScore, ScoredCase};
use crate::types::CaseResult;

/// Shown for measurements the judge did not report
pub const MISSING: &str = "—";

/// Nanoseconds as milliseconds with two decimals
pub fn format_time(nanos: Option<f64>) -> String {
    match nanos {
        Some(ns) if ns.is_finite() => format!("{:.2} ms", ns / 1e6),
        _ => MISSING.to_string(),
    }
}

/// Bytes as whole kilobytes
pub fn format_memory(bytes: Option<f64>) -> String {
    match bytes {
        // Halves round up
        Some(b) if b.is_finite() => format!("{} KB", (b / 1024.0).round()),
        _ => MISSING.to_string(),
    }
}

/// 1-based case label for a 0-based position
pub fn case_label(index: usize) -> String {
    format!("Case {}", index + 1)
}

pub fn status_label(case: &CaseResult) -> String {
    match case.status.as_deref() {
        Some(s) if !s.is_empty() => s.to_string(),
        _ if case.ok => "Accepted".to_string(),
        _ => "Failed".to_string(),
    }
}

/// Integral scores print without a fractional part
pub fn format_score(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{}", value)
}

/// One display row per case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseRow {
    pub label: String,
    pub status: String,
    pub ok: bool,
    pub time: String,
    pub memory: String,
    pub message: String,
    pub extracted: Option<String>,
}

impl CaseRow {
    pub fn new(index: usize, scored: &ScoredCase) -> Self {
        Self {
            label: case_label(index),
            status: status_label(&scored.case),
            ok: scored.case.ok,
            time: format_time(scored.case.time_nanos),
            memory: format_memory(scored.case.memory_bytes),
            message: scored.case.message.clone().unwrap_or_default(),
            extracted: scored.extracted_value.map(format_score),
        }
    }

    /// Message with the extracted-value note appended
    pub fn message_with_extracted(&self) -> String {
        match &self.extracted {
            Some(v) if self.message.is_empty() => format!("Extracted: {}", v),
            Some(v) => format!("{}  Extracted: {}", self.message, v),
            None => self.message.clone(),
        }
    }
}

pub fn case_rows(score: &AggregateScore) -> Vec<CaseRow> {
    score
        .per_case
        .iter()
        .enumerate()
        .map(|(i, scored)| CaseRow::new(i, scored))
        .collect()
}

pub fn total_line(score: &AggregateScore) -> String {
    format!("Total Score: {}", format_score(score.total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::aggregate;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(Some(1_500_000.0)), "1.50 ms");
        assert_eq!(format_time(Some(0.0)), "0.00 ms");
        assert_eq!(format_time(None), MISSING);
        assert_eq!(format_time(Some(f64::NAN)), MISSING);
    }

    #[test]
    fn test_format_memory() {
        assert_eq!(format_memory(Some(2048.0)), "2 KB");
        assert_eq!(format_memory(Some(2560.0)), "3 KB");
        assert_eq!(format_memory(Some(3583.0)), "3 KB");
        assert_eq!(format_memory(Some(262_144_000.0)), "256000 KB");
        assert_eq!(format_memory(None), MISSING);
    }

    #[test]
    fn test_status_label_fallbacks() {
        let mut case = CaseResult {
            ok: true,
            ..Default::default()
        };
        assert_eq!(status_label(&case), "Accepted");
        case.ok = false;
        assert_eq!(status_label(&case), "Failed");
        case.status = Some("TLE".to_string());
        assert_eq!(status_label(&case), "TLE");
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(150.0), "150");
        assert_eq!(format_score(1234.5), "1234.5");
        assert_eq!(format_score(-0.0), "0");
        assert_eq!(format_score(-17.0), "-17");
    }

    #[test]
    fn test_rows_follow_case_order() {
        let cases = vec![
            CaseResult {
                ok: true,
                message: Some("Score: 100".into()),
                time_nanos: Some(2e6),
                ..Default::default()
            },
            CaseResult {
                ok: true,
                message: Some("fine".into()),
                ..Default::default()
            },
        ];
        let score = aggregate(&cases);
        let rows = case_rows(&score);

        assert_eq!(rows[0].label, "Case 1");
        assert_eq!(rows[0].time, "2.00 ms");
        assert_eq!(rows[0].message_with_extracted(), "Score: 100  Extracted: 100");
        assert_eq!(rows[1].label, "Case 2");
        assert_eq!(rows[1].memory, MISSING);
        assert_eq!(rows[1].message_with_extracted(), "fine");
        assert_eq!(total_line(&score), "Total Score: 100");
    }
}
