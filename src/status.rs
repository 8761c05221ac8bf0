//! User-facing status messages and the presentation seam

use std::fmt;
use tracing::{debug, info, warn};

use crate::scoring::AggregateScore;
use crate::types::SubmissionHandle;

/// Progress of a submission as shown to the user
#[derive(Debug, Clone, PartialEq)]
pub enum StatusUpdate {
    /// The submit affordance was enabled or disabled
    SubmitEnabled(bool),
    /// Input rejected locally; shown verbatim
    Rejected(String),
    Submitting,
    Received(SubmissionHandle),
    /// Judge answered but has no verdict yet
    Queued { attempt: u64 },
    /// Status query failed; retried silently
    Judging,
    Failed(String),
}

impl fmt::Display for StatusUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusUpdate::SubmitEnabled(true) => f.write_str("Submit Solution"),
            StatusUpdate::SubmitEnabled(false) => f.write_str("Submitting..."),
            StatusUpdate::Rejected(msg) => f.write_str(msg),
            StatusUpdate::Submitting => f.write_str("Submitting your solution..."),
            StatusUpdate::Received(_) => f.write_str("Submission received. Fetching results..."),
            StatusUpdate::Queued { attempt } => write!(f, "In queue (attempt {})...", attempt),
            StatusUpdate::Judging => f.write_str("Judging..."),
            StatusUpdate::Failed(msg) => write!(f, "Error: {}", msg),
        }
    }
}

/// Receives status updates and the final scored outcome
pub trait StatusSink: Send + Sync {
    fn update(&self, update: &StatusUpdate);

    fn present(&self, _score: &AggregateScore) {}
}

/// Sink that only logs
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl StatusSink for TracingSink {
    fn update(&self, update: &StatusUpdate) {
        match update {
            StatusUpdate::Failed(_) | StatusUpdate::Rejected(_) => warn!("{}", update),
            StatusUpdate::Queued { .. } | StatusUpdate::Judging => debug!("{}", update),
            _ => info!("{}", update),
        }
    }

    fn present(&self, score: &AggregateScore) {
        info!(
            cases = score.len(),
            passed = score.passed(),
            total = score.total,
            "Verdict ready"
        );
    }
}
