//! Error taxonomy for the submission lifecycle.
//!
//! Validation failures never leave the process, submission failures are
//! surfaced to the user, and transient poll failures are always recovered
//! by the poller. Only an opted-in cancellation or deadline ends a poll early.

use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

use crate::client::EncodingStrategy;

/// Local input validation failure. Raised before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter some code before submitting.")]
    EmptySource,
    #[error("Problem id must not be empty")]
    EmptyProblemId,
}

/// One failed delivery attempt of the submit body.
#[derive(Debug, Clone)]
pub struct AttemptFailure {
    pub encoding: EncodingStrategy,
    pub reason: String,
}

impl std::fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.reason, self.encoding)
    }
}

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("Submission failed: {}", join_failures(.attempts))]
    Exhausted { attempts: Vec<AttemptFailure> },
    #[error("Judge did not return a submission id.")]
    MissingId,
    #[error("No submit encodings configured")]
    NoStrategies,
    #[error("Failed to encode submission: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("Invalid judge URL: {0}")]
    InvalidUrl(String),
}

fn join_failures(attempts: &[AttemptFailure]) -> String {
    attempts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A single failed status query. The poller treats every variant as
/// "not ready yet".
#[derive(Debug, Error)]
pub enum TransientPollError {
    #[error("Result request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Result request failed with status {0}")]
    Status(StatusCode),
    #[error("Failed to parse result payload: {0}")]
    Decode(String),
    #[error("Invalid judge URL: {0}")]
    InvalidUrl(String),
}

/// Reasons a poll returns without a finished payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollError {
    #[error("Polling cancelled after {attempts} attempts")]
    Cancelled { attempts: u64 },
    #[error("No verdict after {attempts} attempts ({elapsed:?})")]
    DeadlineExceeded { attempts: u64, elapsed: Duration },
}

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    #[error(transparent)]
    Poll(#[from] PollError),
    #[error("A submission is already in progress")]
    Busy,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_matches_user_prompt() {
        assert_eq!(
            ValidationError::EmptySource.to_string(),
            "Please enter some code before submitting."
        );
    }

    #[test]
    fn test_exhausted_lists_every_attempt() {
        let err = SubmissionError::Exhausted {
            attempts: vec![
                AttemptFailure {
                    encoding: EncodingStrategy::Json,
                    reason: "status 415".to_string(),
                },
                AttemptFailure {
                    encoding: EncodingStrategy::PlainText,
                    reason: "status 502".to_string(),
                },
            ],
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Submission failed"));
        assert!(msg.contains("status 415 (application/json)"));
        assert!(msg.contains("status 502 (text/plain;charset=UTF-8)"));
    }

    #[test]
    fn test_controller_error_is_transparent() {
        let err: ControllerError = SubmissionError::MissingId.into();
        assert_eq!(err.to_string(), "Judge did not return a submission id.");
    }
}
