//! Judge client
//!
//! Submits a solution to a remote judge service, polls until the verdict
//! is ready and scores the per-case results.
//!
//! ## Module Structure
//!
//! - `types`: Submission, handle and verdict payload types
//! - `error`: Error taxonomy for each lifecycle stage
//! - `config`: Client configuration (TOML + defaults)
//! - `client`: HTTP client with ordered content-type fallback
//! - `poller`: Cancellable result polling loop
//! - `scoring`: Per-case value extraction and total aggregation
//! - `status`: User-facing status messages and presentation seam
//! - `controller`: Submission lifecycle state machine
//! - `report`: Plain-text formatting of scored cases

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod poller;
pub mod report;
pub mod scoring;
pub mod status;
pub mod types;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use client::{EncodingStrategy, JudgeApi, JudgeClient};
pub use config::JudgeConfig;
pub use controller::{ControllerState, SubmissionController};
pub use error::{
    ConfigError, ControllerError, PollError, SubmissionError, TransientPollError,
    ValidationError,
};
pub use poller::{PollOptions, ResultPoller};
pub use scoring::{aggregate, extract_value, AggregateScore, ScoredCase};
pub use status::{StatusSink, StatusUpdate, TracingSink};
pub use types::{CaseResult, Language, ResultPayload, ResultStatus, Submission, SubmissionHandle};

// Re-exported so callers do not need a direct tokio-util dependency
pub use tokio_util::sync::CancellationToken;
