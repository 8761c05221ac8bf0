//! Result polling loop
//!
//! Queries the judge until it reports `done`. Every failure is treated as
//! "not ready yet": the loop never gives up on its own. Callers bound it
//! with a cancellation token and, optionally, a deadline.

use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::client::JudgeApi;
use crate::error::PollError;
use crate::status::{StatusSink, StatusUpdate};
use crate::types::{ResultPayload, SubmissionHandle};

/// Fixed delay between result queries
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOptions {
    pub interval: Duration,
    /// Unbounded when `None`
    pub deadline: Option<Duration>,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            deadline: None,
        }
    }
}

impl PollOptions {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

pub struct ResultPoller<'a> {
    api: &'a dyn JudgeApi,
    sink: &'a dyn StatusSink,
    options: PollOptions,
}

impl<'a> ResultPoller<'a> {
    pub fn new(api: &'a dyn JudgeApi, sink: &'a dyn StatusSink, options: PollOptions) -> Self {
        Self { api, sink, options }
    }

    /// Poll until the judge reports `done`, the token is cancelled or the
    /// deadline passes.
    pub async fn poll(
        &self,
        handle: &SubmissionHandle,
        cancel: &CancellationToken,
    ) -> Result<ResultPayload, PollError> {
        let started = Instant::now();
        let deadline = self.options.deadline.map(|d| started + d);
        let mut attempt: u64 = 0;

        loop {
            attempt += 1;

            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    return Err(PollError::Cancelled { attempts: attempt - 1 });
                }
                _ = wait_until(deadline) => {
                    return Err(PollError::DeadlineExceeded {
                        attempts: attempt - 1,
                        elapsed: started.elapsed(),
                    });
                }
                outcome = self.api.fetch_result(handle) => outcome,
            };

            match outcome {
                Ok(payload) if payload.is_done() => {
                    info!(sid = %handle, attempt, cases = payload.cases.len(), "Judging finished");
                    return Ok(payload);
                }
                Ok(payload) => {
                    debug!(sid = %handle, attempt, status = ?payload.status, "Result pending");
                    self.sink.update(&StatusUpdate::Queued { attempt });
                }
                Err(e) => {
                    warn!(sid = %handle, attempt, error = %e, "Result query failed, retrying");
                    self.sink.update(&StatusUpdate::Judging);
                }
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    return Err(PollError::Cancelled { attempts: attempt });
                }
                _ = wait_until(deadline) => {
                    return Err(PollError::DeadlineExceeded {
                        attempts: attempt,
                        elapsed: started.elapsed(),
                    });
                }
                _ = tokio::time::sleep(self.options.interval) => {}
            }
        }
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}
