//! Submission lifecycle controller
//!
//! Drives one submission at a time through
//! `Idle -> Validating -> Submitting -> Polling -> Aggregating -> Presented`,
//! dropping to `Failed` on any error. While a submission is in flight the
//! submit affordance stays disabled and further submits are refused.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::client::JudgeApi;
use crate::error::ControllerError;
use crate::poller::{PollOptions, ResultPoller};
use crate::scoring::{aggregate, AggregateScore};
use crate::status::{StatusSink, StatusUpdate};
use crate::types::{Language, Submission};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControllerState {
    Idle,
    Validating,
    Submitting,
    Polling,
    Aggregating,
    Presented,
    Failed,
}

impl ControllerState {
    /// True while a submission owns the controller
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            ControllerState::Validating
                | ControllerState::Submitting
                | ControllerState::Polling
                | ControllerState::Aggregating
        )
    }
}

impl fmt::Display for ControllerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

pub struct SubmissionController {
    api: Arc<dyn JudgeApi>,
    sink: Arc<dyn StatusSink>,
    options: PollOptions,
    state: Mutex<ControllerState>,
}

/// Releases the controller when a submission ends, including when the
/// submitting future is dropped part way.
struct InFlight<'a> {
    state: &'a Mutex<ControllerState>,
    sink: &'a dyn StatusSink,
    submit_disabled: bool,
}

impl InFlight<'_> {
    fn disable_submit(&mut self) {
        self.submit_disabled = true;
        self.sink.update(&StatusUpdate::SubmitEnabled(false));
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        {
            let mut state = self.state.lock();
            if state.is_busy() {
                let from = *state;
                debug!(from = %from, "Submission abandoned");
                *state = ControllerState::Failed;
            }
        }
        if self.submit_disabled {
            self.sink.update(&StatusUpdate::SubmitEnabled(true));
        }
    }
}

impl SubmissionController {
    pub fn new(api: Arc<dyn JudgeApi>, sink: Arc<dyn StatusSink>, options: PollOptions) -> Self {
        Self {
            api,
            sink,
            options,
            state: Mutex::new(ControllerState::Idle),
        }
    }

    pub fn state(&self) -> ControllerState {
        *self.state.lock()
    }

    fn transition(&self, to: ControllerState) {
        let mut state = self.state.lock();
        let from = *state;
        debug!(from = %from, to = %to, "Controller transition");
        *state = to;
    }

    /// Claim the controller for a new submission
    fn begin(&self) -> Result<InFlight<'_>, ControllerError> {
        let mut state = self.state.lock();
        if state.is_busy() {
            return Err(ControllerError::Busy);
        }
        let from = *state;
        debug!(from = %from, to = %ControllerState::Validating, "Controller transition");
        *state = ControllerState::Validating;
        Ok(InFlight {
            state: &self.state,
            sink: self.sink.as_ref(),
            submit_disabled: false,
        })
    }

    fn fail(&self, err: ControllerError) -> ControllerError {
        self.transition(ControllerState::Failed);
        let update = match &err {
            ControllerError::Validation(e) => StatusUpdate::Rejected(e.to_string()),
            other => StatusUpdate::Failed(other.to_string()),
        };
        self.sink.update(&update);
        err
    }

    /// Validate, submit, poll and score one solution.
    ///
    /// Polling only ends early when `cancel` fires or the configured
    /// deadline passes.
    pub async fn submit(
        &self,
        problem_id: &str,
        language: Language,
        source_code: &str,
        cancel: &CancellationToken,
    ) -> Result<AggregateScore, ControllerError> {
        let mut in_flight = self.begin()?;

        let submission = match Submission::new(problem_id, language, source_code) {
            Ok(submission) => submission,
            Err(e) => return Err(self.fail(e.into())),
        };

        self.transition(ControllerState::Submitting);
        in_flight.disable_submit();
        self.sink.update(&StatusUpdate::Submitting);

        let handle = match self.api.submit(&submission).await {
            Ok(handle) => handle,
            Err(e) => return Err(self.fail(e.into())),
        };
        info!(sid = %handle, problem = submission.problem_id(), lang = %language, "Submitted");
        self.sink.update(&StatusUpdate::Received(handle.clone()));

        self.transition(ControllerState::Polling);
        let poller = ResultPoller::new(self.api.as_ref(), self.sink.as_ref(), self.options);
        let payload = match poller.poll(&handle, cancel).await {
            Ok(payload) => payload,
            Err(e) => return Err(self.fail(e.into())),
        };

        self.transition(ControllerState::Aggregating);
        let score = aggregate(&payload.cases);

        self.transition(ControllerState::Presented);
        self.sink.present(&score);

        drop(in_flight);
        Ok(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PollError, SubmissionError, ValidationError};
    use crate::poller::testing::{done, pending, ScriptedJudge, Step};
    use crate::status::testing::RecordingSink;
    use crate::types::{CaseResult, SubmissionHandle};
    use std::time::Duration;

    fn case(ok: bool, msg: &str) -> CaseResult {
        CaseResult {
            ok,
            message: Some(msg.to_string()),
            ..Default::default()
        }
    }

    fn controller(judge: Arc<ScriptedJudge>, sink: Arc<RecordingSink>) -> SubmissionController {
        SubmissionController::new(
            judge,
            sink,
            PollOptions::default().with_interval(Duration::from_millis(5)),
        )
    }

    #[tokio::test]
    async fn test_full_lifecycle() {
        let judge = Arc::new(ScriptedJudge::new(
            "abc",
            vec![
                pending(),
                done(vec![case(true, "Score: 100"), case(true, "Score: 50")]),
            ],
        ));
        let sink = Arc::new(RecordingSink::default());
        let ctl = controller(judge.clone(), sink.clone());
        assert_eq!(ctl.state(), ControllerState::Idle);

        let score = ctl
            .submit("ahc001", Language::Cpp, "int main(){}", &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(score.total, 150.0);
        assert_eq!(ctl.state(), ControllerState::Presented);
        assert_eq!(judge.submits.lock()[0].source_code(), "int main(){}");
        assert_eq!(
            sink.updates(),
            vec![
                StatusUpdate::SubmitEnabled(false),
                StatusUpdate::Submitting,
                StatusUpdate::Received(SubmissionHandle::new("abc")),
                StatusUpdate::Queued { attempt: 1 },
                StatusUpdate::SubmitEnabled(true),
            ]
        );
        assert_eq!(sink.presented.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_case_zeroes_total() {
        let judge = Arc::new(ScriptedJudge::new(
            "abc",
            vec![done(vec![case(true, "Score: 100"), case(false, "Score: 50")])],
        ));
        let sink = Arc::new(RecordingSink::default());
        let ctl = controller(judge, sink);

        let score = ctl
            .submit("ahc001", Language::Cpp, "int main(){}", &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(score.total, 0.0);
        assert!(score.any_failed);
    }

    #[tokio::test]
    async fn test_empty_source_never_reaches_judge() {
        let judge = Arc::new(ScriptedJudge::new("abc", vec![done(vec![])]));
        let sink = Arc::new(RecordingSink::default());
        let ctl = controller(judge.clone(), sink.clone());

        let err = ctl
            .submit("ahc001", Language::Python, "   \n", &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ControllerError::Validation(ValidationError::EmptySource)
        ));
        assert_eq!(ctl.state(), ControllerState::Failed);
        assert!(judge.submits.lock().is_empty());
        assert_eq!(judge.fetch_count(), 0);
        assert_eq!(
            sink.updates(),
            vec![StatusUpdate::Rejected(
                "Please enter some code before submitting.".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn test_submission_error_reenables_submit() {
        let judge = Arc::new(ScriptedJudge::failing_submit(SubmissionError::MissingId));
        let sink = Arc::new(RecordingSink::default());
        let ctl = controller(judge.clone(), sink.clone());

        let err = ctl
            .submit("ahc001", Language::Java, "class Main {}", &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ControllerError::Submission(SubmissionError::MissingId)
        ));
        assert_eq!(ctl.state(), ControllerState::Failed);
        assert_eq!(judge.fetch_count(), 0);
        assert_eq!(
            sink.updates(),
            vec![
                StatusUpdate::SubmitEnabled(false),
                StatusUpdate::Submitting,
                StatusUpdate::Failed("Judge did not return a submission id.".to_string()),
                StatusUpdate::SubmitEnabled(true),
            ]
        );
    }

    #[tokio::test]
    async fn test_second_submit_refused_while_polling() {
        let judge = Arc::new(ScriptedJudge::new("abc", vec![Step::Error]));
        let sink = Arc::new(RecordingSink::default());
        let ctl = Arc::new(controller(judge, sink));
        let cancel = CancellationToken::new();

        let first = {
            let ctl = ctl.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move {
                ctl.submit("ahc001", Language::Cpp, "int main(){}", &cancel)
                    .await
            })
        };

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(ctl.state(), ControllerState::Polling);

        let second = ctl
            .submit("ahc001", Language::Cpp, "int main(){}", &CancellationToken::new())
            .await;
        assert!(matches!(second, Err(ControllerError::Busy)));

        cancel.cancel();
        let first = first.await.unwrap();
        assert!(matches!(
            first,
            Err(ControllerError::Poll(PollError::Cancelled { .. }))
        ));
        assert_eq!(ctl.state(), ControllerState::Failed);
    }

    #[tokio::test]
    async fn test_retry_after_failure() {
        let judge = Arc::new(ScriptedJudge::new("abc", vec![done(vec![case(true, "7")])]));
        let sink = Arc::new(RecordingSink::default());
        let ctl = controller(judge, sink);

        assert!(ctl
            .submit("ahc001", Language::Cpp, "", &CancellationToken::new())
            .await
            .is_err());
        assert_eq!(ctl.state(), ControllerState::Failed);

        let score = ctl
            .submit("ahc001", Language::Cpp, "int main(){}", &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(score.total, 7.0);
        assert_eq!(ctl.state(), ControllerState::Presented);
    }

    #[tokio::test]
    async fn test_dropped_submission_releases_controller() {
        let judge = Arc::new(ScriptedJudge::new("abc", vec![pending()]));
        let sink = Arc::new(RecordingSink::default());
        let ctl = controller(judge, sink.clone());

        let result = tokio::time::timeout(
            Duration::from_millis(30),
            ctl.submit("ahc001", Language::Cpp, "int main(){}", &CancellationToken::new()),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(ctl.state(), ControllerState::Failed);
        assert_eq!(
            sink.updates().last(),
            Some(&StatusUpdate::SubmitEnabled(true))
        );
    }

    #[test]
    fn test_busy_states() {
        assert!(!ControllerState::Idle.is_busy());
        assert!(ControllerState::Polling.is_busy());
        assert!(!ControllerState::Presented.is_busy());
        assert!(!ControllerState::Failed.is_busy());
    }
}
