//! HTTP client for the judge service
//!
//! Two endpoints:
//! - `POST /submit` with `{pid, lang, code}`, answered by `{sid}`
//! - `GET /result/{sid}`, answered by `{status, cases}`
//!
//! The submit body is delivered under an ordered list of content types.
//! Some tunnelled deployments reject `application/json`, so the same body
//! is re-sent as plain text when the first attempt fails.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, Url};
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, warn};

use crate::config::JudgeConfig;
use crate::error::{AttemptFailure, SubmissionError, TransientPollError};
use crate::types::{ResultPayload, Submission, SubmissionHandle};

/// Header the tunnel host needs to skip its interstitial page
pub const SKIP_BROWSER_WARNING_HEADER: &str = "ngrok-skip-browser-warning";

/// Anything that can accept submissions and report results
#[async_trait]
pub trait JudgeApi: Send + Sync {
    async fn submit(&self, submission: &Submission) -> Result<SubmissionHandle, SubmissionError>;

    async fn fetch_result(
        &self,
        handle: &SubmissionHandle,
    ) -> Result<ResultPayload, TransientPollError>;
}

/// Content type under which the submit body is delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingStrategy {
    Json,
    PlainText,
}

impl EncodingStrategy {
    /// Default delivery order
    pub const DEFAULT_ORDER: [EncodingStrategy; 2] =
        [EncodingStrategy::Json, EncodingStrategy::PlainText];

    pub fn content_type(&self) -> &'static str {
        match self {
            EncodingStrategy::Json => "application/json",
            EncodingStrategy::PlainText => "text/plain;charset=UTF-8",
        }
    }
}

impl fmt::Display for EncodingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.content_type())
    }
}

#[derive(Serialize)]
struct SubmitRequest<'a> {
    pid: &'a str,
    lang: &'a str,
    code: &'a str,
}

/// reqwest-backed judge client
pub struct JudgeClient {
    client: Client,
    base_url: Url,
    strategies: Vec<EncodingStrategy>,
    skip_browser_warning: bool,
}

impl JudgeClient {
    pub fn new(config: &JudgeConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("Invalid judge URL: {}", config.base_url))?;
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            client,
            base_url,
            strategies: EncodingStrategy::DEFAULT_ORDER.to_vec(),
            skip_browser_warning: config.skip_browser_warning,
        })
    }

    /// Replace the ordered list of submit encodings
    pub fn with_strategies(mut self, strategies: Vec<EncodingStrategy>) -> Self {
        self.strategies = strategies;
        self
    }

    /// Append escaped path segments to the base URL
    fn endpoint(&self, segments: &[&str]) -> Result<Url, String> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| format!("{} cannot be a base URL", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn decorate(&self, request: RequestBuilder) -> RequestBuilder {
        if self.skip_browser_warning {
            request.header(SKIP_BROWSER_WARNING_HEADER, "true")
        } else {
            request
        }
    }

    /// One delivery attempt. Any transport error, non-2xx status or
    /// non-JSON body fails the attempt.
    async fn send_submit(
        &self,
        url: &Url,
        body: &str,
        encoding: EncodingStrategy,
    ) -> Result<serde_json::Value, String> {
        let request = self
            .client
            .post(url.clone())
            .header(CONTENT_TYPE, encoding.content_type())
            .body(body.to_string());
        let resp = self
            .decorate(request)
            .send()
            .await
            .map_err(|e| format!("request error: {}", e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(format!("status {}", status.as_u16()));
        }

        let text = resp
            .text()
            .await
            .map_err(|e| format!("failed to read body: {}", e))?;
        serde_json::from_str(&text).map_err(|e| format!("invalid JSON response: {}", e))
    }
}

/// Pull the submission id out of a submit response
fn parse_handle(response: &serde_json::Value) -> Result<SubmissionHandle, SubmissionError> {
    match response.get("sid") {
        Some(serde_json::Value::String(sid)) if !sid.is_empty() => Ok(SubmissionHandle::new(sid)),
        Some(serde_json::Value::Number(n)) if n.as_f64().is_some_and(|f| f != 0.0) => {
            Ok(SubmissionHandle::new(n.to_string()))
        }
        _ => Err(SubmissionError::MissingId),
    }
}

#[async_trait]
impl JudgeApi for JudgeClient {
    async fn submit(&self, submission: &Submission) -> Result<SubmissionHandle, SubmissionError> {
        if self.strategies.is_empty() {
            return Err(SubmissionError::NoStrategies);
        }

        let body = serde_json::to_string(&SubmitRequest {
            pid: submission.problem_id(),
            lang: submission.language().as_str(),
            code: submission.source_code(),
        })?;
        let url = self
            .endpoint(&["submit"])
            .map_err(SubmissionError::InvalidUrl)?;

        let mut failures = Vec::new();
        for &encoding in &self.strategies {
            match self.send_submit(&url, &body, encoding).await {
                Ok(response) => {
                    if !failures.is_empty() {
                        info!(encoding = %encoding, "Submission accepted after fallback");
                    }
                    let handle = parse_handle(&response)?;
                    debug!(sid = %handle, "Submission received");
                    return Ok(handle);
                }
                Err(reason) => {
                    warn!(encoding = %encoding, reason = %reason, "Submit attempt failed");
                    failures.push(AttemptFailure { encoding, reason });
                }
            }
        }

        Err(SubmissionError::Exhausted { attempts: failures })
    }

    async fn fetch_result(
        &self,
        handle: &SubmissionHandle,
    ) -> Result<ResultPayload, TransientPollError> {
        let url = self
            .endpoint(&["result", &handle.submission_id])
            .map_err(TransientPollError::InvalidUrl)?;
        let resp = self.decorate(self.client.get(url)).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(TransientPollError::Status(status));
        }

        let text = resp.text().await?;
        serde_json::from_str(&text).map_err(|e| TransientPollError::Decode(e.to_string()))
    }
}
