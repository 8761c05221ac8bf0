//! Submission and verdict types exchanged with the judge service

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::ValidationError;

/// Source language accepted by the judge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    Cpp,
    Java,
}

impl Language {
    /// Wire name sent as `lang`
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Cpp => "cpp",
            Language::Java => "java",
        }
    }

    /// Guess the language from a source file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "py" => Some(Language::Python),
            "cpp" | "cc" | "cxx" | "c++" => Some(Language::Cpp),
            "java" => Some(Language::Java),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "python" | "python3" | "py" => Ok(Language::Python),
            "cpp" | "c++" | "cxx" => Ok(Language::Cpp),
            "java" => Ok(Language::Java),
            other => Err(format!(
                "Unknown language '{}' (expected one of: python, cpp, java)",
                other
            )),
        }
    }
}

/// A solution to be judged. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    problem_id: String,
    language: Language,
    source_code: String,
}

impl Submission {
    /// Build a submission from raw user input.
    ///
    /// The source is trimmed; a source that is empty after trimming is
    /// rejected without touching the network.
    pub fn new(
        problem_id: impl Into<String>,
        language: Language,
        source_code: &str,
    ) -> Result<Self, ValidationError> {
        let problem_id = problem_id.into();
        if problem_id.trim().is_empty() {
            return Err(ValidationError::EmptyProblemId);
        }
        let source_code = source_code.trim();
        if source_code.is_empty() {
            return Err(ValidationError::EmptySource);
        }
        Ok(Self {
            problem_id,
            language,
            source_code: source_code.to_string(),
        })
    }

    pub fn problem_id(&self) -> &str {
        &self.problem_id
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn source_code(&self) -> &str {
        &self.source_code
    }
}

/// Identifier of an in-flight judging job
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubmissionHandle {
    pub submission_id: String,
}

impl SubmissionHandle {
    pub fn new(submission_id: impl Into<String>) -> Self {
        Self {
            submission_id: submission_id.into(),
        }
    }
}

impl fmt::Display for SubmissionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.submission_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultStatus {
    #[default]
    Pending,
    Done,
    /// Any status the judge reports that we do not know; treated as pending
    #[serde(other)]
    Unknown,
}

impl ResultStatus {
    pub fn is_done(&self) -> bool {
        matches!(self, ResultStatus::Done)
    }
}

/// Judge response for `GET /result/{sid}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultPayload {
    #[serde(default)]
    pub status: ResultStatus,
    #[serde(default, deserialize_with = "lenient_cases")]
    pub cases: Vec<CaseResult>,
}

impl ResultPayload {
    pub fn is_done(&self) -> bool {
        self.status.is_done()
    }
}

/// Outcome of a single test case. Identity is positional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaseResult {
    #[serde(default, deserialize_with = "lenient_bool")]
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Wall time in nanoseconds
    #[serde(
        rename = "time",
        alias = "timeNanos",
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub time_nanos: Option<f64>,
    #[serde(
        rename = "memory",
        alias = "memoryBytes",
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub memory_bytes: Option<f64>,
    #[serde(
        rename = "msg",
        alias = "message",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub message: Option<String>,
}

/// Anything but an array reads as no cases; non-object entries read as
/// empty, failed cases.
fn lenient_cases<'de, D>(deserializer: D) -> Result<Vec<CaseResult>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::Array(items)) => items,
        _ => return Ok(Vec::new()),
    };
    items
        .into_iter()
        .map(|item| match item {
            serde_json::Value::Object(_) => {
                serde_json::from_value(item).map_err(serde::de::Error::custom)
            }
            _ => Ok(CaseResult::default()),
        })
        .collect()
}

/// Truthiness: null, false, zero, NaN and "" are false; everything else true
fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => false,
        Some(serde_json::Value::Bool(b)) => b,
        Some(serde_json::Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(serde_json::Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    })
}

// The judge is loose about field types; anything that is not a number
// renders as missing.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_f64()).filter(|n| n.is_finite()))
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}
