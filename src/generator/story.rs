use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub const FALLBACK_STORY: &str = "An API error occurred. Let's try a default problem. A farmer has 5 cows, and each cow gives 3 liters of milk every day.";
pub const FALLBACK_QUESTION: &str = "How many liters of milk does the farmer get in one day?";
pub const FALLBACK_ANSWER: i64 = 15;

pub const FALLBACK_EXPLANATION: &str = "I'm sorry, I had trouble thinking of an explanation. Let's try breaking the problem down. What are the key numbers in the story?";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyProblem {
    pub story: String,
    pub question: String,
    pub answer: i64,
}

impl DailyProblem {
    pub fn fallback() -> Self {
        Self {
            story: FALLBACK_STORY.to_string(),
            question: FALLBACK_QUESTION.to_string(),
            answer: FALLBACK_ANSWER,
        }
    }

    /// Story and question joined, as sent back when asking for a hint.
    pub fn statement(&self) -> String {
        format!("{} {}", self.story, self.question)
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("response carried no text")]
    EmptyResponse,
    #[error("response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed problem: {0}")]
    Malformed(&'static str),
}

/// Supplier of story problems and hints.
///
/// Implementations never fail: any internal error is swallowed and replaced
/// with [`DailyProblem::fallback`] or [`FALLBACK_EXPLANATION`].
pub trait StorySource: Send + Sync {
    fn fetch_daily_problem(&self) -> DailyProblem;
    fn explain(&self, problem_statement: &str, wrong_answer: &str) -> String;
}

/// Source used when the network is disabled. Always serves the fallbacks.
pub struct OfflineSource;

impl StorySource for OfflineSource {
    fn fetch_daily_problem(&self) -> DailyProblem {
        DailyProblem::fallback()
    }

    fn explain(&self, _problem_statement: &str, _wrong_answer: &str) -> String {
        FALLBACK_EXPLANATION.to_string()
    }
}

/// Parse and validate a generated problem. `story` and `question` must be
/// strings and `answer` a whole number.
pub fn parse_daily_problem(text: &str) -> Result<DailyProblem, SourceError> {
    let value: Value = serde_json::from_str(text.trim())?;
    let story = value
        .get("story")
        .and_then(Value::as_str)
        .ok_or(SourceError::Malformed("story is not a string"))?;
    let question = value
        .get("question")
        .and_then(Value::as_str)
        .ok_or(SourceError::Malformed("question is not a string"))?;
    let answer = value
        .get("answer")
        .and_then(whole_number)
        .ok_or(SourceError::Malformed("answer is not a whole number"))?;

    Ok(DailyProblem {
        story: story.to_string(),
        question: question.to_string(),
        answer,
    })
}

fn whole_number(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    let f = value.as_f64()?;
    if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// Any non-blank explanation is accepted as-is.
pub fn accept_explanation(text: &str) -> Result<String, SourceError> {
    if text.trim().is_empty() {
        Err(SourceError::EmptyResponse)
    } else {
        Ok(text.to_string())
    }
}
