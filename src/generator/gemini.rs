use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::generator::story::{
    DailyProblem, FALLBACK_EXPLANATION, SourceError, StorySource, accept_explanation,
    parse_daily_problem,
};

const DAILY_PROBLEM_PROMPT: &str = "Generate a math word problem for a 10-year-old child in Rwanda. The problem should involve a simple calculation (addition, subtraction, multiplication, or division).";

const STORY_DESCRIPTION: &str = "A short, engaging story for a math word problem. The story should be set in Rwanda and be culturally relevant for a 10-year-old. It should contain numbers needed to solve the problem. Use Rwandan Francs (RWF) for currency if applicable.";
const QUESTION_DESCRIPTION: &str = "The specific question that can be answered using the numbers in the story. e.g., 'How many samosas can she buy in total?'";
const ANSWER_DESCRIPTION: &str = "The single numerical answer to the question.";

fn explanation_prompt(problem_statement: &str, wrong_answer: &str) -> String {
    format!(
        "The original math problem was: \"{problem_statement}\". A 10-year-old child answered \"{wrong_answer}\", which is incorrect. Please provide a simple, step-by-step explanation of how to solve the problem correctly. Be very encouraging and use simple language suitable for a child. Do not just give the answer, explain the thinking process."
    )
}

fn problem_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "story": { "type": "STRING", "description": STORY_DESCRIPTION },
            "question": { "type": "STRING", "description": QUESTION_DESCRIPTION },
            "answer": { "type": "INTEGER", "description": ANSWER_DESCRIPTION },
        },
        "required": ["story", "question", "answer"],
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateRequest {
    pub fn daily_problem() -> Self {
        Self {
            contents: vec![Content::prompt(DAILY_PROBLEM_PROMPT)],
            generation_config: GenerationConfig {
                temperature: 1.0,
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(problem_schema()),
            },
        }
    }

    pub fn explanation(problem_statement: &str, wrong_answer: &str) -> Self {
        Self {
            contents: vec![Content::prompt(&explanation_prompt(
                problem_statement,
                wrong_answer,
            ))],
            generation_config: GenerationConfig {
                temperature: 0.5,
                response_mime_type: None,
                response_schema: None,
            },
        }
    }
}

impl Content {
    fn prompt(text: &str) -> Self {
        Self {
            parts: vec![Part {
                text: Some(text.to_string()),
            }],
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateResponse {
    /// Text of the first candidate, all parts concatenated.
    pub fn text(&self) -> Result<String, SourceError> {
        let text: String = self
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect()
            })
            .unwrap_or_default();
        if text.is_empty() {
            Err(SourceError::EmptyResponse)
        } else {
            Ok(text)
        }
    }
}

/// Settings needed to reach the generative-language endpoint.
#[derive(Clone, Debug)]
pub struct GeminiSettings {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl GeminiSettings {
    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[cfg(feature = "network")]
pub struct GeminiSource {
    settings: GeminiSettings,
    client: reqwest::blocking::Client,
}

#[cfg(feature = "network")]
impl GeminiSource {
    pub fn new(settings: GeminiSettings) -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self { settings, client })
    }

    fn generate(&self, request: &GenerateRequest) -> Result<String, SourceError> {
        let response = self
            .client
            .post(self.settings.endpoint())
            .header("x-goog-api-key", &self.settings.api_key)
            .json(request)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| SourceError::Transport(e.to_string()))?;
        let body: GenerateResponse = response
            .json()
            .map_err(|e| SourceError::Transport(e.to_string()))?;
        body.text()
    }
}

#[cfg(feature = "network")]
impl StorySource for GeminiSource {
    fn fetch_daily_problem(&self) -> DailyProblem {
        let result = self
            .generate(&GenerateRequest::daily_problem())
            .and_then(|text| parse_daily_problem(&text));
        match result {
            Ok(problem) => {
                debug!(answer = problem.answer, "generated daily problem");
                problem
            }
            Err(err) => {
                warn!(error = %err, "daily problem generation failed, using fallback");
                DailyProblem::fallback()
            }
        }
    }

    fn explain(&self, problem_statement: &str, wrong_answer: &str) -> String {
        let request = GenerateRequest::explanation(problem_statement, wrong_answer);
        match self
            .generate(&request)
            .and_then(|text| accept_explanation(&text))
        {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, "explanation generation failed, using fallback");
                FALLBACK_EXPLANATION.to_string()
            }
        }
    }
}
