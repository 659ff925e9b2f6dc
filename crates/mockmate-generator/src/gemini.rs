//! Generative-language API implementation of the question generator.
//!
//! Questions are requested as structured JSON (`responseMimeType:
//! application/json`); if the model still wraps the array in prose or a
//! markdown fence, the parser falls back to slicing from the first `[` to
//! the last `]`. Feedback is requested as plain prose.

use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;

use mockmate_core::error::GenerationError;
use mockmate_core::model::Question;
use mockmate_core::traits::{FeedbackRequest, QuestionGenerator, QuestionRequest};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Question/feedback generator backed by the generative-language API.
pub struct GeminiGenerator {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiGenerator {
    pub fn new(api_key: &str, model: Option<String>, base_url: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("failed to build HTTP client");

        Self {
            api_key: api_key.to_string(),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            client,
        }
    }

    async fn generate_text(
        &self,
        prompt: &str,
        json_output: bool,
    ) -> Result<String, GenerationError> {
        let mut body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });
        if json_output {
            body["generationConfig"] = json!({ "responseMimeType": "application/json" });
        }

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let response = self
            .client
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout(DEFAULT_TIMEOUT_SECS)
                } else {
                    GenerationError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status == 401 || status == 403 {
            let message = response.text().await.unwrap_or_default();
            return Err(GenerationError::AuthenticationFailed(message));
        }
        if status >= 400 {
            let message = response.text().await.unwrap_or_default();
            return Err(GenerationError::ApiError { status, message });
        }

        let api_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::InvalidResponse(format!("failed to parse response: {e}")))?;

        api_response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| GenerationError::InvalidResponse("response has no candidates".into()))
    }
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[derive(Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
struct GeminiPart {
    text: String,
}

/// Question object as the model emits it.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuestion {
    question: String,
    expected_answer: String,
    #[serde(default = "default_max_score")]
    max_score: u32,
    #[serde(default)]
    key_points: Vec<String>,
}

fn default_max_score() -> u32 {
    10
}

#[async_trait]
impl QuestionGenerator for GeminiGenerator {
    fn name(&self) -> &str {
        "gemini"
    }

    #[instrument(skip(self, request), fields(role = %request.role, count = request.count))]
    async fn generate_questions(
        &self,
        request: &QuestionRequest,
    ) -> Result<Vec<Question>, GenerationError> {
        let start = Instant::now();
        let prompt = format!(
            "Generate {count} technical interview questions for a {role} position.\n\
             The candidate has {experience} years of experience.\n\
             Tech stack: {description}\n\
             Difficulty level: {difficulty}\n\n\
             Output must be a JSON array with objects containing:\n\
             - question: the interview question\n\
             - expectedAnswer: detailed expected answer for scoring\n\
             - maxScore: maximum score for this question (1-10)\n\
             - keyPoints: array of key points that should be mentioned for full score",
            count = request.count,
            role = request.role,
            experience = request.experience_years,
            description = request.description,
            difficulty = request.difficulty,
        );

        let text = self.generate_text(&prompt, true).await?;
        let raw = parse_question_array(&text)?;

        if (raw.len() as u32) < request.count {
            return Err(GenerationError::InvalidResponse(format!(
                "expected {} questions, got {}",
                request.count,
                raw.len()
            )));
        }

        let questions = raw
            .into_iter()
            .take(request.count as usize)
            .enumerate()
            .map(|(index, q)| Question {
                index: index as u32,
                question: q.question,
                expected_answer: q.expected_answer,
                max_score: q.max_score,
                key_points: q.key_points,
            })
            .collect();

        tracing::debug!(latency_ms = start.elapsed().as_millis() as u64, "questions generated");
        Ok(questions)
    }

    #[instrument(skip(self, request))]
    async fn generate_feedback(
        &self,
        request: &FeedbackRequest,
    ) -> Result<String, GenerationError> {
        let prompt = format!(
            "As an AI interview assistant, provide constructive feedback for the \
             following interview question and answer:\n\n\
             Question: {question}\n\
             User's Answer: {user_answer}\n\
             Expected Answer: {expected_answer}\n\n\
             Please provide feedback in the following format:\n\
             1. Strengths: What aspects of the answer were good?\n\
             2. Areas for Improvement: What could be improved or added?\n\
             3. Overall Assessment: A brief overall assessment of the answer.\n\n\
             Keep the feedback concise, constructive, and encouraging.",
            question = request.question,
            user_answer = request.user_answer,
            expected_answer = request.expected_answer,
        );

        self.generate_text(&prompt, false).await
    }
}

/// Parse the model's output as a JSON array of questions.
fn parse_question_array(text: &str) -> Result<Vec<RawQuestion>, GenerationError> {
    if let Ok(raw) = serde_json::from_str::<Vec<RawQuestion>>(text) {
        return Ok(raw);
    }
    // The JSON mime type usually yields a clean array, but some responses
    // still arrive wrapped in prose or a markdown fence.
    let start = text.find('[');
    let end = text.rfind(']');
    if let (Some(start), Some(end)) = (start, end) {
        if start < end {
            return serde_json::from_str(&text[start..=end]).map_err(|e| {
                GenerationError::InvalidResponse(format!("malformed question array: {e}"))
            });
        }
    }
    Err(GenerationError::InvalidResponse(
        "no JSON array in response".into(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockmate_core::model::Difficulty;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn generator(server: &MockServer) -> GeminiGenerator {
        GeminiGenerator::new("test-key", None, Some(server.uri()))
    }

    fn question_request() -> QuestionRequest {
        QuestionRequest {
            role: "Backend Engineer".into(),
            experience_years: 4,
            description: "Rust, Tokio".into(),
            difficulty: Difficulty::Intermediate,
            count: 2,
        }
    }

    fn candidate_response(text: &str) -> serde_json::Value {
        json!({
            "candidates": [{
                "content": { "parts": [{ "text": text }], "role": "model" },
                "finishReason": "STOP"
            }]
        })
    }

    fn two_questions_json() -> String {
        json!([
            {
                "question": "Explain ownership in Rust.",
                "expectedAnswer": "Each value has a single owner...",
                "maxScore": 10,
                "keyPoints": ["ownership", "borrowing", "move semantics"]
            },
            {
                "question": "What does async/await do?",
                "expectedAnswer": "Suspends execution until the future resolves...",
                "maxScore": 8,
                "keyPoints": ["futures", "executor"]
            }
        ])
        .to_string()
    }

    #[tokio::test]
    async fn generates_and_indexes_questions() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
            .and(query_param("key", "test-key"))
            .and(body_partial_json(json!({
                "generationConfig": { "responseMimeType": "application/json" }
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(candidate_response(&two_questions_json())),
            )
            .mount(&server)
            .await;

        let questions = generator(&server)
            .generate_questions(&question_request())
            .await
            .unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].index, 0);
        assert_eq!(questions[1].index, 1);
        assert_eq!(questions[0].key_points.len(), 3);
        assert_eq!(questions[1].max_score, 8);
    }

    #[tokio::test]
    async fn falls_back_to_slicing_wrapped_json() {
        let server = MockServer::start().await;
        let wrapped = format!("Here are your questions:\n```json\n{}\n```", two_questions_json());
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate_response(&wrapped)))
            .mount(&server)
            .await;

        let questions = generator(&server)
            .generate_questions(&question_request())
            .await
            .unwrap();
        assert_eq!(questions.len(), 2);
    }

    #[tokio::test]
    async fn surplus_questions_are_truncated() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(candidate_response(&two_questions_json())),
            )
            .mount(&server)
            .await;

        let mut request = question_request();
        request.count = 1;
        let questions = generator(&server)
            .generate_questions(&request)
            .await
            .unwrap();
        assert_eq!(questions.len(), 1);
    }

    #[tokio::test]
    async fn shortfall_is_an_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(candidate_response(&two_questions_json())),
            )
            .mount(&server)
            .await;

        let mut request = question_request();
        request.count = 5;
        let err = generator(&server)
            .generate_questions(&request)
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::InvalidResponse(_)));
        assert!(err.to_string().contains("expected 5 questions, got 2"));
    }

    #[tokio::test]
    async fn feedback_returns_candidate_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate_response(
                "1. Strengths: clear definition.\n2. Areas for Improvement: add examples.",
            )))
            .mount(&server)
            .await;

        let feedback = generator(&server)
            .generate_feedback(&FeedbackRequest {
                question: "Explain closures".into(),
                user_answer: "Functions that capture scope".into(),
                expected_answer: "Functions capturing their environment".into(),
            })
            .await
            .unwrap();
        assert!(feedback.contains("Strengths"));
    }

    #[tokio::test]
    async fn invalid_key_is_authentication_failed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
            .mount(&server)
            .await;

        let err = generator(&server)
            .generate_questions(&question_request())
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::AuthenticationFailed(_)));
    }

    #[test]
    fn parse_question_array_rejects_proseless_garbage() {
        let err = parse_question_array("no array here").unwrap_err();
        assert!(matches!(err, GenerationError::InvalidResponse(_)));
    }
}
