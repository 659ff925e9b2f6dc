//! Canned generator for tests and offline use.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use async_trait::async_trait;

use mockmate_core::error::GenerationError;
use mockmate_core::model::Question;
use mockmate_core::traits::{FeedbackRequest, QuestionGenerator, QuestionRequest};

/// Generator that returns a fixed question bank and fixed feedback.
///
/// Tracks how many times it was called and can be flipped into a failing
/// mode to exercise error paths.
pub struct MockGenerator {
    questions: Vec<Question>,
    feedback: String,
    call_count: AtomicU32,
    fail: AtomicBool,
}

fn default_questions() -> Vec<Question> {
    let bank = [
        (
            "Explain the difference between REST and GraphQL APIs.",
            "REST exposes fixed resource endpoints while GraphQL exposes a single endpoint with a typed query language.",
            vec!["REST API", "endpoints", "query language", "over-fetching"],
        ),
        (
            "What are closures and how does variable capture work?",
            "A closure is a function that captures variables from its enclosing scope.",
            vec!["closures", "scope", "capture"],
        ),
        (
            "Describe how you would design a caching layer for a read-heavy service.",
            "Use a cache-aside pattern with TTL-based invalidation and a shared cache such as Redis.",
            vec!["cache", "invalidation", "TTL"],
        ),
        (
            "How do database transactions provide consistency?",
            "Transactions group operations atomically and isolate concurrent writers.",
            vec!["transactions", "atomicity", "isolation"],
        ),
        (
            "What is dependency injection and why is it useful for testing?",
            "Dependencies are passed in rather than constructed internally, so tests can substitute fakes.",
            vec!["dependency injection", "testing", "coupling"],
        ),
    ];

    bank.iter()
        .enumerate()
        .map(|(index, (question, expected, key_points))| Question {
            index: index as u32,
            question: (*question).to_string(),
            expected_answer: (*expected).to_string(),
            max_score: 10,
            key_points: key_points.iter().map(|s| s.to_string()).collect(),
        })
        .collect()
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::with_questions(default_questions())
    }

    pub fn with_questions(questions: Vec<Question>) -> Self {
        Self {
            questions,
            feedback: "1. Strengths: solid grasp of the fundamentals.\n\
                       2. Areas for Improvement: add a concrete example.\n\
                       3. Overall Assessment: a good answer overall."
                .to_string(),
            call_count: AtomicU32::new(0),
            fail: AtomicBool::new(false),
        }
    }

    pub fn with_feedback(feedback: &str) -> Self {
        let mut generator = Self::new();
        generator.feedback = feedback.to_string();
        generator
    }

    /// Generator whose every call fails with a 500 API error.
    pub fn failing() -> Self {
        let generator = Self::new();
        generator.fail.store(true, Ordering::SeqCst);
        generator
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }

    fn check_fail(&self) -> Result<(), GenerationError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(GenerationError::ApiError {
                status: 500,
                message: "mock generator is in failing mode".into(),
            });
        }
        Ok(())
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuestionGenerator for MockGenerator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate_questions(
        &self,
        request: &QuestionRequest,
    ) -> Result<Vec<Question>, GenerationError> {
        self.check_fail()?;
        if (self.questions.len() as u32) < request.count {
            return Err(GenerationError::InvalidResponse(format!(
                "expected {} questions, got {}",
                request.count,
                self.questions.len()
            )));
        }
        Ok(self
            .questions
            .iter()
            .take(request.count as usize)
            .cloned()
            .collect())
    }

    async fn generate_feedback(
        &self,
        _request: &FeedbackRequest,
    ) -> Result<String, GenerationError> {
        self.check_fail()?;
        Ok(self.feedback.clone())
    }
}
