//! Collaborator trait definitions for the document store and the AI
//! question/feedback generator.
//!
//! These async traits are implemented by the `mockmate-store` and
//! `mockmate-generator` crates respectively.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{GenerationError, StoreError};
use crate::model::{
    Answer, Attempt, Difficulty, Interview, Question, QUESTIONS_PER_ATTEMPT,
};

// ---------------------------------------------------------------------------
// Document store trait
// ---------------------------------------------------------------------------

/// Trait for the document store backing interviews, attempts, questions,
/// and answers.
///
/// Path semantics follow
/// `interviews/{interview_id}/attempts/{attempt_id}/answers/{question_index}`;
/// deleting an interview cascades to everything underneath it.
#[async_trait]
pub trait InterviewStore: Send + Sync {
    /// Create or replace an interview document.
    async fn put_interview(&self, interview: &Interview) -> Result<(), StoreError>;

    async fn get_interview(&self, interview_id: &str) -> Result<Option<Interview>, StoreError>;

    /// All interviews owned by a user, newest first.
    async fn list_interviews(&self, owner_user_id: &str) -> Result<Vec<Interview>, StoreError>;

    /// Delete an interview and all attempts, questions, and answers under it.
    async fn delete_interview(&self, interview_id: &str) -> Result<(), StoreError>;

    /// Create or replace an attempt document under its interview.
    async fn put_attempt(&self, attempt: &Attempt) -> Result<(), StoreError>;

    async fn get_attempt(
        &self,
        interview_id: &str,
        attempt_id: &str,
    ) -> Result<Option<Attempt>, StoreError>;

    /// All attempts under an interview, in no particular order.
    async fn list_attempts(&self, interview_id: &str) -> Result<Vec<Attempt>, StoreError>;

    async fn delete_attempt(&self, interview_id: &str, attempt_id: &str)
        -> Result<(), StoreError>;

    /// Conditionally transition an attempt from in-progress to completed,
    /// freezing its score and completion time.
    ///
    /// Returns `false` when the attempt was already completed (the stored
    /// score is left untouched). The check-and-update must be atomic with
    /// respect to other callers of this method.
    async fn finalize_attempt(
        &self,
        interview_id: &str,
        attempt_id: &str,
        score: f64,
        completed_at: DateTime<Utc>,
    ) -> Result<bool, StoreError>;

    /// Replace the question set stored under an attempt.
    async fn put_questions(
        &self,
        interview_id: &str,
        attempt_id: &str,
        questions: &[Question],
    ) -> Result<(), StoreError>;

    /// Questions stored under an attempt, ordered by index.
    async fn list_questions(
        &self,
        interview_id: &str,
        attempt_id: &str,
    ) -> Result<Vec<Question>, StoreError>;

    /// Create or replace the answer for one question of an attempt.
    async fn put_answer(
        &self,
        interview_id: &str,
        attempt_id: &str,
        answer: &Answer,
    ) -> Result<(), StoreError>;

    /// Answers recorded under an attempt, ordered by question index.
    async fn list_answers(
        &self,
        interview_id: &str,
        attempt_id: &str,
    ) -> Result<Vec<Answer>, StoreError>;

    /// Attach AI feedback to an already-recorded answer.
    async fn set_answer_feedback(
        &self,
        interview_id: &str,
        attempt_id: &str,
        question_index: u32,
        feedback: &str,
    ) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// Question/feedback generator trait
// ---------------------------------------------------------------------------

/// Trait for AI backends that generate interview questions and per-answer
/// feedback.
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    /// Human-readable generator name (e.g. "gemini").
    fn name(&self) -> &str;

    /// Generate a question set for an interview profile.
    ///
    /// Implementations must yield exactly `request.count` questions:
    /// surplus questions are truncated, a shortfall is an
    /// [`GenerationError::InvalidResponse`].
    async fn generate_questions(
        &self,
        request: &QuestionRequest,
    ) -> Result<Vec<Question>, GenerationError>;

    /// Generate a free-text critique of one answer.
    async fn generate_feedback(
        &self,
        request: &FeedbackRequest,
    ) -> Result<String, GenerationError>;
}

/// Request to generate a question set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRequest {
    pub role: String,
    pub experience_years: u32,
    /// Free-text tech stack description.
    pub description: String,
    pub difficulty: Difficulty,
    /// Number of questions to generate.
    pub count: u32,
}

impl QuestionRequest {
    /// Build the standard request for an interview's question set.
    pub fn for_interview(interview: &Interview) -> Self {
        Self {
            role: interview.role.clone(),
            experience_years: interview.experience_years,
            description: interview.description.clone(),
            difficulty: interview.difficulty,
            count: QUESTIONS_PER_ATTEMPT,
        }
    }
}

/// Request to generate feedback for one recorded answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRequest {
    pub question: String,
    pub user_answer: String,
    pub expected_answer: String,
}
