//! Attempt lifecycle management.
//!
//! Owns the `in-progress → completed` state machine for interview attempts:
//! at most one in-progress attempt per interview, aggregate re-scoring on
//! completion, completed-only history.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::error::InterviewError;
use crate::model::{Attempt, AttemptStatus, UserContext, QUESTIONS_PER_ATTEMPT};
use crate::scoring::score_answer;
use crate::traits::InterviewStore;

/// Manages attempt state transitions against the document store.
pub struct AttemptManager {
    store: Arc<dyn InterviewStore>,
}

impl AttemptManager {
    pub fn new(store: Arc<dyn InterviewStore>) -> Self {
        Self { store }
    }

    /// Start a new attempt for an interview.
    ///
    /// Any attempt still in progress for this interview is deleted first:
    /// starting over implicitly abandons a stale attempt, and no
    /// partial-attempt recovery is offered.
    pub async fn create_attempt(
        &self,
        interview_id: &str,
        user: Option<&UserContext>,
    ) -> Result<String, InterviewError> {
        let user = user.ok_or(InterviewError::NotAuthenticated)?;
        if self.store.get_interview(interview_id).await?.is_none() {
            return Err(InterviewError::not_found("interview", interview_id));
        }

        self.cleanup_incomplete_attempts(interview_id).await?;

        let attempt = Attempt {
            id: Uuid::new_v4().to_string(),
            interview_id: interview_id.to_string(),
            user_id: user.user_id.clone(),
            status: AttemptStatus::InProgress,
            started_at: Utc::now(),
            completed_at: None,
            score: 0.0,
            total_questions: QUESTIONS_PER_ATTEMPT,
        };
        self.store.put_attempt(&attempt).await?;
        tracing::debug!(interview_id, attempt_id = %attempt.id, "created attempt");
        Ok(attempt.id)
    }

    async fn cleanup_incomplete_attempts(&self, interview_id: &str) -> Result<(), InterviewError> {
        let attempts = self.store.list_attempts(interview_id).await?;
        for stale in attempts.iter().filter(|a| a.is_in_progress()) {
            tracing::debug!(
                interview_id,
                attempt_id = %stale.id,
                "discarding stale in-progress attempt"
            );
            self.store.delete_attempt(interview_id, &stale.id).await?;
        }
        Ok(())
    }

    /// Whether the interview has an attempt still in progress. Read-only.
    pub async fn has_incomplete_attempt(
        &self,
        interview_id: &str,
    ) -> Result<bool, InterviewError> {
        let attempts = self.store.list_attempts(interview_id).await?;
        Ok(attempts.iter().any(|a| a.is_in_progress()))
    }

    /// Finalize an attempt: re-score every recorded answer, average, and
    /// freeze the result on the attempt.
    ///
    /// Stored per-answer scores are never trusted; completion always
    /// recomputes from the answer text. An attempt with no answers
    /// completes with score 0. Completing an already-completed attempt
    /// returns its frozen score unchanged.
    pub async fn complete_attempt(
        &self,
        interview_id: &str,
        attempt_id: &str,
    ) -> Result<f64, InterviewError> {
        if self
            .store
            .get_attempt(interview_id, attempt_id)
            .await?
            .is_none()
        {
            return Err(InterviewError::not_found("attempt", attempt_id));
        }

        let answers = self.store.list_answers(interview_id, attempt_id).await?;
        let mut total = 0.0;
        let mut scored = 0u32;
        for answer in &answers {
            // Answers with no text don't count toward the average; an answer
            // whose question has no key points counts as a zero.
            if answer.user_answer.is_empty() {
                continue;
            }
            total += score_answer(&answer.user_answer, &answer.key_points);
            scored += 1;
        }
        let average = if scored > 0 { total / scored as f64 } else { 0.0 };

        let finalized = self
            .store
            .finalize_attempt(interview_id, attempt_id, average, Utc::now())
            .await?;
        if !finalized {
            tracing::warn!(
                interview_id,
                attempt_id,
                "attempt already completed, returning frozen score"
            );
            let frozen = self
                .store
                .get_attempt(interview_id, attempt_id)
                .await?
                .ok_or_else(|| InterviewError::not_found("attempt", attempt_id))?;
            return Ok(frozen.score);
        }

        tracing::debug!(interview_id, attempt_id, score = average, "attempt completed");
        Ok(average)
    }

    /// Completed attempts for an interview, most recent first. In-progress
    /// attempts are never returned.
    pub async fn get_attempts(&self, interview_id: &str) -> Result<Vec<Attempt>, InterviewError> {
        let mut attempts: Vec<Attempt> = self
            .store
            .list_attempts(interview_id)
            .await?
            .into_iter()
            .filter(|a| a.status == AttemptStatus::Completed)
            .collect();
        attempts.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        Ok(attempts)
    }
}
