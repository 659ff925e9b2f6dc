//! Interview session orchestration.
//!
//! Ties the document store, the AI generator, and the attempt lifecycle
//! together: interview CRUD with ownership checks, question generation at
//! attempt start, answer recording, and lazily generated per-answer
//! feedback.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::error::InterviewError;
use crate::lifecycle::AttemptManager;
use crate::model::{
    Answer, Attempt, Interview, NewInterview, Question, UserContext, QUESTIONS_PER_ATTEMPT,
};
use crate::scoring::score_answer;
use crate::traits::{FeedbackRequest, InterviewStore, QuestionGenerator, QuestionRequest};

/// A freshly started attempt together with its generated question set.
#[derive(Debug, Clone)]
pub struct StartedAttempt {
    pub attempt_id: String,
    pub questions: Vec<Question>,
}

/// The central interview session engine.
pub struct InterviewEngine {
    store: Arc<dyn InterviewStore>,
    generator: Arc<dyn QuestionGenerator>,
    attempts: AttemptManager,
}

impl InterviewEngine {
    pub fn new(store: Arc<dyn InterviewStore>, generator: Arc<dyn QuestionGenerator>) -> Self {
        let attempts = AttemptManager::new(Arc::clone(&store));
        Self {
            store,
            generator,
            attempts,
        }
    }

    /// The attempt lifecycle manager backing this engine.
    pub fn attempts(&self) -> &AttemptManager {
        &self.attempts
    }

    pub async fn create_interview(
        &self,
        new: NewInterview,
        user: Option<&UserContext>,
    ) -> Result<Interview, InterviewError> {
        let user = user.ok_or(InterviewError::NotAuthenticated)?;
        let interview = Interview {
            id: Uuid::new_v4().to_string(),
            owner_user_id: user.user_id.clone(),
            role: new.role,
            difficulty: new.difficulty,
            description: new.description,
            experience_years: new.experience_years,
            created_at: Utc::now(),
        };
        self.store.put_interview(&interview).await?;
        tracing::debug!(interview_id = %interview.id, role = %interview.role, "created interview");
        Ok(interview)
    }

    pub async fn get_interview(&self, interview_id: &str) -> Result<Interview, InterviewError> {
        self.store
            .get_interview(interview_id)
            .await?
            .ok_or_else(|| InterviewError::not_found("interview", interview_id))
    }

    /// Interviews owned by the calling user, newest first.
    pub async fn list_interviews(
        &self,
        user: Option<&UserContext>,
    ) -> Result<Vec<Interview>, InterviewError> {
        let user = user.ok_or(InterviewError::NotAuthenticated)?;
        Ok(self.store.list_interviews(&user.user_id).await?)
    }

    /// Delete an interview and everything under it. Owner only.
    pub async fn delete_interview(
        &self,
        interview_id: &str,
        user: Option<&UserContext>,
    ) -> Result<(), InterviewError> {
        let user = user.ok_or(InterviewError::NotAuthenticated)?;
        let interview = self.get_interview(interview_id).await?;
        if interview.owner_user_id != user.user_id {
            return Err(InterviewError::PermissionDenied(
                "you do not have permission to delete this interview".into(),
            ));
        }
        self.store.delete_interview(interview_id).await?;
        Ok(())
    }

    /// Start a new attempt and generate its question set.
    ///
    /// If generation fails, the error propagates and the freshly created
    /// attempt stays in progress; the next `start_attempt` discards it.
    pub async fn start_attempt(
        &self,
        interview_id: &str,
        user: Option<&UserContext>,
    ) -> Result<StartedAttempt, InterviewError> {
        let interview = self.get_interview(interview_id).await?;
        let attempt_id = self.attempts.create_attempt(interview_id, user).await?;

        let request = QuestionRequest::for_interview(&interview);
        let mut questions = self.generator.generate_questions(&request).await?;
        questions.truncate(QUESTIONS_PER_ATTEMPT as usize);
        for (index, question) in questions.iter_mut().enumerate() {
            question.index = index as u32;
        }
        self.store
            .put_questions(interview_id, &attempt_id, &questions)
            .await?;

        tracing::debug!(
            interview_id,
            attempt_id = %attempt_id,
            questions = questions.len(),
            "attempt started"
        );
        Ok(StartedAttempt {
            attempt_id,
            questions,
        })
    }

    /// Record the user's answer for one question of an attempt.
    ///
    /// The answer text is persisted verbatim with a provisional score;
    /// completion re-scores from the text regardless.
    pub async fn submit_answer(
        &self,
        interview_id: &str,
        attempt_id: &str,
        question_index: u32,
        answer_text: &str,
        user: Option<&UserContext>,
    ) -> Result<Answer, InterviewError> {
        let user = user.ok_or(InterviewError::NotAuthenticated)?;
        let interview = self.get_interview(interview_id).await?;
        if interview.owner_user_id != user.user_id {
            return Err(InterviewError::PermissionDenied(
                "you do not have permission to save answers for this interview".into(),
            ));
        }
        if self
            .store
            .get_attempt(interview_id, attempt_id)
            .await?
            .is_none()
        {
            return Err(InterviewError::not_found("attempt", attempt_id));
        }

        let questions = self.store.list_questions(interview_id, attempt_id).await?;
        let question = questions
            .into_iter()
            .find(|q| q.index == question_index)
            .ok_or_else(|| {
                InterviewError::not_found("question", question_index.to_string())
            })?;

        let score = score_answer(answer_text, &question.key_points);
        let answer = Answer {
            question_index,
            user_answer: answer_text.to_string(),
            question: question.question,
            expected_answer: question.expected_answer,
            key_points: question.key_points,
            score,
            ai_feedback: None,
            timestamp: Utc::now(),
        };
        self.store
            .put_answer(interview_id, attempt_id, &answer)
            .await?;
        Ok(answer)
    }

    /// Feedback for one recorded answer, generated lazily on first request
    /// and attached to the stored answer.
    pub async fn answer_feedback(
        &self,
        interview_id: &str,
        attempt_id: &str,
        question_index: u32,
        user: Option<&UserContext>,
    ) -> Result<String, InterviewError> {
        let user = user.ok_or(InterviewError::NotAuthenticated)?;
        let interview = self.get_interview(interview_id).await?;
        if interview.owner_user_id != user.user_id {
            return Err(InterviewError::PermissionDenied(
                "you do not have permission to view feedback for this interview".into(),
            ));
        }
        if self
            .store
            .get_attempt(interview_id, attempt_id)
            .await?
            .is_none()
        {
            return Err(InterviewError::not_found("attempt", attempt_id));
        }

        let answers = self.store.list_answers(interview_id, attempt_id).await?;
        let answer = answers
            .into_iter()
            .find(|a| a.question_index == question_index)
            .ok_or_else(|| {
                InterviewError::not_found("answer", question_index.to_string())
            })?;

        if let Some(feedback) = answer.ai_feedback {
            return Ok(feedback);
        }

        let feedback = self
            .generator
            .generate_feedback(&FeedbackRequest {
                question: answer.question,
                user_answer: answer.user_answer,
                expected_answer: answer.expected_answer,
            })
            .await?;
        self.store
            .set_answer_feedback(interview_id, attempt_id, question_index, &feedback)
            .await?;
        Ok(feedback)
    }

    /// Finalize an attempt and return its aggregate score.
    pub async fn complete_attempt(
        &self,
        interview_id: &str,
        attempt_id: &str,
    ) -> Result<f64, InterviewError> {
        self.attempts.complete_attempt(interview_id, attempt_id).await
    }

    /// Recorded answers for an attempt, in question order.
    pub async fn attempt_answers(
        &self,
        interview_id: &str,
        attempt_id: &str,
    ) -> Result<Vec<Answer>, InterviewError> {
        let mut answers = self.store.list_answers(interview_id, attempt_id).await?;
        answers.sort_by_key(|a| a.question_index);
        Ok(answers)
    }

    /// Completed attempts for an interview, most recent first.
    pub async fn attempt_history(
        &self,
        interview_id: &str,
    ) -> Result<Vec<Attempt>, InterviewError> {
        self.attempts.get_attempts(interview_id).await
    }
}
