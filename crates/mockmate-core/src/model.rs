//! Core data model types for mockmate.
//!
//! These are the document shapes the rest of the system reads and writes:
//! interview profiles, attempts, generated questions, and recorded answers.
//! Field names follow the stored document schema
//! (`interviews/{id}/attempts/{id}/answers/{question_index}`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of questions generated for every attempt.
pub const QUESTIONS_PER_ATTEMPT: u32 = 5;

/// Explicit caller identity.
///
/// Every operation that requires an authenticated user takes
/// `Option<&UserContext>`; `None` means there is no active user context.
/// There is no ambient session state anywhere in the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserContext {
    /// Opaque user identifier supplied by the external auth collaborator.
    pub user_id: String,
}

impl UserContext {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

/// Interview difficulty level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Expert,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Beginner => write!(f, "beginner"),
            Difficulty::Intermediate => write!(f, "intermediate"),
            Difficulty::Expert => write!(f, "expert"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "expert" => Ok(Difficulty::Expert),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// Input for creating an interview profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewInterview {
    /// Job role being interviewed for (e.g. "Backend Engineer").
    pub role: String,
    /// Difficulty of the generated questions.
    pub difficulty: Difficulty,
    /// Free-text tech stack description.
    pub description: String,
    /// Candidate's years of experience.
    pub experience_years: u32,
}

/// An interview profile.
///
/// Created once by a user action, immutable except for deletion, and owned
/// exclusively by its creator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interview {
    pub id: String,
    /// The user who created (and exclusively owns) this interview.
    pub owner_user_id: String,
    pub role: String,
    pub difficulty: Difficulty,
    pub description: String,
    pub experience_years: u32,
    pub created_at: DateTime<Utc>,
}

/// Attempt lifecycle state. `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttemptStatus {
    InProgress,
    Completed,
}

impl fmt::Display for AttemptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptStatus::InProgress => write!(f, "in-progress"),
            AttemptStatus::Completed => write!(f, "completed"),
        }
    }
}

/// One timed pass through an interview's question set.
///
/// Invariant: at most one attempt with status `in-progress` exists per
/// interview at any time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attempt {
    pub id: String,
    pub interview_id: String,
    pub user_id: String,
    pub status: AttemptStatus,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    /// Aggregate score in `[0, 10]`, frozen at completion.
    pub score: f64,
    pub total_questions: u32,
}

impl Attempt {
    pub fn is_in_progress(&self) -> bool {
        self.status == AttemptStatus::InProgress
    }
}

/// A generated interview question. Immutable once stored under an attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Position in the attempt's question set, starting at 0.
    #[serde(default)]
    pub index: u32,
    pub question: String,
    /// Detailed expected answer, used for feedback generation.
    pub expected_answer: String,
    #[serde(default = "default_max_score")]
    pub max_score: u32,
    /// Required concept strings used to grade the free-text answer.
    #[serde(default)]
    pub key_points: Vec<String>,
}

fn default_max_score() -> u32 {
    10
}

/// A recorded answer for one question of an attempt.
///
/// Created once when the user finishes answering; never mutated afterwards
/// except to attach AI feedback lazily.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    pub question_index: u32,
    /// The user's free-text answer, persisted verbatim.
    pub user_answer: String,
    pub question: String,
    pub expected_answer: String,
    pub key_points: Vec<String>,
    /// Provisional score recorded at submission. Completion always
    /// re-scores from `user_answer` rather than trusting this value.
    pub score: f64,
    #[serde(default)]
    pub ai_feedback: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_display_and_parse() {
        assert_eq!(Difficulty::Beginner.to_string(), "beginner");
        assert_eq!(Difficulty::Expert.to_string(), "expert");
        assert_eq!(
            "Intermediate".parse::<Difficulty>().unwrap(),
            Difficulty::Intermediate
        );
        assert_eq!("EXPERT".parse::<Difficulty>().unwrap(), Difficulty::Expert);
        assert!("impossible".parse::<Difficulty>().is_err());
    }

    #[test]
    fn attempt_status_stored_strings() {
        assert_eq!(
            serde_json::to_string(&AttemptStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
        assert_eq!(
            serde_json::to_string(&AttemptStatus::Completed).unwrap(),
            "\"completed\""
        );
        let status: AttemptStatus = serde_json::from_str("\"in-progress\"").unwrap();
        assert_eq!(status, AttemptStatus::InProgress);
    }

    #[test]
    fn attempt_serde_roundtrip() {
        let attempt = Attempt {
            id: "a-1".into(),
            interview_id: "i-1".into(),
            user_id: "u-1".into(),
            status: AttemptStatus::InProgress,
            started_at: Utc::now(),
            completed_at: None,
            score: 0.0,
            total_questions: QUESTIONS_PER_ATTEMPT,
        };
        let json = serde_json::to_string(&attempt).unwrap();
        let deserialized: Attempt = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.id, "a-1");
        assert!(deserialized.is_in_progress());
        assert!(deserialized.completed_at.is_none());
    }

    #[test]
    fn question_defaults() {
        let question: Question = serde_json::from_str(
            r#"{"question": "What is ownership?", "expected_answer": "Move semantics."}"#,
        )
        .unwrap();
        assert_eq!(question.index, 0);
        assert_eq!(question.max_score, 10);
        assert!(question.key_points.is_empty());
    }
}
