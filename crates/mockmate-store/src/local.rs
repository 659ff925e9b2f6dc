//! Local document store: in-memory, with optional JSON-file persistence.
//!
//! Documents live in nested maps mirroring the
//! `interviews/{id}/attempts/{id}` paths. When opened with a file path the
//! whole database is rewritten after every mutation (write to a temp file,
//! then rename), so a crash never leaves a half-written file behind.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mockmate_core::error::StoreError;
use mockmate_core::model::{Answer, Attempt, AttemptStatus, Interview, Question};
use mockmate_core::traits::InterviewStore;

#[derive(Debug, Default, Serialize, Deserialize)]
struct Database {
    #[serde(default)]
    interviews: BTreeMap<String, InterviewDoc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct InterviewDoc {
    interview: Interview,
    #[serde(default)]
    attempts: BTreeMap<String, AttemptDoc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct AttemptDoc {
    attempt: Attempt,
    #[serde(default)]
    questions: Vec<Question>,
    #[serde(default)]
    answers: BTreeMap<u32, Answer>,
}

/// Single-process store over a mutex-guarded database.
#[derive(Debug)]
pub struct LocalStore {
    path: Option<PathBuf>,
    db: Mutex<Database>,
}

impl LocalStore {
    /// A store that lives only in memory. Used by tests and one-shot runs.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            db: Mutex::new(Database::default()),
        }
    }

    /// Open (or create) a JSON-file-backed store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let db = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .map_err(|e| StoreError::Io(format!("{}: {e}", path.display())))?;
            serde_json::from_str(&content)
                .map_err(|e| StoreError::InvalidDocument(format!("{}: {e}", path.display())))?
        } else {
            Database::default()
        };
        Ok(Self {
            path: Some(path),
            db: Mutex::new(db),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Database> {
        self.db.lock().expect("store mutex poisoned")
    }

    fn persist(&self, db: &Database) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(db)
            .map_err(|e| StoreError::InvalidDocument(e.to_string()))?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)
            .map_err(|e| StoreError::Io(format!("{}: {e}", tmp.display())))?;
        std::fs::rename(&tmp, path)
            .map_err(|e| StoreError::Io(format!("{}: {e}", path.display())))?;
        Ok(())
    }

    fn with_attempt<T>(
        db: &mut Database,
        interview_id: &str,
        attempt_id: &str,
        f: impl FnOnce(&mut AttemptDoc) -> T,
    ) -> Result<T, StoreError> {
        let doc = db
            .interviews
            .get_mut(interview_id)
            .and_then(|i| i.attempts.get_mut(attempt_id))
            .ok_or_else(|| {
                StoreError::NotFound(format!("interviews/{interview_id}/attempts/{attempt_id}"))
            })?;
        Ok(f(doc))
    }
}

#[async_trait]
impl InterviewStore for LocalStore {
    async fn put_interview(&self, interview: &Interview) -> Result<(), StoreError> {
        let mut db = self.lock();
        db.interviews
            .entry(interview.id.clone())
            .and_modify(|doc| doc.interview = interview.clone())
            .or_insert_with(|| InterviewDoc {
                interview: interview.clone(),
                attempts: BTreeMap::new(),
            });
        self.persist(&db)
    }

    async fn get_interview(&self, interview_id: &str) -> Result<Option<Interview>, StoreError> {
        let db = self.lock();
        Ok(db
            .interviews
            .get(interview_id)
            .map(|doc| doc.interview.clone()))
    }

    async fn list_interviews(&self, owner_user_id: &str) -> Result<Vec<Interview>, StoreError> {
        let db = self.lock();
        let mut interviews: Vec<Interview> = db
            .interviews
            .values()
            .filter(|doc| doc.interview.owner_user_id == owner_user_id)
            .map(|doc| doc.interview.clone())
            .collect();
        interviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(interviews)
    }

    async fn delete_interview(&self, interview_id: &str) -> Result<(), StoreError> {
        let mut db = self.lock();
        // Removing the interview node drops its attempts, questions, and
        // answers with it. Deleting a missing interview is a no-op.
        db.interviews.remove(interview_id);
        self.persist(&db)
    }

    async fn put_attempt(&self, attempt: &Attempt) -> Result<(), StoreError> {
        let mut db = self.lock();
        let doc = db
            .interviews
            .get_mut(&attempt.interview_id)
            .ok_or_else(|| {
                StoreError::NotFound(format!("interviews/{}", attempt.interview_id))
            })?;
        doc.attempts
            .entry(attempt.id.clone())
            .and_modify(|a| a.attempt = attempt.clone())
            .or_insert_with(|| AttemptDoc {
                attempt: attempt.clone(),
                questions: Vec::new(),
                answers: BTreeMap::new(),
            });
        self.persist(&db)
    }

    async fn get_attempt(
        &self,
        interview_id: &str,
        attempt_id: &str,
    ) -> Result<Option<Attempt>, StoreError> {
        let db = self.lock();
        Ok(db
            .interviews
            .get(interview_id)
            .and_then(|i| i.attempts.get(attempt_id))
            .map(|doc| doc.attempt.clone()))
    }

    async fn list_attempts(&self, interview_id: &str) -> Result<Vec<Attempt>, StoreError> {
        let db = self.lock();
        Ok(db
            .interviews
            .get(interview_id)
            .map(|i| i.attempts.values().map(|doc| doc.attempt.clone()).collect())
            .unwrap_or_default())
    }

    async fn delete_attempt(
        &self,
        interview_id: &str,
        attempt_id: &str,
    ) -> Result<(), StoreError> {
        let mut db = self.lock();
        if let Some(doc) = db.interviews.get_mut(interview_id) {
            doc.attempts.remove(attempt_id);
        }
        self.persist(&db)
    }

    async fn finalize_attempt(
        &self,
        interview_id: &str,
        attempt_id: &str,
        score: f64,
        completed_at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let mut db = self.lock();
        let finalized = Self::with_attempt(&mut db, interview_id, attempt_id, |doc| {
            if doc.attempt.status != AttemptStatus::InProgress {
                return false;
            }
            doc.attempt.status = AttemptStatus::Completed;
            doc.attempt.score = score;
            doc.attempt.completed_at = Some(completed_at);
            true
        })?;
        if finalized {
            self.persist(&db)?;
        }
        Ok(finalized)
    }

    async fn put_questions(
        &self,
        interview_id: &str,
        attempt_id: &str,
        questions: &[Question],
    ) -> Result<(), StoreError> {
        let mut db = self.lock();
        Self::with_attempt(&mut db, interview_id, attempt_id, |doc| {
            doc.questions = questions.to_vec();
        })?;
        self.persist(&db)
    }

    async fn list_questions(
        &self,
        interview_id: &str,
        attempt_id: &str,
    ) -> Result<Vec<Question>, StoreError> {
        let mut db = self.lock();
        let mut questions =
            Self::with_attempt(&mut db, interview_id, attempt_id, |doc| doc.questions.clone())?;
        questions.sort_by_key(|q| q.index);
        Ok(questions)
    }

    async fn put_answer(
        &self,
        interview_id: &str,
        attempt_id: &str,
        answer: &Answer,
    ) -> Result<(), StoreError> {
        let mut db = self.lock();
        Self::with_attempt(&mut db, interview_id, attempt_id, |doc| {
            doc.answers.insert(answer.question_index, answer.clone());
        })?;
        self.persist(&db)
    }

    async fn list_answers(
        &self,
        interview_id: &str,
        attempt_id: &str,
    ) -> Result<Vec<Answer>, StoreError> {
        let mut db = self.lock();
        Self::with_attempt(&mut db, interview_id, attempt_id, |doc| {
            doc.answers.values().cloned().collect()
        })
    }

    async fn set_answer_feedback(
        &self,
        interview_id: &str,
        attempt_id: &str,
        question_index: u32,
        feedback: &str,
    ) -> Result<(), StoreError> {
        let mut db = self.lock();
        Self::with_attempt(&mut db, interview_id, attempt_id, |doc| {
            match doc.answers.get_mut(&question_index) {
                Some(answer) => {
                    answer.ai_feedback = Some(feedback.to_string());
                    Ok(())
                }
                None => Err(StoreError::NotFound(format!(
                    "interviews/{interview_id}/attempts/{attempt_id}/answers/{question_index}"
                ))),
            }
        })??;
        self.persist(&db)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockmate_core::model::{Difficulty, QUESTIONS_PER_ATTEMPT};

    fn sample_interview(id: &str, owner: &str) -> Interview {
        Interview {
            id: id.into(),
            owner_user_id: owner.into(),
            role: "Backend Engineer".into(),
            difficulty: Difficulty::Intermediate,
            description: "Rust, Postgres".into(),
            experience_years: 4,
            created_at: Utc::now(),
        }
    }

    fn sample_attempt(id: &str, interview_id: &str) -> Attempt {
        Attempt {
            id: id.into(),
            interview_id: interview_id.into(),
            user_id: "user-1".into(),
            status: AttemptStatus::InProgress,
            started_at: Utc::now(),
            completed_at: None,
            score: 0.0,
            total_questions: QUESTIONS_PER_ATTEMPT,
        }
    }

    #[tokio::test]
    async fn interview_roundtrip() {
        let store = LocalStore::in_memory();
        store
            .put_interview(&sample_interview("i-1", "user-1"))
            .await
            .unwrap();

        let fetched = store.get_interview("i-1").await.unwrap().unwrap();
        assert_eq!(fetched.role, "Backend Engineer");
        assert!(store.get_interview("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_interviews_filters_by_owner() {
        let store = LocalStore::in_memory();
        store
            .put_interview(&sample_interview("i-1", "alice"))
            .await
            .unwrap();
        store
            .put_interview(&sample_interview("i-2", "bob"))
            .await
            .unwrap();

        let mine = store.list_interviews("alice").await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, "i-1");
    }

    #[tokio::test]
    async fn finalize_is_conditional_on_status() {
        let store = LocalStore::in_memory();
        store
            .put_interview(&sample_interview("i-1", "user-1"))
            .await
            .unwrap();
        store.put_attempt(&sample_attempt("a-1", "i-1")).await.unwrap();

        let first = store
            .finalize_attempt("i-1", "a-1", 7.5, Utc::now())
            .await
            .unwrap();
        assert!(first);

        // A second finalize must not overwrite the frozen score.
        let second = store
            .finalize_attempt("i-1", "a-1", 1.0, Utc::now())
            .await
            .unwrap();
        assert!(!second);

        let attempt = store.get_attempt("i-1", "a-1").await.unwrap().unwrap();
        assert_eq!(attempt.status, AttemptStatus::Completed);
        assert_eq!(attempt.score, 7.5);
        assert!(attempt.completed_at.is_some());
    }

    #[tokio::test]
    async fn delete_interview_cascades() {
        let store = LocalStore::in_memory();
        store
            .put_interview(&sample_interview("i-1", "user-1"))
            .await
            .unwrap();
        store.put_attempt(&sample_attempt("a-1", "i-1")).await.unwrap();

        store.delete_interview("i-1").await.unwrap();
        assert!(store.get_interview("i-1").await.unwrap().is_none());
        assert!(store.get_attempt("i-1", "a-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn answer_feedback_attaches_lazily() {
        let store = LocalStore::in_memory();
        store
            .put_interview(&sample_interview("i-1", "user-1"))
            .await
            .unwrap();
        store.put_attempt(&sample_attempt("a-1", "i-1")).await.unwrap();

        let answer = Answer {
            question_index: 0,
            user_answer: "closures capture scope".into(),
            question: "Explain closures".into(),
            expected_answer: "Functions capturing their environment".into(),
            key_points: vec!["closures".into()],
            score: 10.0,
            ai_feedback: None,
            timestamp: Utc::now(),
        };
        store.put_answer("i-1", "a-1", &answer).await.unwrap();

        store
            .set_answer_feedback("i-1", "a-1", 0, "Good coverage of the basics.")
            .await
            .unwrap();
        let answers = store.list_answers("i-1", "a-1").await.unwrap();
        assert_eq!(
            answers[0].ai_feedback.as_deref(),
            Some("Good coverage of the basics.")
        );

        let missing = store.set_answer_feedback("i-1", "a-1", 9, "nope").await;
        assert!(matches!(missing, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn file_backed_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mockmate.json");

        {
            let store = LocalStore::open(&path).unwrap();
            store
                .put_interview(&sample_interview("i-1", "user-1"))
                .await
                .unwrap();
            store.put_attempt(&sample_attempt("a-1", "i-1")).await.unwrap();
        }

        let reopened = LocalStore::open(&path).unwrap();
        let interview = reopened.get_interview("i-1").await.unwrap().unwrap();
        assert_eq!(interview.owner_user_id, "user-1");
        let attempts = reopened.list_attempts("i-1").await.unwrap();
        assert_eq!(attempts.len(), 1);
    }

    #[tokio::test]
    async fn corrupt_file_is_an_invalid_document_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = LocalStore::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::InvalidDocument(_)));
    }
}
