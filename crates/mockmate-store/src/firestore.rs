//! Firestore REST document store.
//!
//! Speaks the Firestore v1 REST API directly: typed field values
//! (`stringValue`, `integerValue`, `doubleValue`, `timestampValue`,
//! `arrayValue`), `PATCH` upserts, `runQuery` for owner-filtered interview
//! lists, and an `updateTime` precondition for the conditional attempt
//! finalization. The base URL is injectable so tests can point at a local
//! mock server.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Value};
use tracing::instrument;

use mockmate_core::error::StoreError;
use mockmate_core::model::{Answer, Attempt, AttemptStatus, Interview, Question};
use mockmate_core::traits::InterviewStore;

const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const LIST_PAGE_SIZE: u32 = 300;

/// Document store backed by the Firestore REST API.
pub struct FirestoreStore {
    project_id: String,
    api_key: Option<String>,
    base_url: String,
    client: reqwest::Client,
}

impl FirestoreStore {
    pub fn new(project_id: &str, api_key: Option<String>, base_url: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("failed to build HTTP client");

        Self {
            project_id: project_id.to_string(),
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            client,
        }
    }

    fn documents_root(&self) -> String {
        format!(
            "projects/{}/databases/(default)/documents",
            self.project_id
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}/{}", self.base_url, self.documents_root(), path)
    }

    fn key_params(&self) -> Vec<(String, String)> {
        match &self.api_key {
            Some(key) => vec![("key".to_string(), key.clone())],
            None => Vec::new(),
        }
    }

    async fn get_doc(&self, path: &str) -> Result<Option<Value>, StoreError> {
        let response = self
            .client
            .get(self.url(path))
            .query(&self.key_params())
            .send()
            .await
            .map_err(map_reqwest_err)?;

        let status = response.status().as_u16();
        if status == 404 {
            return Ok(None);
        }
        if status >= 400 {
            return Err(backend_error(status, response).await);
        }
        let doc = response
            .json()
            .await
            .map_err(|e| StoreError::InvalidDocument(e.to_string()))?;
        Ok(Some(doc))
    }

    /// Create or replace a document (Firestore PATCH upserts by default).
    async fn put_doc(&self, path: &str, fields: Value) -> Result<(), StoreError> {
        let response = self
            .client
            .patch(self.url(path))
            .query(&self.key_params())
            .json(&json!({ "fields": fields }))
            .send()
            .await
            .map_err(map_reqwest_err)?;

        let status = response.status().as_u16();
        if status >= 400 {
            return Err(backend_error(status, response).await);
        }
        Ok(())
    }

    async fn delete_doc(&self, path: &str) -> Result<(), StoreError> {
        let response = self
            .client
            .delete(self.url(path))
            .query(&self.key_params())
            .send()
            .await
            .map_err(map_reqwest_err)?;

        let status = response.status().as_u16();
        // Deleting a missing document is a no-op.
        if status >= 400 && status != 404 {
            return Err(backend_error(status, response).await);
        }
        Ok(())
    }

    /// List the documents of a subcollection. Collections here stay small
    /// (5 questions, 5 answers, a handful of attempts), so a single page
    /// suffices.
    async fn list_docs(&self, path: &str) -> Result<Vec<Value>, StoreError> {
        let mut params = self.key_params();
        params.push(("pageSize".to_string(), LIST_PAGE_SIZE.to_string()));

        let response = self
            .client
            .get(self.url(path))
            .query(&params)
            .send()
            .await
            .map_err(map_reqwest_err)?;

        let status = response.status().as_u16();
        if status == 404 {
            return Ok(Vec::new());
        }
        if status >= 400 {
            return Err(backend_error(status, response).await);
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| StoreError::InvalidDocument(e.to_string()))?;
        Ok(body
            .get("documents")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl InterviewStore for FirestoreStore {
    #[instrument(skip(self, interview), fields(interview_id = %interview.id))]
    async fn put_interview(&self, interview: &Interview) -> Result<(), StoreError> {
        self.put_doc(
            &format!("interviews/{}", interview.id),
            interview_fields(interview),
        )
        .await
    }

    async fn get_interview(&self, interview_id: &str) -> Result<Option<Interview>, StoreError> {
        match self.get_doc(&format!("interviews/{interview_id}")).await? {
            Some(doc) => Ok(Some(decode_interview(&doc)?)),
            None => Ok(None),
        }
    }

    async fn list_interviews(&self, owner_user_id: &str) -> Result<Vec<Interview>, StoreError> {
        let body = json!({
            "structuredQuery": {
                "from": [{ "collectionId": "interviews" }],
                "where": {
                    "fieldFilter": {
                        "field": { "fieldPath": "userId" },
                        "op": "EQUAL",
                        "value": { "stringValue": owner_user_id }
                    }
                },
                "orderBy": [{
                    "field": { "fieldPath": "createdAt" },
                    "direction": "DESCENDING"
                }]
            }
        });

        let url = format!(
            "{}/v1/{}:runQuery",
            self.base_url,
            self.documents_root()
        );
        let response = self
            .client
            .post(url)
            .query(&self.key_params())
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_err)?;

        let status = response.status().as_u16();
        if status >= 400 {
            return Err(backend_error(status, response).await);
        }

        let results: Vec<Value> = response
            .json()
            .await
            .map_err(|e| StoreError::InvalidDocument(e.to_string()))?;
        results
            .iter()
            .filter_map(|entry| entry.get("document"))
            .map(decode_interview)
            .collect()
    }

    #[instrument(skip(self))]
    async fn delete_interview(&self, interview_id: &str) -> Result<(), StoreError> {
        // Firestore doesn't cascade deletes; walk the subcollections.
        let attempts = self
            .list_docs(&format!("interviews/{interview_id}/attempts"))
            .await?;
        for attempt_doc in &attempts {
            let attempt_id = doc_id(attempt_doc)?;
            self.delete_attempt(interview_id, &attempt_id).await?;
        }
        self.delete_doc(&format!("interviews/{interview_id}")).await
    }

    async fn put_attempt(&self, attempt: &Attempt) -> Result<(), StoreError> {
        self.put_doc(
            &format!(
                "interviews/{}/attempts/{}",
                attempt.interview_id, attempt.id
            ),
            attempt_fields(attempt),
        )
        .await
    }

    async fn get_attempt(
        &self,
        interview_id: &str,
        attempt_id: &str,
    ) -> Result<Option<Attempt>, StoreError> {
        let path = format!("interviews/{interview_id}/attempts/{attempt_id}");
        match self.get_doc(&path).await? {
            Some(doc) => Ok(Some(decode_attempt(&doc)?)),
            None => Ok(None),
        }
    }

    async fn list_attempts(&self, interview_id: &str) -> Result<Vec<Attempt>, StoreError> {
        let docs = self
            .list_docs(&format!("interviews/{interview_id}/attempts"))
            .await?;
        docs.iter().map(decode_attempt).collect()
    }

    async fn delete_attempt(
        &self,
        interview_id: &str,
        attempt_id: &str,
    ) -> Result<(), StoreError> {
        let attempt_path = format!("interviews/{interview_id}/attempts/{attempt_id}");
        for collection in ["questions", "answers"] {
            let docs = self.list_docs(&format!("{attempt_path}/{collection}")).await?;
            for doc in &docs {
                let id = doc_id(doc)?;
                self.delete_doc(&format!("{attempt_path}/{collection}/{id}"))
                    .await?;
            }
        }
        self.delete_doc(&attempt_path).await
    }

    #[instrument(skip(self, completed_at))]
    async fn finalize_attempt(
        &self,
        interview_id: &str,
        attempt_id: &str,
        score: f64,
        completed_at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let path = format!("interviews/{interview_id}/attempts/{attempt_id}");
        let doc = self
            .get_doc(&path)
            .await?
            .ok_or_else(|| StoreError::NotFound(path.clone()))?;

        let attempt = decode_attempt(&doc)?;
        if attempt.status != AttemptStatus::InProgress {
            return Ok(false);
        }
        let update_time = doc
            .get("updateTime")
            .and_then(Value::as_str)
            .ok_or_else(|| StoreError::InvalidDocument("document missing updateTime".into()))?
            .to_string();

        let mut params = self.key_params();
        for field in ["score", "status", "completedAt"] {
            params.push(("updateMask.fieldPaths".to_string(), field.to_string()));
        }
        params.push(("currentDocument.updateTime".to_string(), update_time));

        let fields = json!({
            "score": double_value(score),
            "status": string_value("completed"),
            "completedAt": timestamp_value(&completed_at),
        });

        let response = self
            .client
            .patch(self.url(&path))
            .query(&params)
            .json(&json!({ "fields": fields }))
            .send()
            .await
            .map_err(map_reqwest_err)?;

        let status = response.status().as_u16();
        if status == 409 {
            // Another client finalized between our read and write.
            tracing::warn!(interview_id, attempt_id, "finalize lost the precondition race");
            return Ok(false);
        }
        if status >= 400 {
            let message = response.text().await.unwrap_or_default();
            if message.contains("FAILED_PRECONDITION") {
                tracing::warn!(interview_id, attempt_id, "finalize lost the precondition race");
                return Ok(false);
            }
            return Err(StoreError::Backend { status, message });
        }
        Ok(true)
    }

    async fn put_questions(
        &self,
        interview_id: &str,
        attempt_id: &str,
        questions: &[Question],
    ) -> Result<(), StoreError> {
        let base = format!("interviews/{interview_id}/attempts/{attempt_id}/questions");

        // Replace semantics: clear whatever question set was stored before.
        let existing = self.list_docs(&base).await?;
        for doc in &existing {
            let id = doc_id(doc)?;
            self.delete_doc(&format!("{base}/{id}")).await?;
        }

        for question in questions {
            self.put_doc(
                &format!("{base}/question_{}", question.index),
                question_fields(question),
            )
            .await?;
        }
        Ok(())
    }

    async fn list_questions(
        &self,
        interview_id: &str,
        attempt_id: &str,
    ) -> Result<Vec<Question>, StoreError> {
        let docs = self
            .list_docs(&format!(
                "interviews/{interview_id}/attempts/{attempt_id}/questions"
            ))
            .await?;
        let mut questions = docs
            .iter()
            .map(decode_question)
            .collect::<Result<Vec<_>, _>>()?;
        questions.sort_by_key(|q| q.index);
        Ok(questions)
    }

    async fn put_answer(
        &self,
        interview_id: &str,
        attempt_id: &str,
        answer: &Answer,
    ) -> Result<(), StoreError> {
        self.put_doc(
            &format!(
                "interviews/{interview_id}/attempts/{attempt_id}/answers/question_{}",
                answer.question_index
            ),
            answer_fields(answer),
        )
        .await
    }

    async fn list_answers(
        &self,
        interview_id: &str,
        attempt_id: &str,
    ) -> Result<Vec<Answer>, StoreError> {
        let docs = self
            .list_docs(&format!(
                "interviews/{interview_id}/attempts/{attempt_id}/answers"
            ))
            .await?;
        let mut answers = docs
            .iter()
            .map(decode_answer)
            .collect::<Result<Vec<_>, _>>()?;
        answers.sort_by_key(|a| a.question_index);
        Ok(answers)
    }

    async fn set_answer_feedback(
        &self,
        interview_id: &str,
        attempt_id: &str,
        question_index: u32,
        feedback: &str,
    ) -> Result<(), StoreError> {
        let path = format!(
            "interviews/{interview_id}/attempts/{attempt_id}/answers/question_{question_index}"
        );
        let mut params = self.key_params();
        params.push(("updateMask.fieldPaths".to_string(), "aiFeedback".to_string()));
        // Attach-only: never create an answer document from a feedback write.
        params.push(("currentDocument.exists".to_string(), "true".to_string()));

        let response = self
            .client
            .patch(self.url(&path))
            .query(&params)
            .json(&json!({ "fields": { "aiFeedback": string_value(feedback) } }))
            .send()
            .await
            .map_err(map_reqwest_err)?;

        let status = response.status().as_u16();
        if status == 404 || status == 409 {
            return Err(StoreError::NotFound(path));
        }
        if status >= 400 {
            let message = response.text().await.unwrap_or_default();
            if message.contains("NOT_FOUND") {
                return Err(StoreError::NotFound(path));
            }
            return Err(StoreError::Backend { status, message });
        }
        Ok(())
    }
}

fn map_reqwest_err(err: reqwest::Error) -> StoreError {
    if err.is_timeout() {
        StoreError::Network(format!("request timed out after {DEFAULT_TIMEOUT_SECS}s"))
    } else {
        StoreError::Network(err.to_string())
    }
}

async fn backend_error(status: u16, response: reqwest::Response) -> StoreError {
    let message = response.text().await.unwrap_or_default();
    StoreError::Backend { status, message }
}

// ---------------------------------------------------------------------------
// Firestore value encoding
// ---------------------------------------------------------------------------

fn string_value(s: &str) -> Value {
    json!({ "stringValue": s })
}

fn integer_value(n: i64) -> Value {
    // Firestore transports 64-bit integers as strings.
    json!({ "integerValue": n.to_string() })
}

fn double_value(f: f64) -> Value {
    json!({ "doubleValue": f })
}

fn timestamp_value(t: &DateTime<Utc>) -> Value {
    json!({ "timestampValue": t.to_rfc3339_opts(SecondsFormat::Micros, true) })
}

fn string_array_value(items: &[String]) -> Value {
    let values: Vec<Value> = items.iter().map(|s| string_value(s)).collect();
    json!({ "arrayValue": { "values": values } })
}

// ---------------------------------------------------------------------------
// Firestore value decoding
// ---------------------------------------------------------------------------

fn doc_id(doc: &Value) -> Result<String, StoreError> {
    doc.get("name")
        .and_then(Value::as_str)
        .and_then(|name| name.rsplit('/').next())
        .map(str::to_string)
        .ok_or_else(|| StoreError::InvalidDocument("document missing name".into()))
}

fn doc_fields(doc: &Value) -> &Value {
    static EMPTY: Value = Value::Null;
    doc.get("fields").unwrap_or(&EMPTY)
}

fn field_string(fields: &Value, name: &str) -> Result<String, StoreError> {
    field_opt_string(fields, name)
        .ok_or_else(|| StoreError::InvalidDocument(format!("missing string field: {name}")))
}

fn field_opt_string(fields: &Value, name: &str) -> Option<String> {
    fields
        .get(name)?
        .get("stringValue")?
        .as_str()
        .map(str::to_string)
}

fn field_u32(fields: &Value, name: &str) -> Result<u32, StoreError> {
    fields
        .get(name)
        .and_then(|v| v.get("integerValue"))
        .and_then(|v| v.as_str().map(str::to_string).or_else(|| v.as_i64().map(|n| n.to_string())))
        .and_then(|s| s.parse::<u32>().ok())
        .ok_or_else(|| StoreError::InvalidDocument(format!("missing integer field: {name}")))
}

fn field_f64(fields: &Value, name: &str) -> Result<f64, StoreError> {
    let value = fields
        .get(name)
        .ok_or_else(|| StoreError::InvalidDocument(format!("missing number field: {name}")))?;
    if let Some(f) = value.get("doubleValue").and_then(Value::as_f64) {
        return Ok(f);
    }
    value
        .get("integerValue")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| StoreError::InvalidDocument(format!("missing number field: {name}")))
}

fn field_timestamp(fields: &Value, name: &str) -> Result<DateTime<Utc>, StoreError> {
    field_opt_timestamp(fields, name)?
        .ok_or_else(|| StoreError::InvalidDocument(format!("missing timestamp field: {name}")))
}

fn field_opt_timestamp(
    fields: &Value,
    name: &str,
) -> Result<Option<DateTime<Utc>>, StoreError> {
    let Some(raw) = fields
        .get(name)
        .and_then(|v| v.get("timestampValue"))
        .and_then(Value::as_str)
    else {
        return Ok(None);
    };
    let parsed = DateTime::parse_from_rfc3339(raw)
        .map_err(|e| StoreError::InvalidDocument(format!("bad timestamp in {name}: {e}")))?;
    Ok(Some(parsed.with_timezone(&Utc)))
}

fn field_string_array(fields: &Value, name: &str) -> Vec<String> {
    fields
        .get(name)
        .and_then(|v| v.get("arrayValue"))
        .and_then(|v| v.get("values"))
        .and_then(Value::as_array)
        .map(|values| {
            values
                .iter()
                .filter_map(|v| v.get("stringValue"))
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Model <-> document mapping
// ---------------------------------------------------------------------------

fn interview_fields(interview: &Interview) -> Value {
    json!({
        "userId": string_value(&interview.owner_user_id),
        "role": string_value(&interview.role),
        "difficulty": string_value(&interview.difficulty.to_string()),
        "description": string_value(&interview.description),
        "experience": integer_value(interview.experience_years as i64),
        "createdAt": timestamp_value(&interview.created_at),
    })
}

fn decode_interview(doc: &Value) -> Result<Interview, StoreError> {
    let fields = doc_fields(doc);
    Ok(Interview {
        id: doc_id(doc)?,
        owner_user_id: field_string(fields, "userId")?,
        role: field_string(fields, "role")?,
        difficulty: field_string(fields, "difficulty")?
            .parse()
            .map_err(StoreError::InvalidDocument)?,
        description: field_string(fields, "description")?,
        experience_years: field_u32(fields, "experience")?,
        created_at: field_timestamp(fields, "createdAt")?,
    })
}

fn attempt_fields(attempt: &Attempt) -> Value {
    let mut fields = json!({
        "interviewId": string_value(&attempt.interview_id),
        "userId": string_value(&attempt.user_id),
        "status": string_value(&attempt.status.to_string()),
        "startedAt": timestamp_value(&attempt.started_at),
        "score": double_value(attempt.score),
        "totalQuestions": integer_value(attempt.total_questions as i64),
    });
    if let Some(completed_at) = &attempt.completed_at {
        fields["completedAt"] = timestamp_value(completed_at);
    }
    fields
}

fn decode_attempt(doc: &Value) -> Result<Attempt, StoreError> {
    let fields = doc_fields(doc);
    let status = match field_string(fields, "status")?.as_str() {
        "in-progress" => AttemptStatus::InProgress,
        "completed" => AttemptStatus::Completed,
        other => {
            return Err(StoreError::InvalidDocument(format!(
                "unknown attempt status: {other}"
            )))
        }
    };
    Ok(Attempt {
        id: doc_id(doc)?,
        interview_id: field_string(fields, "interviewId")?,
        user_id: field_string(fields, "userId")?,
        status,
        started_at: field_timestamp(fields, "startedAt")?,
        completed_at: field_opt_timestamp(fields, "completedAt")?,
        score: field_f64(fields, "score")?,
        total_questions: field_u32(fields, "totalQuestions")?,
    })
}

fn question_fields(question: &Question) -> Value {
    json!({
        "order": integer_value(question.index as i64),
        "question": string_value(&question.question),
        "expectedAnswer": string_value(&question.expected_answer),
        "maxScore": integer_value(question.max_score as i64),
        "keyPoints": string_array_value(&question.key_points),
    })
}

fn decode_question(doc: &Value) -> Result<Question, StoreError> {
    let fields = doc_fields(doc);
    Ok(Question {
        index: field_u32(fields, "order")?,
        question: field_string(fields, "question")?,
        expected_answer: field_string(fields, "expectedAnswer")?,
        max_score: field_u32(fields, "maxScore")?,
        key_points: field_string_array(fields, "keyPoints"),
    })
}

fn answer_fields(answer: &Answer) -> Value {
    let mut fields = json!({
        "questionIndex": integer_value(answer.question_index as i64),
        "question": string_value(&answer.question),
        "userAnswer": string_value(&answer.user_answer),
        "expectedAnswer": string_value(&answer.expected_answer),
        "keyPoints": string_array_value(&answer.key_points),
        "score": double_value(answer.score),
        "timestamp": timestamp_value(&answer.timestamp),
    });
    if let Some(feedback) = &answer.ai_feedback {
        fields["aiFeedback"] = string_value(feedback);
    }
    fields
}

fn decode_answer(doc: &Value) -> Result<Answer, StoreError> {
    let fields = doc_fields(doc);
    Ok(Answer {
        question_index: field_u32(fields, "questionIndex")?,
        user_answer: field_string(fields, "userAnswer")?,
        question: field_string(fields, "question")?,
        expected_answer: field_string(fields, "expectedAnswer")?,
        key_points: field_string_array(fields, "keyPoints"),
        score: field_f64(fields, "score")?,
        ai_feedback: field_opt_string(fields, "aiFeedback"),
        timestamp: field_timestamp(fields, "timestamp")?,
    })
}
