//! The `mockmate feedback` command.

use std::path::PathBuf;

use anyhow::Result;

pub async fn execute(
    interview_id: String,
    attempt_id: String,
    question_index: u32,
    user: Option<String>,
    config: Option<PathBuf>,
) -> Result<()> {
    let (engine, user) = super::session(config.as_deref(), user.as_deref())?;
    let feedback = engine
        .answer_feedback(&interview_id, &attempt_id, question_index, Some(&user))
        .await?;
    println!("{feedback}");
    Ok(())
}
