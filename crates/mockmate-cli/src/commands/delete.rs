//! The `mockmate delete` command.

use std::path::PathBuf;

use anyhow::Result;

pub async fn execute(
    interview_id: String,
    user: Option<String>,
    config: Option<PathBuf>,
) -> Result<()> {
    let (engine, user) = super::session(config.as_deref(), user.as_deref())?;
    engine.delete_interview(&interview_id, Some(&user)).await?;
    println!("Deleted interview {interview_id}");
    Ok(())
}
