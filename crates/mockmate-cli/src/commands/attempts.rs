//! The `mockmate attempts` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

pub async fn execute(interview_id: String, config: Option<PathBuf>) -> Result<()> {
    let (engine, _user) = super::session(config.as_deref(), None)?;
    let attempts = engine.attempt_history(&interview_id).await?;

    if attempts.is_empty() {
        println!("No completed attempts yet for interview {interview_id}.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Attempt", "Score", "Questions", "Started", "Completed"]);
    for attempt in &attempts {
        let completed = attempt
            .completed_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        table.add_row(vec![
            Cell::new(&attempt.id),
            Cell::new(format!("{:.1}/10", attempt.score)),
            Cell::new(attempt.total_questions),
            Cell::new(attempt.started_at.format("%Y-%m-%d %H:%M").to_string()),
            Cell::new(completed),
        ]);
    }
    println!("{table}");
    Ok(())
}
