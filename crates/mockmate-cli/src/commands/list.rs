//! The `mockmate list` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

pub async fn execute(user: Option<String>, config: Option<PathBuf>) -> Result<()> {
    let (engine, user) = super::session(config.as_deref(), user.as_deref())?;
    let interviews = engine.list_interviews(Some(&user)).await?;

    if interviews.is_empty() {
        println!("No interviews yet. Create one with: mockmate create --role <role>");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Id", "Role", "Difficulty", "Experience", "Created"]);
    for interview in &interviews {
        table.add_row(vec![
            Cell::new(&interview.id),
            Cell::new(&interview.role),
            Cell::new(interview.difficulty.to_string()),
            Cell::new(format!("{}y", interview.experience_years)),
            Cell::new(interview.created_at.format("%Y-%m-%d %H:%M").to_string()),
        ]);
    }
    println!("{table}");
    Ok(())
}
