//! The `mockmate create` command.

use std::path::PathBuf;

use anyhow::Result;

use mockmate_core::model::{Difficulty, NewInterview};

pub async fn execute(
    role: String,
    difficulty: String,
    description: String,
    experience: u32,
    user: Option<String>,
    config: Option<PathBuf>,
) -> Result<()> {
    let difficulty: Difficulty = difficulty
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    let (engine, user) = super::session(config.as_deref(), user.as_deref())?;
    let interview = engine
        .create_interview(
            NewInterview {
                role,
                difficulty,
                description,
                experience_years: experience,
            },
            Some(&user),
        )
        .await?;

    println!("Created interview {}", interview.id);
    println!("  role: {}", interview.role);
    println!("  difficulty: {}", interview.difficulty);
    if !interview.description.is_empty() {
        println!("  stack: {}", interview.description);
    }
    println!("\nStart practicing: mockmate practice --interview {}", interview.id);
    Ok(())
}
