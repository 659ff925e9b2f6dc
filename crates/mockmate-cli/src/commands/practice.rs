//! The `mockmate practice` command.
//!
//! Runs one full attempt: start, answer each question, complete, and
//! print the per-question score breakdown.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use mockmate_core::model::Question;
use mockmate_core::scoring::{score_breakdown, PointAward};

pub async fn execute(
    interview_id: String,
    answers_file: Option<PathBuf>,
    user: Option<String>,
    config: Option<PathBuf>,
) -> Result<()> {
    let (engine, user) = super::session(config.as_deref(), user.as_deref())?;

    let started = engine.start_attempt(&interview_id, Some(&user)).await?;
    println!(
        "Attempt {} started with {} questions.\n",
        started.attempt_id,
        started.questions.len()
    );

    let mut scripted = load_answers(answers_file.as_deref())?;

    for question in &started.questions {
        println!("Question {}: {}", question.index + 1, question.question);

        let answer_text = match &mut scripted {
            Some(answers) => {
                let text = answers
                    .next()
                    .with_context(|| {
                        format!("answers file ran out at question {}", question.index + 1)
                    })?;
                println!("> {text}");
                text
            }
            None => prompt_answer()?,
        };

        if answer_text.trim().is_empty() {
            println!("  (skipped)\n");
            continue;
        }

        let answer = engine
            .submit_answer(
                &interview_id,
                &started.attempt_id,
                question.index,
                &answer_text,
                Some(&user),
            )
            .await?;
        println!("  provisional score: {:.1}/10\n", answer.score);
    }

    let score = engine
        .complete_attempt(&interview_id, &started.attempt_id)
        .await?;

    println!("Attempt complete. Overall score: {score:.1}/10\n");
    print_breakdown(&engine, &interview_id, &started.attempt_id, &started.questions).await?;
    println!(
        "Per-question feedback: mockmate feedback --interview {} --attempt {} --question <n>",
        interview_id, started.attempt_id
    );
    Ok(())
}

/// Load scripted answers, one per line. `None` means interactive mode.
fn load_answers(path: Option<&std::path::Path>) -> Result<Option<std::vec::IntoIter<String>>> {
    match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read answers file: {}", path.display()))?;
            let answers: Vec<String> = content.lines().map(|l| l.to_string()).collect();
            Ok(Some(answers.into_iter()))
        }
        None => Ok(None),
    }
}

fn prompt_answer() -> Result<String> {
    print!("> ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end().to_string())
}

async fn print_breakdown(
    engine: &mockmate_core::engine::InterviewEngine,
    interview_id: &str,
    attempt_id: &str,
    questions: &[Question],
) -> Result<()> {
    let answers = engine.attempt_answers(interview_id, attempt_id).await?;

    let mut table = Table::new();
    table.set_header(vec!["#", "Score", "Key points"]);
    for question in questions {
        let answer = answers.iter().find(|a| a.question_index == question.index);
        let (score, hits) = match answer {
            Some(answer) => {
                let breakdown = score_breakdown(&answer.user_answer, &answer.key_points);
                let hits = breakdown
                    .iter()
                    .map(|(point, award)| match award {
                        PointAward::Full => format!("{point} (1.0)"),
                        PointAward::Partial => format!("{point} (0.5)"),
                        PointAward::Miss => format!("{point} (-)"),
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                (format!("{:.1}", answer.score), hits)
            }
            None => ("-".to_string(), "not answered".to_string()),
        };
        table.add_row(vec![
            Cell::new(question.index + 1),
            Cell::new(score),
            Cell::new(hits),
        ]);
    }
    println!("{table}");
    Ok(())
}
