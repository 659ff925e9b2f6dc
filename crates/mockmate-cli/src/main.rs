//! mockmate CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "mockmate", version, about = "AI mock-interview practice tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create starter config
    Init,

    /// Create a new interview
    Create {
        /// Target role, e.g. "Backend Engineer"
        #[arg(long)]
        role: String,

        /// Difficulty: beginner, intermediate, expert
        #[arg(long, default_value = "intermediate")]
        difficulty: String,

        /// Tech stack / focus description
        #[arg(long, default_value = "")]
        description: String,

        /// Years of experience
        #[arg(long, default_value = "0")]
        experience: u32,

        /// Act as this user instead of the configured default
        #[arg(long)]
        user: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List your interviews
    List {
        /// Act as this user instead of the configured default
        #[arg(long)]
        user: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Delete an interview and all its attempts
    Delete {
        /// Interview id
        #[arg(long)]
        interview: String,

        /// Act as this user instead of the configured default
        #[arg(long)]
        user: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Run a practice session: start an attempt, answer questions, get scored
    Practice {
        /// Interview id
        #[arg(long)]
        interview: String,

        /// Read answers from a file (one per line) instead of prompting
        #[arg(long)]
        answers_file: Option<PathBuf>,

        /// Act as this user instead of the configured default
        #[arg(long)]
        user: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show completed attempts for an interview
    Attempts {
        /// Interview id
        #[arg(long)]
        interview: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show AI feedback for one answered question
    Feedback {
        /// Interview id
        #[arg(long)]
        interview: String,

        /// Attempt id
        #[arg(long)]
        attempt: String,

        /// Question index (0-based)
        #[arg(long)]
        question: u32,

        /// Act as this user instead of the configured default
        #[arg(long)]
        user: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mockmate=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Create {
            role,
            difficulty,
            description,
            experience,
            user,
            config,
        } => commands::create::execute(role, difficulty, description, experience, user, config).await,
        Commands::List { user, config } => commands::list::execute(user, config).await,
        Commands::Delete {
            interview,
            user,
            config,
        } => commands::delete::execute(interview, user, config).await,
        Commands::Practice {
            interview,
            answers_file,
            user,
            config,
        } => commands::practice::execute(interview, answers_file, user, config).await,
        Commands::Attempts { interview, config } => {
            commands::attempts::execute(interview, config).await
        }
        Commands::Feedback {
            interview,
            attempt,
            question,
            user,
            config,
        } => commands::feedback::execute(interview, attempt, question, user, config).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
