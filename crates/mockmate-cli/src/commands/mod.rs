//! Command implementations.

pub mod attempts;
pub mod create;
pub mod delete;
pub mod feedback;
pub mod init;
pub mod list;
pub mod practice;

use std::path::Path;

use anyhow::Result;

use mockmate_core::engine::InterviewEngine;
use mockmate_core::model::UserContext;
use mockmate_generator::create_generator;
use mockmate_store::create_store;

use crate::config::load_config_from;

/// Build the engine and calling identity from config. A `--user` flag
/// overrides the configured `default_user`.
fn session(
    config_path: Option<&Path>,
    user_override: Option<&str>,
) -> Result<(InterviewEngine, UserContext)> {
    let config = load_config_from(config_path)?;
    let store = create_store(&config.store)?;
    let generator = create_generator(&config.generator)?;
    let user = UserContext::new(user_override.unwrap_or(&config.default_user));
    Ok((InterviewEngine::new(store, generator), user))
}
