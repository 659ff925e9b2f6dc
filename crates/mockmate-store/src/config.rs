//! Store configuration and factory.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use mockmate_core::config::resolve_env_vars;
use mockmate_core::traits::InterviewStore;

use crate::firestore::FirestoreStore;
use crate::local::LocalStore;

/// Configuration for the document store backing the application.
///
/// Note: Custom Debug impl masks the Firestore API key to prevent
/// accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StoreConfig {
    /// In-memory only; state is lost when the process exits.
    Memory,
    /// JSON file on local disk.
    Local { path: PathBuf },
    /// Firestore over its REST API.
    Firestore {
        project_id: String,
        #[serde(default)]
        api_key: Option<String>,
        #[serde(default)]
        base_url: Option<String>,
    },
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::Local {
            path: PathBuf::from("mockmate-data.json"),
        }
    }
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreConfig::Memory => f.debug_struct("Memory").finish(),
            StoreConfig::Local { path } => {
                f.debug_struct("Local").field("path", path).finish()
            }
            StoreConfig::Firestore {
                project_id,
                api_key: _,
                base_url,
            } => f
                .debug_struct("Firestore")
                .field("project_id", project_id)
                .field("api_key", &"***")
                .field("base_url", base_url)
                .finish(),
        }
    }
}

/// Create a store instance from its configuration.
pub fn create_store(config: &StoreConfig) -> Result<Arc<dyn InterviewStore>> {
    match config {
        StoreConfig::Memory => Ok(Arc::new(LocalStore::in_memory())),
        StoreConfig::Local { path } => Ok(Arc::new(LocalStore::open(path)?)),
        StoreConfig::Firestore {
            project_id,
            api_key,
            base_url,
        } => Ok(Arc::new(FirestoreStore::new(
            &resolve_env_vars(project_id),
            api_key.as_ref().map(|k| resolve_env_vars(k)),
            base_url.clone(),
        ))),
    }
}
