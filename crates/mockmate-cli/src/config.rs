//! Application configuration loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use mockmate_generator::GeneratorConfig;
use mockmate_store::StoreConfig;

/// Top-level configuration for the mockmate binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
    /// Identity used for all commands; interviews are scoped per user.
    #[serde(default = "default_user")]
    pub default_user: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            generator: GeneratorConfig::default(),
            default_user: default_user(),
        }
    }
}

fn default_user() -> String {
    "local".to_string()
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `mockmate.toml` in the current directory
/// 2. `~/.config/mockmate/config.toml`
///
/// Environment variable override: `MOCKMATE_GEMINI_KEY` switches the
/// generator to Gemini with that key (or replaces a configured key).
pub fn load_config_from(path: Option<&Path>) -> Result<AppConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("mockmate.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<AppConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => AppConfig::default(),
    };

    if let Ok(key) = std::env::var("MOCKMATE_GEMINI_KEY") {
        config.generator = match config.generator {
            GeneratorConfig::Gemini {
                model, base_url, ..
            } => GeneratorConfig::Gemini {
                api_key: key,
                model,
                base_url,
            },
            GeneratorConfig::Mock => GeneratorConfig::Gemini {
                api_key: key,
                model: None,
                base_url: None,
            },
        };
    }

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("mockmate"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_local_store_and_mock_generator() {
        let config = AppConfig::default();
        assert!(matches!(config.store, StoreConfig::Local { .. }));
        assert!(matches!(config.generator, GeneratorConfig::Mock));
        assert_eq!(config.default_user, "local");
    }

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
default_user = "kate"

[store]
type = "firestore"
project_id = "my-proj"
api_key = "${MOCKMATE_FIRESTORE_KEY}"

[generator]
type = "gemini"
api_key = "${MOCKMATE_GEMINI_KEY}"
model = "gemini-2.5-pro"
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.default_user, "kate");
        assert!(matches!(config.store, StoreConfig::Firestore { .. }));
        assert!(matches!(config.generator, GeneratorConfig::Gemini { .. }));
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: AppConfig = toml::from_str("default_user = \"kate\"").unwrap();
        assert!(matches!(config.store, StoreConfig::Local { .. }));
        assert!(matches!(config.generator, GeneratorConfig::Mock));
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let err = load_config_from(Some(Path::new("no-such-config.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }
}
