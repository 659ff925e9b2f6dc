//! Generator configuration and factory.

use std::sync::Arc;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use mockmate_core::config::resolve_env_vars;
use mockmate_core::traits::QuestionGenerator;

use crate::gemini::GeminiGenerator;
use crate::mock::MockGenerator;

/// Configuration for the question/feedback generator.
///
/// Note: Custom Debug impl masks the API key to prevent accidental
/// exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GeneratorConfig {
    /// Canned questions, no network.
    Mock,
    /// Gemini over the generative-language REST API.
    Gemini {
        api_key: String,
        #[serde(default)]
        model: Option<String>,
        #[serde(default)]
        base_url: Option<String>,
    },
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig::Mock
    }
}

impl std::fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeneratorConfig::Mock => f.debug_struct("Mock").finish(),
            GeneratorConfig::Gemini {
                api_key: _,
                model,
                base_url,
            } => f
                .debug_struct("Gemini")
                .field("api_key", &"***")
                .field("model", model)
                .field("base_url", base_url)
                .finish(),
        }
    }
}

/// Create a generator instance from its configuration.
pub fn create_generator(config: &GeneratorConfig) -> Result<Arc<dyn QuestionGenerator>> {
    match config {
        GeneratorConfig::Mock => Ok(Arc::new(MockGenerator::new())),
        GeneratorConfig::Gemini {
            api_key,
            model,
            base_url,
        } => {
            let api_key = resolve_env_vars(api_key);
            if api_key.is_empty() {
                bail!("gemini generator requires an api_key");
            }
            Ok(Arc::new(GeminiGenerator::new(
                &api_key,
                model.clone(),
                base_url.clone(),
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_generator_config_variants() {
        let gemini: GeneratorConfig = toml::from_str(
            "type = \"gemini\"\napi_key = \"${MOCKMATE_GEMINI_KEY}\"\nmodel = \"gemini-2.5-pro\"",
        )
        .unwrap();
        assert!(matches!(gemini, GeneratorConfig::Gemini { .. }));

        let mock: GeneratorConfig = toml::from_str("type = \"mock\"").unwrap();
        assert!(matches!(mock, GeneratorConfig::Mock));
    }

    #[test]
    fn debug_masks_api_key() {
        let config = GeneratorConfig::Gemini {
            api_key: "super-secret".into(),
            model: None,
            base_url: None,
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("***"));
    }

    #[test]
    fn empty_key_is_rejected() {
        let config = GeneratorConfig::Gemini {
            api_key: "".into(),
            model: None,
            base_url: None,
        };
        assert!(create_generator(&config).is_err());
    }

    #[test]
    fn mock_factory() {
        let generator = create_generator(&GeneratorConfig::Mock).unwrap();
        assert_eq!(generator.name(), "mock");
    }
}
