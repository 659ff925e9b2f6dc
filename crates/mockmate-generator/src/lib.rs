//! mockmate-generator — AI question/feedback generator integrations.
//!
//! `GeminiGenerator` talks to the generative-language REST API;
//! `MockGenerator` returns canned output for tests. Both implement
//! `mockmate_core::traits::QuestionGenerator`.

pub mod config;
pub mod gemini;
pub mod mock;

pub use config::{create_generator, GeneratorConfig};
pub use gemini::GeminiGenerator;
pub use mock::MockGenerator;
