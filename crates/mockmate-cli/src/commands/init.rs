//! The `mockmate init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("mockmate.toml").exists() {
        println!("mockmate.toml already exists, skipping.");
    } else {
        std::fs::write("mockmate.toml", SAMPLE_CONFIG)?;
        println!("Created mockmate.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit mockmate.toml with your API key (or keep the mock generator)");
    println!("  2. Run: mockmate create --role \"Backend Engineer\" --description \"Rust, Tokio\"");
    println!("  3. Run: mockmate practice --interview <id>");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# mockmate configuration

default_user = "local"

[store]
type = "local"
path = "mockmate-data.json"

# Swap to Firestore:
# [store]
# type = "firestore"
# project_id = "my-project"
# api_key = "${MOCKMATE_FIRESTORE_KEY}"

[generator]
type = "mock"

# Swap to Gemini:
# [generator]
# type = "gemini"
# api_key = "${MOCKMATE_GEMINI_KEY}"
# model = "gemini-2.5-flash"
"#;
