use matchcast::{
    Result,
    config::{Config, LlmConfig, LlmProvider, LogsConfig, ServerConfig},
};
use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::fs;

pub const SOFASCORE_URL: &str = "https://www.sofascore.com/real-madrid-barcelona/EgbsLgb";

/// Create a test configuration with sensible defaults
pub fn create_test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            logs: LogsConfig {
                level: "debug".to_string(),
            },
        },
        llm: create_llm_config(LlmProvider::Gemini, ""),
    }
}

pub fn create_llm_config(provider: LlmProvider, base_url: &str) -> LlmConfig {
    LlmConfig {
        provider,
        base_url: base_url.to_string(),
        api_key: "test-api-key".to_string(),
        model: match provider {
            LlmProvider::Gemini => "gemini-2.5-pro".to_string(),
            LlmProvider::OpenAi => "gpt-4o".to_string(),
        },
    }
}

/// Create a temporary directory for test files
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Create a test config YAML file
pub async fn create_test_config_file(dir: &TempDir, content: &str) -> Result<String> {
    let config_path = dir.path().join("config.yaml");
    fs::write(&config_path, content).await?;
    Ok(config_path.to_string_lossy().to_string())
}

/// The well-formed model answer used across tests
pub fn sample_prediction_json() -> Value {
    json!({
        "homeTeam": "Real Madrid",
        "awayTeam": "Barcelona",
        "mostLikelyScore": {"home": 2, "away": 1, "probability": 0.18},
        "hdaProbability": {"homeWin": 0.5, "draw": 0.25, "awayWin": 0.25},
        "overUnder": {"over1_5": 0.8, "over2_5": 0.55},
        "weather": {"condition": "Clear", "impact": "Ideal conditions"},
        "analysis": "Real Madrid have won four of their last five at home."
    })
}

pub fn sample_prediction_text() -> String {
    sample_prediction_json().to_string()
}

/// Sample configuration YAML for testing
pub const SAMPLE_CONFIG_YAML: &str = r#"
server:
  host: "127.0.0.1"
  port: 9090
  logs:
    level: "debug"

llm:
  provider: "gemini"
  api_key: "file-api-key"
  model: "gemini-2.5-flash"
"#;

/// Sample configuration with the OpenAI-compatible provider
pub const SAMPLE_CONFIG_WITH_OPENAI: &str = r#"
llm:
  provider: "openai"
  base_url: "http://localhost:4000/v1"
  api_key: "test-api-key"
  model: "gpt-4o"
"#;

/// Invalid configuration YAML for testing error cases
pub const INVALID_CONFIG_YAML: &str = r#"
server:
  port: "not-a-number"

llm:
  provider: "unknown"
"#;
