mod client;
mod gemini;
mod types;

pub use client::{LlmClient, OpenAiClient, create_llm_client, to_json_schema};
pub use gemini::{DEFAULT_GEMINI_BASE_URL, GeminiClient};
pub use types::*;
