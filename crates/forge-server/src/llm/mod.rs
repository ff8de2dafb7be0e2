// crates/forge-server/src/llm/mod.rs
// LLM inference clients (Gemini)

mod gemini;
mod http_client;
mod logging;
mod provider;
mod types;

pub use gemini::{DEFAULT_MODEL, GEMINI_API_BASE, GeminiClient};
pub use http_client::LlmHttpClient;
pub use provider::LlmClient;
pub use types::{GenerateRequest, GenerateResult, ResponseFormat, Usage};
