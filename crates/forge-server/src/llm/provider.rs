// crates/forge-server/src/llm/provider.rs
// LLM client abstraction layer

use anyhow::Result;
use async_trait::async_trait;

use super::{GenerateRequest, GenerateResult};

/// Trait for generation clients
///
/// Constructed once and passed in (`Arc<dyn LlmClient>`), so the persona
/// and chat adapters can run against a fake in tests.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Issue one generation call
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResult>;

    /// Model identifier used for requests
    fn model_name(&self) -> String;
}
