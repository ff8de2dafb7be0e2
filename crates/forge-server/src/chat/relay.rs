// crates/forge-server/src/chat/relay.rs
// Conversation relay adapter: history + new message -> next assistant utterance

use std::sync::Arc;

use forge_types::HistoryTurn;
use tracing::{debug, warn};

use crate::error::{ForgeError, Result};
use crate::llm::{GenerateRequest, LlmClient};

/// Forwards one exchange to the conversational endpoint
pub struct ConversationRelay {
    client: Arc<dyn LlmClient>,
    temperature: Option<f32>,
}

impl ConversationRelay {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self {
            client,
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Send `message` after `history`, scoped to `system_instruction`.
    ///
    /// Returns the reply text, or an empty string when the service sent none.
    /// Does not touch any transcript.
    pub async fn relay(
        &self,
        history: Vec<HistoryTurn>,
        message: &str,
        system_instruction: &str,
    ) -> Result<String> {
        if message.trim().is_empty() {
            return Err(ForgeError::InvalidInput("message is empty".to_string()));
        }

        let history_len = history.len();
        let request = GenerateRequest::chat(system_instruction, history, message)
            .with_temperature(self.temperature);

        let result = self.client.generate(request).await.map_err(|e| {
            warn!(error = %e, history_len, "Chat relay call failed");
            ForgeError::Relay(e.to_string())
        })?;

        debug!(
            request_id = %result.request_id,
            history_len,
            reply_len = result.text.as_ref().map(|t| t.len()).unwrap_or(0),
            "Relay reply received"
        );

        Ok(result.text.unwrap_or_default())
    }
}
