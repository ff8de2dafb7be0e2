// crates/forge-server/src/chat/session.rs
// Chat session state machine: idle -> awaiting-response -> idle
//
// Single-flight: while a relay call is in flight every other send is a
// no-op. The lock is never held across the network call, and the call runs
// on its own task so a dropped caller cannot leave the session awaiting.

use std::sync::Arc;

use forge_types::{ChatMessage, ChatSnapshot, GeneratedPersona, HistoryTurn};
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::relay::ConversationRelay;
use super::transcript::{FailurePolicy, Transcript, TranscriptEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    AwaitingResponse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// A reply is still pending
    Busy,
    /// Input was empty or whitespace-only
    EmptyInput,
}

/// Result of a send attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Exchange completed; the reply was appended
    Replied(String),
    /// Relay failed; the fallback turn was appended
    Failed,
    /// Nothing happened
    Rejected(RejectReason),
    /// The chat was reset while waiting; the reply was dropped
    Discarded,
}

struct Inner {
    transcript: Transcript,
    state: SessionState,
    /// Bumped on reset so late replies can be recognised
    epoch: u64,
}

/// One simulated chat against a persona
pub struct ChatSession {
    persona: Arc<GeneratedPersona>,
    bot_name: String,
    relay: Arc<ConversationRelay>,
    policy: FailurePolicy,
    inner: Arc<Mutex<Inner>>,
}

impl ChatSession {
    pub fn new(
        persona: Arc<GeneratedPersona>,
        bot_name: impl Into<String>,
        relay: Arc<ConversationRelay>,
        policy: FailurePolicy,
    ) -> Self {
        let transcript = Transcript::new(persona.welcome_message.clone());
        Self {
            persona,
            bot_name: bot_name.into(),
            relay,
            policy,
            inner: Arc::new(Mutex::new(Inner {
                transcript,
                state: SessionState::Idle,
                epoch: 0,
            })),
        }
    }

    pub fn persona(&self) -> &GeneratedPersona {
        &self.persona
    }

    pub fn bot_name(&self) -> &str {
        &self.bot_name
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Send a user message and wait for the reply.
    ///
    /// The trimmed message is shown immediately; the reply or the fallback
    /// turn is appended once the relay call settles.
    pub async fn send(&self, input: &str) -> SendOutcome {
        let message = input.trim().to_string();

        let (history, index, epoch) = {
            let mut inner = self.inner.lock().await;
            if inner.state == SessionState::AwaitingResponse {
                return SendOutcome::Rejected(RejectReason::Busy);
            }
            if message.is_empty() {
                return SendOutcome::Rejected(RejectReason::EmptyInput);
            }

            let history = inner.transcript.history(self.policy);
            let index = inner.transcript.push_pending(message.clone());
            inner.state = SessionState::AwaitingResponse;
            (history, index, inner.epoch)
        };

        let relay = self.relay.clone();
        let inner = self.inner.clone();
        let persona = self.persona.clone();
        let bot_name = self.bot_name.clone();

        // Settling happens on the task, so it runs even if this future is dropped
        let exchange = tokio::spawn(async move {
            let result = relay
                .relay(history, &message, &persona.system_instruction)
                .await;

            let mut inner = inner.lock().await;
            inner.state = SessionState::Idle;

            if inner.epoch != epoch {
                info!(bot = %bot_name, "Chat was reset while waiting, dropping reply");
                return SendOutcome::Discarded;
            }

            match result {
                Ok(reply) => {
                    inner.transcript.complete(index, reply.clone());
                    SendOutcome::Replied(reply)
                }
                Err(e) => {
                    warn!(bot = %bot_name, error = %e, "Chat relay failed, showing fallback");
                    inner.transcript.fail(index);
                    SendOutcome::Failed
                }
            }
        });

        match exchange.await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(bot = %self.bot_name, error = %e, "Chat exchange task failed");
                let mut inner = self.inner.lock().await;
                inner.state = SessionState::Idle;
                if inner.epoch == epoch {
                    inner.transcript.fail(index);
                }
                SendOutcome::Failed
            }
        }
    }

    /// Restore the single-seed transcript.
    ///
    /// An in-flight call keeps the session busy until it settles; its reply
    /// is then dropped.
    pub async fn reset(&self) {
        let mut inner = self.inner.lock().await;
        inner.transcript.reset();
        inner.epoch += 1;
    }

    pub async fn state(&self) -> SessionState {
        self.inner.lock().await.state
    }

    pub async fn messages(&self) -> Vec<ChatMessage> {
        self.inner.lock().await.transcript.messages()
    }

    pub async fn entries(&self) -> Vec<TranscriptEntry> {
        self.inner.lock().await.transcript.entries().to_vec()
    }

    /// History that the next send would replay
    pub async fn history(&self) -> Vec<HistoryTurn> {
        self.inner.lock().await.transcript.history(self.policy)
    }

    pub async fn snapshot(&self) -> ChatSnapshot {
        let inner = self.inner.lock().await;
        ChatSnapshot {
            bot_name: self.bot_name.clone(),
            messages: inner.transcript.messages(),
            awaiting_response: inner.state == SessionState::AwaitingResponse,
        }
    }
}
