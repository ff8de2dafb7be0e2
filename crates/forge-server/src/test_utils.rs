// crates/forge-server/src/test_utils.rs
// Scripted LLM client for unit tests

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use forge_types::GeneratedPersona;
use tokio::sync::{Notify, Semaphore};

use crate::llm::{GenerateRequest, GenerateResult, LlmClient};

enum Scripted {
    Text(String),
    NoText,
    Fail(String),
}

/// Replies from a queue and records every request.
///
/// A gated client parks each call until `release` is called, which lets
/// tests observe the in-flight state.
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<GenerateRequest>>,
    gate: Option<Semaphore>,
    started: Notify,
}

impl ScriptedClient {
    fn build(gated: bool) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            gate: gated.then(|| Semaphore::new(0)),
            started: Notify::new(),
        })
    }

    pub fn new() -> Arc<Self> {
        Self::build(false)
    }

    pub fn gated() -> Arc<Self> {
        Self::build(true)
    }

    pub fn with_texts<I, S>(texts: I) -> Arc<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let client = Self::new();
        for text in texts {
            client.push_text(text);
        }
        client
    }

    fn push(&self, reply: Scripted) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn push_text(&self, text: impl Into<String>) {
        self.push(Scripted::Text(text.into()));
    }

    pub fn push_no_text(&self) {
        self.push(Scripted::NoText);
    }

    pub fn push_failure(&self, message: impl Into<String>) {
        self.push(Scripted::Fail(message.into()));
    }

    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Resolves once a call has reached the client
    pub async fn wait_for_call(&self) {
        self.started.notified().await;
    }

    /// Let one parked call finish
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }
}

#[async_trait]
impl LlmClient for ScriptedClient {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResult> {
        self.requests.lock().unwrap().push(request);
        self.started.notify_one();

        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Scripted::Fail("no scripted reply".to_string()));

        match reply {
            Scripted::Text(text) => Ok(GenerateResult {
                request_id: "test-request".to_string(),
                text: Some(text),
                ..Default::default()
            }),
            Scripted::NoText => Ok(GenerateResult {
                request_id: "test-request".to_string(),
                ..Default::default()
            }),
            Scripted::Fail(message) => Err(anyhow!(message)),
        }
    }

    fn model_name(&self) -> String {
        "scripted".to_string()
    }
}

pub fn sample_persona() -> GeneratedPersona {
    GeneratedPersona {
        system_instruction: "You are Captain Hook, a pirate support agent.".to_string(),
        bot_father_description: "A pirate who tracks your parcels across the seven seas."
            .to_string(),
        bot_father_about: "Arr, I find yer treasure.".to_string(),
        welcome_message: "Ahoy, matey!".to_string(),
        bot_commands: "start - Board the ship\nhelp - Call for aid\ntreasure - Track an order"
            .to_string(),
    }
}

/// Persona JSON as the model would return it
pub fn sample_persona_json() -> String {
    serde_json::to_string(&sample_persona()).unwrap()
}
