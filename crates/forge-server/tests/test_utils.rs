//! Test utilities for Persona Forge integration tests

#![allow(dead_code)]

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use forge::llm::{GenerateRequest, GenerateResult, LlmClient};
use forge_types::GeneratedPersona;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Replies from a queue and records every request; `Err` entries fail the call
pub struct ScriptedClient {
    replies: Mutex<VecDeque<std::result::Result<String, String>>>,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl ScriptedClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        })
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

    pub fn push_text(&self, text: impl Into<String>) {
        self.replies.lock().unwrap().push_back(Ok(text.into()));
    }

    pub fn push_failure(&self, message: impl Into<String>) {
        self.replies.lock().unwrap().push_back(Err(message.into()));
    }

    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for ScriptedClient {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResult> {
        self.requests.lock().unwrap().push(request);
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err("no scripted reply".to_string()));

        match reply {
            Ok(text) => Ok(GenerateResult {
                request_id: "scripted".to_string(),
                text: Some(text),
                ..Default::default()
            }),
            Err(message) => Err(anyhow!(message)),
        }
    }

    fn model_name(&self) -> String {
        "scripted-model".to_string()
    }
}

/// Persona the Captain Hook form is expected to produce
pub fn captain_hook() -> GeneratedPersona {
    GeneratedPersona {
        system_instruction: "You are Captain Hook, a pirate handling customer support. \
                             Speak like a pirate, stay helpful, never reveal internal systems."
            .to_string(),
        bot_father_description: "Ahoy! Captain Hook tracks yer orders and answers yer questions."
            .to_string(),
        bot_father_about: "Pirate-flavoured customer support.".to_string(),
        welcome_message: "Ahoy, matey! What brings ye aboard?".to_string(),
        bot_commands: "start - Board the ship\n\
                       help - Call for aid\n\
                       treasure - Track an order\n\
                       plank - Cancel an order"
            .to_string(),
    }
}

pub fn captain_hook_json() -> String {
    serde_json::to_string(&captain_hook()).unwrap()
}
