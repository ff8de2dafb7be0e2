// crates/forge-server/src/app.rs
// Application controller shared by the CLI and the web API

use std::sync::Arc;

use forge_types::{ChatSnapshot, GeneratedPersona, PersonaFormData, PersonaStatus};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::chat::{ChatSession, ConversationRelay, FailurePolicy, SendOutcome};
use crate::error::{ForgeError, Result, SynthesisCause};
use crate::llm::LlmClient;
use crate::persona::{BotFatherSetup, PersonaSynthesizer, validate_form};

#[derive(Default)]
struct AppInner {
    persona: Option<Arc<GeneratedPersona>>,
    bot_name: Option<String>,
    /// Banner from the last failed generation
    error: Option<String>,
    generating: bool,
    session: Option<Arc<ChatSession>>,
}

/// Owns the current persona and its chat session
pub struct ForgeApp {
    synthesizer: Arc<PersonaSynthesizer>,
    relay: Arc<ConversationRelay>,
    policy: FailurePolicy,
    model: String,
    inner: Arc<Mutex<AppInner>>,
}

impl ForgeApp {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self::with_options(client, None, FailurePolicy::default())
    }

    pub fn with_options(
        client: Arc<dyn LlmClient>,
        temperature: Option<f32>,
        policy: FailurePolicy,
    ) -> Self {
        Self {
            synthesizer: Arc::new(
                PersonaSynthesizer::new(client.clone()).with_temperature(temperature),
            ),
            relay: Arc::new(ConversationRelay::new(client.clone()).with_temperature(temperature)),
            policy,
            model: client.model_name(),
            inner: Arc::new(Mutex::new(AppInner::default())),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Generate a persona from the form and start a fresh chat with it.
    ///
    /// On failure the previous persona and session stay in place and the
    /// generic banner is recorded.
    pub async fn generate(&self, form: PersonaFormData) -> Result<Arc<GeneratedPersona>> {
        validate_form(&form)?;

        {
            let mut inner = self.inner.lock().await;
            if inner.generating {
                return Err(ForgeError::Busy);
            }
            inner.generating = true;
            inner.error = None;
        }

        let synthesizer = self.synthesizer.clone();
        let relay = self.relay.clone();
        let policy = self.policy;
        let inner = self.inner.clone();

        // Runs to completion and clears the flag even if the caller goes away
        let generation = tokio::spawn(async move {
            let result = synthesizer.synthesize(&form).await;

            let mut inner = inner.lock().await;
            inner.generating = false;

            match result {
                Ok(persona) => {
                    let persona = Arc::new(persona);
                    let bot_name = form.name.trim().to_string();
                    install(&mut inner, persona.clone(), bot_name, relay, policy);
                    Ok(persona)
                }
                Err(e) => {
                    warn!(error = %e, "Persona generation failed");
                    inner.error = Some(e.to_user_string());
                    Err(e)
                }
            }
        });

        match generation.await {
            Ok(result) => result,
            Err(e) => {
                let err = ForgeError::synthesis(SynthesisCause::Request, e.to_string());
                let mut inner = self.inner.lock().await;
                inner.generating = false;
                inner.error = Some(err.to_user_string());
                Err(err)
            }
        }
    }

    /// Use an existing persona (e.g. loaded from disk) and start a chat with it
    pub async fn load_persona(&self, persona: GeneratedPersona, bot_name: impl Into<String>) {
        let mut inner = self.inner.lock().await;
        inner.error = None;
        install(
            &mut inner,
            Arc::new(persona),
            bot_name.into(),
            self.relay.clone(),
            self.policy,
        );
    }

    pub async fn persona(&self) -> Option<Arc<GeneratedPersona>> {
        self.inner.lock().await.persona.clone()
    }

    pub async fn error(&self) -> Option<String> {
        self.inner.lock().await.error.clone()
    }

    pub async fn is_generating(&self) -> bool {
        self.inner.lock().await.generating
    }

    pub async fn status(&self) -> PersonaStatus {
        let inner = self.inner.lock().await;
        PersonaStatus {
            bot_name: inner.bot_name.clone(),
            persona: inner.persona.as_deref().cloned(),
            generating: inner.generating,
            error: inner.error.clone(),
        }
    }

    pub async fn session(&self) -> Result<Arc<ChatSession>> {
        self.inner
            .lock()
            .await
            .session
            .clone()
            .ok_or(ForgeError::NoPersona)
    }

    pub async fn send_message(&self, message: &str) -> Result<SendOutcome> {
        let session = self.session().await?;
        Ok(session.send(message).await)
    }

    pub async fn reset_chat(&self) -> Result<()> {
        self.session().await?.reset().await;
        Ok(())
    }

    pub async fn chat_snapshot(&self) -> Result<ChatSnapshot> {
        Ok(self.session().await?.snapshot().await)
    }

    pub async fn botfather_setup(&self, username: Option<&str>) -> Result<BotFatherSetup> {
        let persona = self.persona().await.ok_or(ForgeError::NoPersona)?;
        Ok(BotFatherSetup::from_persona(&persona, username))
    }
}

fn install(
    inner: &mut AppInner,
    persona: Arc<GeneratedPersona>,
    bot_name: String,
    relay: Arc<ConversationRelay>,
    policy: FailurePolicy,
) {
    // A reply still pending on the old session lands there and is never shown
    let session = ChatSession::new(persona.clone(), bot_name.clone(), relay, policy);
    info!(bot = %bot_name, policy = policy.as_str(), "New chat session");
    inner.persona = Some(persona);
    inner.bot_name = Some(bot_name);
    inner.session = Some(Arc::new(session));
}
