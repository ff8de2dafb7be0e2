// crates/forge-server/src/chat/mod.rs
// Simulated chat against a generated persona

mod relay;
mod session;
mod transcript;

pub use relay::ConversationRelay;
pub use session::{ChatSession, RejectReason, SendOutcome, SessionState};
pub use transcript::{FALLBACK_REPLY, FailurePolicy, Transcript, TranscriptEntry, TurnKind};
