// crates/forge-server/src/chat/transcript.rs
// Canonical chat transcript
//
// One ordered list backs both the visible chat and the history replayed to
// the model. Each entry is tagged with how it came to be; the history is
// derived from the tags at call time under a FailurePolicy.

use forge_types::{ChatMessage, HistoryTurn};

/// Scripted assistant turn shown when a relay call fails
pub const FALLBACK_REPLY: &str = "Error: I lost my train of thought.";

/// How an entry entered the transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnKind {
    /// Welcome message that opens every session
    Seed,
    /// User turn shown optimistically while its relay call is in flight
    Pending,
    /// Part of a completed exchange
    Delivered,
    /// User turn whose relay call failed
    Failed,
    /// Scripted apology appended after a failure
    Fallback,
}

/// What happens to a failed user turn in the replayed history
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// History keeps the failed user turn (history grows by one)
    #[default]
    KeepUserTurn,
    /// History drops the failed exchange entirely (history unchanged)
    DropFailedTurn,
}

impl FailurePolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "keep_user_turn" | "keep" => Some(Self::KeepUserTurn),
            "drop_failed_turn" | "drop" => Some(Self::DropFailedTurn),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::KeepUserTurn => "keep_user_turn",
            Self::DropFailedTurn => "drop_failed_turn",
        }
    }

    fn replays(&self, kind: TurnKind) -> bool {
        match kind {
            TurnKind::Seed | TurnKind::Delivered => true,
            TurnKind::Failed => *self == Self::KeepUserTurn,
            TurnKind::Pending | TurnKind::Fallback => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub message: ChatMessage,
    pub kind: TurnKind,
}

/// Ordered, append-only turns of one chat session
#[derive(Debug, Clone)]
pub struct Transcript {
    welcome: String,
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    /// New transcript seeded with the welcome message as a model turn
    pub fn new(welcome_message: impl Into<String>) -> Self {
        let mut transcript = Self {
            welcome: welcome_message.into(),
            entries: Vec::new(),
        };
        transcript.reset();
        transcript
    }

    /// Back to the single seed entry
    pub fn reset(&mut self) {
        self.entries.clear();
        self.entries.push(TranscriptEntry {
            message: ChatMessage::model(self.welcome.clone()),
            kind: TurnKind::Seed,
        });
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Visible chat, in order
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.entries.iter().map(|e| e.message.clone()).collect()
    }

    /// History to replay to the model under `policy`
    pub fn history(&self, policy: FailurePolicy) -> Vec<HistoryTurn> {
        self.entries
            .iter()
            .filter(|e| policy.replays(e.kind))
            .map(|e| HistoryTurn::from(&e.message))
            .collect()
    }

    /// Show a user turn before its reply exists; returns its index
    pub fn push_pending(&mut self, text: impl Into<String>) -> usize {
        self.entries.push(TranscriptEntry {
            message: ChatMessage::user(text),
            kind: TurnKind::Pending,
        });
        self.entries.len() - 1
    }

    /// Complete the exchange opened at `index` with the model's reply
    pub fn complete(&mut self, index: usize, reply: impl Into<String>) {
        self.settle(index, TurnKind::Delivered);
        self.entries.push(TranscriptEntry {
            message: ChatMessage::model(reply),
            kind: TurnKind::Delivered,
        });
    }

    /// Mark the exchange opened at `index` as failed and append the fallback
    pub fn fail(&mut self, index: usize) {
        self.settle(index, TurnKind::Failed);
        self.entries.push(TranscriptEntry {
            message: ChatMessage::model(FALLBACK_REPLY),
            kind: TurnKind::Fallback,
        });
    }

    fn settle(&mut self, index: usize, kind: TurnKind) {
        if let Some(entry) = self.entries.get_mut(index)
            && entry.kind == TurnKind::Pending
        {
            entry.kind = kind;
        }
    }
}
