//! Question history and request generations.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Kind of chat entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatKind {
    /// Submitted by the user
    Question,
    /// Backend answer
    Answer,
    /// Failed request
    Error,
}

impl ChatKind {
    /// Speaker label shown above the entry.
    pub fn label(&self) -> &'static str {
        match self {
            ChatKind::Question => "You",
            ChatKind::Answer => "Assistant",
            ChatKind::Error => "Error",
        }
    }
}

/// One entry in the question history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub kind: ChatKind,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(kind: ChatKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn label(&self) -> &'static str {
        self.kind.label()
    }
}

/// Handle for an outstanding backend request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

impl Ticket {
    /// Generation number of the request.
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Issues request generations and tells stale responses apart.
///
/// Only the most recently issued ticket is current; completing any other
/// ticket has no effect.
#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    latest: u64,
    outstanding: Option<u64>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request, superseding any outstanding one.
    pub fn issue(&mut self) -> Ticket {
        self.latest += 1;
        self.outstanding = Some(self.latest);
        Ticket(self.latest)
    }

    /// Whether `ticket` is the outstanding request.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.outstanding == Some(ticket.0)
    }

    /// Whether any request is outstanding.
    pub fn in_flight(&self) -> bool {
        self.outstanding.is_some()
    }

    /// Finish `ticket`. Returns `false` if it was stale.
    pub fn complete(&mut self, ticket: Ticket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.outstanding = None;
        true
    }
}
