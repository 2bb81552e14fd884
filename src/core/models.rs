use std::fmt;

use serde::{Deserialize, Serialize};

/// Queue payload handed from the API function to the worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandTask {
    pub correlation_id: String,
    pub command: String,
    pub text: String,
    pub user_id: String,
    pub channel_id: String,
    pub response_url: String,
}

impl CommandTask {
    #[must_use]
    pub fn invocation(&self) -> Invocation {
        Invocation {
            text: self.text.clone(),
            invoker_id: self.user_id.clone(),
            invocation_channel_id: self.channel_id.clone(),
        }
    }
}

/// One run of the birthday command as the invoker typed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub text: String,
    pub invoker_id: String,
    pub invocation_channel_id: String,
}

/// What the invoker asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Intent {
    pub is_test_mode: bool,
    pub recipients: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationKind {
    Channel,
    DirectMessage,
}

impl DestinationKind {
    /// Slack direct-message conversation ids start with `D`.
    #[must_use]
    pub fn from_conversation_id(id: &str) -> Self {
        if id.starts_with('D') {
            DestinationKind::DirectMessage
        } else {
            DestinationKind::Channel
        }
    }
}

impl fmt::Display for DestinationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DestinationKind::Channel => write!(f, "channel"),
            DestinationKind::DirectMessage => write!(f, "direct message"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub id: String,
    pub kind: DestinationKind,
    /// Channel name for channels, `None` for direct messages.
    pub name: Option<String>,
}

impl Destination {
    #[must_use]
    pub fn channel(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            kind: DestinationKind::from_conversation_id(id),
            name: Some(name.to_string()),
        }
    }

    #[must_use]
    pub fn direct_message(id: &str) -> Self {
        Self {
            id: id.to_string(),
            kind: DestinationKind::from_conversation_id(id),
            name: None,
        }
    }

    #[must_use]
    pub fn is_direct_message(&self) -> bool {
        self.kind == DestinationKind::DirectMessage
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "#{name} ({})", self.id),
            None => write!(f, "{} {}", self.kind, self.id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostingIdentity {
    /// The bot's own account.
    Service,
    /// A user token posting as that human.
    Impersonated,
}

impl fmt::Display for PostingIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostingIdentity::Service => write!(f, "service"),
            PostingIdentity::Impersonated => write!(f, "impersonated"),
        }
    }
}
