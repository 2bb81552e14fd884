//! In-memory Slack workspace shared by the integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use birthday_bot::core::models::PostingIdentity;
use birthday_bot::errors::SlackError;
use birthday_bot::slack::{
    ChannelSummary, ChatPlatform, CommandResponder, Identities, MessagePresentation,
    PostedMessage,
};

pub const ANNOUNCEMENTS_ID: &str = "C0ANNOUNCE";
pub const GENERAL_ID: &str = "C0GENERAL";
pub const INVOKER_DM_ID: &str = "D0INVOKER";
pub const INVOKER_ID: &str = "U0INVOKER";

#[derive(Debug, Clone)]
pub struct RecordedPost {
    pub identity: PostingIdentity,
    pub channel: String,
    pub text: String,
    pub presentation: MessagePresentation,
    pub ts: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedReaction {
    pub identity: PostingIdentity,
    pub channel: String,
    pub ts: String,
    pub name: String,
}

#[derive(Debug, Default)]
pub struct FakeState {
    pub channels: Vec<ChannelSummary>,
    pub dm_id: Option<String>,
    pub posts: Vec<RecordedPost>,
    /// Reactions currently on messages.
    pub reactions: Vec<RecordedReaction>,
    pub reaction_attempts: Vec<(PostingIdentity, String)>,
    pub joins: Vec<(PostingIdentity, String)>,
    pub dm_opens: Vec<String>,
    pub list_channels_calls: usize,
    /// (identity, reaction, error code), consumed one per attempt.
    pub reaction_failures: Vec<(PostingIdentity, String, String)>,
    pub join_failures: Vec<(PostingIdentity, String)>,
    pub post_failure: Option<String>,
}

impl FakeState {
    pub fn reaction_count(&self, name: &str) -> usize {
        self.reactions.iter().filter(|r| r.name == name).count()
    }

    pub fn platform_calls(&self) -> usize {
        self.posts.len()
            + self.reaction_attempts.len()
            + self.joins.len()
            + self.dm_opens.len()
            + self.list_channels_calls
    }
}

#[derive(Clone)]
pub struct FakeWorkspace {
    state: Arc<Mutex<FakeState>>,
}

impl FakeWorkspace {
    pub fn new() -> Self {
        let state = FakeState {
            channels: vec![
                ChannelSummary {
                    id: GENERAL_ID.to_string(),
                    name: "general".to_string(),
                },
                ChannelSummary {
                    id: ANNOUNCEMENTS_ID.to_string(),
                    name: "announcements".to_string(),
                },
            ],
            dm_id: Some(INVOKER_DM_ID.to_string()),
            ..FakeState::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn client(&self, identity: PostingIdentity) -> Arc<dyn ChatPlatform> {
        Arc::new(FakeSlack {
            identity,
            state: Arc::clone(&self.state),
        })
    }

    pub fn identities(&self) -> Identities {
        Identities::new(self.client(PostingIdentity::Service))
    }

    pub fn identities_with_impersonation(&self) -> Identities {
        self.identities()
            .with_impersonation(self.client(PostingIdentity::Impersonated))
    }

    pub fn fail_reaction(&self, identity: PostingIdentity, name: &str, code: &str) {
        self.state()
            .reaction_failures
            .push((identity, name.to_string(), code.to_string()));
    }

    pub fn fail_join(&self, identity: PostingIdentity, code: &str) {
        self.state().join_failures.push((identity, code.to_string()));
    }
}

pub struct FakeSlack {
    identity: PostingIdentity,
    state: Arc<Mutex<FakeState>>,
}

#[async_trait]
impl ChatPlatform for FakeSlack {
    fn identity(&self) -> PostingIdentity {
        self.identity
    }

    async fn post_message(
        &self,
        channel: &str,
        text: &str,
        presentation: &MessagePresentation,
    ) -> Result<PostedMessage, SlackError> {
        let mut state = self.state.lock().unwrap();
        if let Some(code) = &state.post_failure {
            return Err(SlackError::platform("chat.postMessage", code));
        }
        let ts = format!("1700000000.{:06}", state.posts.len() + 1);
        state.posts.push(RecordedPost {
            identity: self.identity,
            channel: channel.to_string(),
            text: text.to_string(),
            presentation: presentation.clone(),
            ts: ts.clone(),
        });
        Ok(PostedMessage {
            channel: channel.to_string(),
            ts,
        })
    }

    async fn add_reaction(&self, channel: &str, ts: &str, name: &str) -> Result<(), SlackError> {
        let mut state = self.state.lock().unwrap();
        state
            .reaction_attempts
            .push((self.identity, name.to_string()));

        let scripted = state
            .reaction_failures
            .iter()
            .position(|(identity, reaction, _)| *identity == self.identity && reaction == name);
        if let Some(index) = scripted {
            let (_, _, code) = state.reaction_failures.remove(index);
            return Err(SlackError::platform("reactions.add", &code));
        }

        let present = state
            .reactions
            .iter()
            .any(|r| r.channel == channel && r.ts == ts && r.name == name);
        if present {
            return Err(SlackError::platform("reactions.add", "already_reacted"));
        }

        state.reactions.push(RecordedReaction {
            identity: self.identity,
            channel: channel.to_string(),
            ts: ts.to_string(),
            name: name.to_string(),
        });
        Ok(())
    }

    async fn list_channels(&self) -> Result<Vec<ChannelSummary>, SlackError> {
        let mut state = self.state.lock().unwrap();
        state.list_channels_calls += 1;
        Ok(state.channels.clone())
    }

    async fn join_channel(&self, channel: &str) -> Result<(), SlackError> {
        let mut state = self.state.lock().unwrap();
        state.joins.push((self.identity, channel.to_string()));
        let failure = state
            .join_failures
            .iter()
            .find(|(identity, _)| *identity == self.identity)
            .map(|(_, code)| code.clone());
        match failure {
            Some(code) => Err(SlackError::platform("conversations.join", &code)),
            None => Ok(()),
        }
    }

    async fn open_direct_message(&self, user_id: &str) -> Result<String, SlackError> {
        let mut state = self.state.lock().unwrap();
        state.dm_opens.push(user_id.to_string());
        state
            .dm_id
            .clone()
            .ok_or_else(|| SlackError::platform("conversations.open", "user_not_found"))
    }
}

/// Captures acknowledgements and ephemeral replies.
#[derive(Default)]
pub struct RecordingResponder {
    pub fail_ack: bool,
    pub acks: Mutex<usize>,
    pub replies: Mutex<Vec<String>>,
}

impl RecordingResponder {
    pub fn failing_ack() -> Self {
        Self {
            fail_ack: true,
            ..Self::default()
        }
    }

    pub fn replies(&self) -> Vec<String> {
        self.replies.lock().unwrap().clone()
    }

    pub fn acks(&self) -> usize {
        *self.acks.lock().unwrap()
    }
}

#[async_trait]
impl CommandResponder for RecordingResponder {
    async fn ack(&self) -> Result<(), SlackError> {
        if self.fail_ack {
            return Err(SlackError::HttpError("ack timed out".to_string()));
        }
        *self.acks.lock().unwrap() += 1;
        Ok(())
    }

    async fn respond(&self, text: &str) -> Result<(), SlackError> {
        self.replies.lock().unwrap().push(text.to_string());
        Ok(())
    }
}
