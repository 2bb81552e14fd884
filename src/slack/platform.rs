//! The messaging capability the birthday pipeline depends on.
//!
//! Both the service identity and the impersonation identity implement
//! [`ChatPlatform`]; which one posts is decided by [`choose_poster`].

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::models::{DestinationKind, PostingIdentity};
use crate::errors::SlackError;

/// How a service-identity post presents itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessagePresentation {
    /// Post under the token's own name.
    AsIdentity,
    /// Override display name and icon.
    Custom { username: String, icon_emoji: String },
}

/// Where `chat.postMessage` actually put the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedMessage {
    pub channel: String,
    pub ts: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSummary {
    pub id: String,
    pub name: String,
}

#[async_trait]
pub trait ChatPlatform: Send + Sync {
    fn identity(&self) -> PostingIdentity;

    async fn post_message(
        &self,
        channel: &str,
        text: &str,
        presentation: &MessagePresentation,
    ) -> Result<PostedMessage, SlackError>;

    async fn add_reaction(&self, channel: &str, ts: &str, name: &str) -> Result<(), SlackError>;

    async fn list_channels(&self) -> Result<Vec<ChannelSummary>, SlackError>;

    async fn join_channel(&self, channel: &str) -> Result<(), SlackError>;

    /// Open (or reuse) the DM with `user_id`, returning its conversation id.
    async fn open_direct_message(&self, user_id: &str) -> Result<String, SlackError>;
}

/// Identity selection: impersonate only when a user token exists, the
/// settings ask for it, and the destination is not a DM (user tokens lack
/// the scope to post there).
#[must_use]
pub fn choose_poster(
    impersonation_available: bool,
    post_as_user: bool,
    destination: DestinationKind,
) -> PostingIdentity {
    if impersonation_available && post_as_user && destination != DestinationKind::DirectMessage {
        PostingIdentity::Impersonated
    } else {
        PostingIdentity::Service
    }
}

/// The clients available to one invocation.
#[derive(Clone)]
pub struct Identities {
    service: Arc<dyn ChatPlatform>,
    impersonation: Option<Arc<dyn ChatPlatform>>,
}

impl Identities {
    #[must_use]
    pub fn new(service: Arc<dyn ChatPlatform>) -> Self {
        Self {
            service,
            impersonation: None,
        }
    }

    #[must_use]
    pub fn with_impersonation(mut self, client: Arc<dyn ChatPlatform>) -> Self {
        self.impersonation = Some(client);
        self
    }

    #[must_use]
    pub fn service(&self) -> &Arc<dyn ChatPlatform> {
        &self.service
    }

    #[must_use]
    pub fn has_impersonation(&self) -> bool {
        self.impersonation.is_some()
    }

    /// Client for `identity`; falls back to the service client when no
    /// impersonation token is configured.
    #[must_use]
    pub fn get(&self, identity: PostingIdentity) -> Arc<dyn ChatPlatform> {
        match (identity, &self.impersonation) {
            (PostingIdentity::Impersonated, Some(client)) => Arc::clone(client),
            _ => Arc::clone(&self.service),
        }
    }

    /// The identity that did *not* post, if one exists.
    #[must_use]
    pub fn secondary(&self, poster: PostingIdentity) -> Option<Arc<dyn ChatPlatform>> {
        match poster {
            PostingIdentity::Impersonated => Some(Arc::clone(&self.service)),
            PostingIdentity::Service => self.impersonation.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impersonates_only_for_channels_when_enabled() {
        assert_eq!(
            choose_poster(true, true, DestinationKind::Channel),
            PostingIdentity::Impersonated
        );
        assert_eq!(
            choose_poster(true, true, DestinationKind::DirectMessage),
            PostingIdentity::Service
        );
        assert_eq!(
            choose_poster(true, false, DestinationKind::Channel),
            PostingIdentity::Service
        );
        assert_eq!(
            choose_poster(false, true, DestinationKind::Channel),
            PostingIdentity::Service
        );
    }
}
