//! Turn "the announcement channel" or "the invoker's DM" into a conversation id.

use tracing::{info, warn};

use crate::core::config::normalize_channel_name;
use crate::core::models::{Destination, DestinationKind, Intent};
use crate::errors::{CommandError, SlackError};
use crate::slack::{ChannelSummary, ChatPlatform};

/// `conversations.join` outcomes that still leave posting worth a try.
const TOLERATED_JOIN_CODES: &[&str] = &[
    "already_in_channel",
    "method_not_supported_for_channel_type",
    "is_archived",
    "restricted_action",
    "missing_scope",
];

pub struct ChannelResolver<'a> {
    platform: &'a dyn ChatPlatform,
}

impl<'a> ChannelResolver<'a> {
    #[must_use]
    pub fn new(platform: &'a dyn ChatPlatform) -> Self {
        Self { platform }
    }

    /// Exact-name lookup; `None` when no channel has that name.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel listing fails.
    pub async fn resolve(&self, name: &str) -> Result<Option<ChannelSummary>, SlackError> {
        let wanted = normalize_channel_name(name);
        let channels = self.platform.list_channels().await?;
        Ok(channels.into_iter().find(|c| c.name == wanted))
    }

    /// # Errors
    ///
    /// `DirectMessageUnavailable` when the conversation cannot be opened.
    pub async fn open_direct_message(&self, user_id: &str) -> Result<Destination, CommandError> {
        let id = self
            .platform
            .open_direct_message(user_id)
            .await
            .map_err(|source| CommandError::DirectMessageUnavailable {
                user_id: user_id.to_string(),
                source,
            })?;
        Ok(Destination::direct_message(&id))
    }

    /// Test mode goes to the invoker's DM, normal mode to the announcement
    /// channel. Never falls back from one to the other.
    ///
    /// # Errors
    ///
    /// Returns the resolution failure as a [`CommandError`].
    pub async fn resolve_destination(
        &self,
        intent: &Intent,
        invoker_id: &str,
        announcement_channel: &str,
    ) -> Result<Destination, CommandError> {
        if intent.is_test_mode {
            return self.open_direct_message(invoker_id).await;
        }

        let name = normalize_channel_name(announcement_channel);
        match self.resolve(&name).await {
            Ok(Some(channel)) => Ok(Destination::channel(&channel.id, &channel.name)),
            Ok(None) => Err(CommandError::ChannelNotFound(name)),
            Err(source) => Err(CommandError::ChannelLookup { name, source }),
        }
    }
}

/// Best-effort join so the post can go through. Failures are logged only.
pub async fn ensure_member(platform: &dyn ChatPlatform, channel_id: &str) {
    match platform.join_channel(channel_id).await {
        Ok(()) => info!("Joined channel {} as {}", channel_id, platform.identity()),
        Err(e) if e.code().is_some_and(|c| TOLERATED_JOIN_CODES.contains(&c)) => {
            info!("Join of {} skipped: {}", channel_id, e);
        }
        Err(e) => warn!("Could not join {}; posting anyway: {}", channel_id, e),
    }
}

/// The destination must match the mode: a DM for test runs, the announcement
/// channel otherwise.
///
/// # Errors
///
/// `WrongDestination` on any mismatch; the caller must not post.
pub fn confirm_destination(
    intent: &Intent,
    destination: &Destination,
    announcement_channel: &str,
) -> Result<(), CommandError> {
    if intent.is_test_mode {
        if destination.kind != DestinationKind::DirectMessage {
            return Err(CommandError::WrongDestination(format!(
                "test mode resolved to {destination}, expected a direct message"
            )));
        }
        return Ok(());
    }

    let expected = normalize_channel_name(announcement_channel);
    let is_announcement = destination.kind == DestinationKind::Channel
        && destination.name.as_deref() == Some(expected.as_str());
    if !is_announcement {
        return Err(CommandError::WrongDestination(format!(
            "normal mode resolved to {destination}, expected #{expected}"
        )));
    }
    Ok(())
}
