//! Top-level handling of one birthday command.
//!
//! Acknowledge → parse → compose → resolve → confirm destination → post →
//! schedule reactions. Every failure ends the invocation with exactly one
//! ephemeral reply; nothing escapes to the host.

use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{error, info, warn};

use super::applier::{ReactionApplier, ReactionHandle, ReactionJob, ReactionPacing};
use super::composer::{compose_message, with_test_banner};
use super::parser::parse_command;
use super::reactions::select_reactions;
use super::resolver::{ChannelResolver, confirm_destination, ensure_member};
use crate::core::config::normalize_channel_name;
use crate::core::models::{Destination, Invocation, PostingIdentity};
use crate::core::templates::{ConfigSnapshot, PostingSettings, TemplateStore};
use crate::errors::CommandError;
use crate::slack::{
    CommandResponder, Identities, MessagePresentation, PostedMessage, choose_poster,
};

/// A posted celebration whose reactions may still be in flight.
pub struct Delivery {
    pub destination: Destination,
    pub posted: PostedMessage,
    pub poster: PostingIdentity,
    pub text: String,
    pub reactions: ReactionHandle,
}

/// Terminal state of one invocation.
pub enum CommandOutcome {
    /// Acknowledgement could not be sent; nothing else was attempted.
    Unacknowledged,
    /// The invoker's input or environment prevented posting.
    Rejected(CommandError),
    /// Something broke on our side.
    Failed(CommandError),
    Completed(Delivery),
}

impl CommandOutcome {
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, CommandOutcome::Completed(_))
    }
}

pub struct BirthdayCommand {
    identities: Identities,
    store: Arc<TemplateStore>,
    command_name: String,
    announcement_channel: String,
    pacing: ReactionPacing,
    seed: Option<u64>,
}

impl BirthdayCommand {
    #[must_use]
    pub fn new(
        identities: Identities,
        store: Arc<TemplateStore>,
        command_name: &str,
        announcement_channel: &str,
    ) -> Self {
        Self {
            identities,
            store,
            command_name: command_name.to_string(),
            announcement_channel: normalize_channel_name(announcement_channel),
            pacing: ReactionPacing::default(),
            seed: None,
        }
    }

    #[must_use]
    pub fn with_pacing(mut self, pacing: ReactionPacing) -> Self {
        self.pacing = pacing;
        self
    }

    /// Fix the random source so template and reaction picks are reproducible.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    pub async fn handle(
        &self,
        invocation: &Invocation,
        responder: &dyn CommandResponder,
    ) -> CommandOutcome {
        if let Err(e) = responder.ack().await {
            error!("Failed to acknowledge birthday command: {}", e);
            return CommandOutcome::Unacknowledged;
        }

        let snapshot = self.store.snapshot();

        match self.run(invocation, &snapshot, responder).await {
            Ok(delivery) => CommandOutcome::Completed(delivery),
            Err(e) => {
                if e.is_rejection() {
                    warn!("Birthday command rejected: {}", e);
                } else {
                    error!("Error handling birthday command: {}", e);
                }
                let reply = e.user_message(&self.command_name, &self.announcement_channel);
                self.reply(responder, &reply).await;
                if e.is_rejection() {
                    CommandOutcome::Rejected(e)
                } else {
                    CommandOutcome::Failed(e)
                }
            }
        }
    }

    async fn run(
        &self,
        invocation: &Invocation,
        snapshot: &ConfigSnapshot,
        responder: &dyn CommandResponder,
    ) -> Result<Delivery, CommandError> {
        let intent = parse_command(&invocation.text);
        if intent.recipients.is_empty() {
            return Err(CommandError::NoRecipients);
        }

        let (text, reactions) = {
            let mut rng = self.rng();
            let message = compose_message(&snapshot.templates, &intent.recipients, &mut rng);
            let reactions = select_reactions(&snapshot.reactions, &mut rng);
            let text = if intent.is_test_mode {
                with_test_banner(&message)
            } else {
                message
            };
            (text, reactions)
        };
        info!(
            test_mode = intent.is_test_mode,
            recipients = intent.recipients.len(),
            "Generated reactions: {:?}",
            reactions
        );

        let resolver = ChannelResolver::new(self.identities.service().as_ref());
        let destination = resolver
            .resolve_destination(&intent, &invocation.invoker_id, &self.announcement_channel)
            .await?;
        confirm_destination(&intent, &destination, &self.announcement_channel)?;

        let settings = &snapshot.templates.settings;
        let poster_identity = choose_poster(
            self.identities.has_impersonation(),
            settings.post_as_user,
            destination.kind,
        );
        let poster = self.identities.get(poster_identity);

        if !destination.is_direct_message() {
            ensure_member(poster.as_ref(), &destination.id).await;
        }

        let posted = poster
            .post_message(&destination.id, &text, &presentation(poster_identity, settings))
            .await
            .map_err(CommandError::Post)?;
        info!(
            "Posted birthday message {} to {} as {}",
            posted.ts, destination, poster_identity
        );

        let handle = ReactionApplier::new(&self.identities, poster_identity, self.pacing).spawn(
            ReactionJob {
                channel: posted.channel.clone(),
                ts: posted.ts.clone(),
                kind: destination.kind,
                reactions,
            },
        );

        let confirmation = if intent.is_test_mode {
            format!(
                "✅ Test message sent to your DM! Remove `--test` to post to #{}.",
                self.announcement_channel
            )
        } else {
            format!(
                "🎉 Birthday message posted to #{}!",
                self.announcement_channel
            )
        };
        self.reply(responder, &confirmation).await;

        Ok(Delivery {
            destination,
            posted,
            poster: poster_identity,
            text,
            reactions: handle,
        })
    }

    /// Replies are best effort: a lost reply never undoes a post.
    async fn reply(&self, responder: &dyn CommandResponder, text: &str) {
        if let Err(e) = responder.respond(text).await {
            error!("Failed to respond to invoker: {}", e);
        }
    }
}

fn presentation(identity: PostingIdentity, settings: &PostingSettings) -> MessagePresentation {
    match identity {
        PostingIdentity::Service => MessagePresentation::Custom {
            username: settings.bot_name().to_string(),
            icon_emoji: settings.bot_icon().to_string(),
        },
        PostingIdentity::Impersonated => MessagePresentation::AsIdentity,
    }
}
