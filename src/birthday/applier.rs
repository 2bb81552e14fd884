//! Paced, failure-isolated reaction application.
//!
//! Each reaction is its own task on a [`JoinSet`], delayed by
//! `spacing × index` from scheduling. Tasks may finish out of order; the
//! returned [`ReactionHandle`] lets the caller wait for all of them.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::core::models::{DestinationKind, PostingIdentity};
use crate::errors::SlackError;
use crate::slack::{ChatPlatform, Identities};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReactionPacing {
    /// Gap between consecutive reactions.
    pub spacing: Duration,
    /// Wait after a successful join before retrying.
    pub retry_delay: Duration,
}

impl Default for ReactionPacing {
    fn default() -> Self {
        Self {
            spacing: Duration::from_millis(500),
            retry_delay: Duration::from_millis(1000),
        }
    }
}

impl ReactionPacing {
    #[must_use]
    pub fn immediate() -> Self {
        Self {
            spacing: Duration::ZERO,
            retry_delay: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionOutcome {
    Applied,
    AppliedAfterJoin,
    AppliedBySecondary,
    Dropped,
}

impl ReactionOutcome {
    #[must_use]
    pub fn is_applied(self) -> bool {
        self != ReactionOutcome::Dropped
    }
}

/// The message to decorate.
#[derive(Debug, Clone)]
pub struct ReactionJob {
    pub channel: String,
    pub ts: String,
    pub kind: DestinationKind,
    pub reactions: Vec<String>,
}

pub struct ReactionApplier {
    poster: Arc<dyn ChatPlatform>,
    service: Arc<dyn ChatPlatform>,
    secondary: Option<Arc<dyn ChatPlatform>>,
    pacing: ReactionPacing,
}

impl ReactionApplier {
    #[must_use]
    pub fn new(identities: &Identities, poster: PostingIdentity, pacing: ReactionPacing) -> Self {
        let poster_client = identities.get(poster);
        let secondary = identities
            .secondary(poster)
            .filter(|client| client.identity() != poster_client.identity());
        Self {
            poster: poster_client,
            service: Arc::clone(identities.service()),
            secondary,
            pacing,
        }
    }

    /// Schedule every reaction and return immediately.
    pub fn spawn(self, job: ReactionJob) -> ReactionHandle {
        let applier = Arc::new(self);
        let job = Arc::new(job);
        let mut tasks = JoinSet::new();

        info!(
            "Adding {} reactions to message {} in channel {}",
            job.reactions.len(),
            job.ts,
            job.channel
        );

        for (index, name) in job.reactions.iter().enumerate() {
            let applier = Arc::clone(&applier);
            let job = Arc::clone(&job);
            let name = name.clone();
            let delay = applier.pacing.spacing * u32::try_from(index).unwrap_or(u32::MAX);

            tasks.spawn(async move {
                tokio::time::sleep(delay).await;
                let outcome = applier.apply(&job, &name).await;
                (name, outcome)
            });
        }

        ReactionHandle { tasks }
    }

    async fn apply(&self, job: &ReactionJob, name: &str) -> ReactionOutcome {
        match self.poster.add_reaction(&job.channel, &job.ts, name).await {
            Ok(()) => ReactionOutcome::Applied,
            Err(e) if e.is_already_reacted() => ReactionOutcome::Applied,
            Err(e) if e.is_permission_failure() && job.kind != DestinationKind::DirectMessage => {
                warn!("Reaction {} refused ({}); joining {}", name, e, job.channel);
                self.recover(job, name).await
            }
            Err(e) => {
                error!("Error adding reaction {}: {}", name, e);
                ReactionOutcome::Dropped
            }
        }
    }

    /// Join with the service identity and retry once; if the join itself
    /// fails, hand the reaction to the other identity once.
    async fn recover(&self, job: &ReactionJob, name: &str) -> ReactionOutcome {
        match self.service.join_channel(&job.channel).await {
            Ok(()) => {
                tokio::time::sleep(self.pacing.retry_delay).await;
                match self.poster.add_reaction(&job.channel, &job.ts, name).await {
                    Ok(()) => ReactionOutcome::AppliedAfterJoin,
                    Err(e) if e.is_already_reacted() => ReactionOutcome::AppliedAfterJoin,
                    Err(e) => drop_reaction(name, "retry after join", &e),
                }
            }
            Err(join_err) => {
                let Some(secondary) = &self.secondary else {
                    return drop_reaction(name, "join", &join_err);
                };
                warn!(
                    "Join of {} failed ({}); retrying {} as {}",
                    job.channel,
                    join_err,
                    name,
                    secondary.identity()
                );
                match secondary.add_reaction(&job.channel, &job.ts, name).await {
                    Ok(()) => ReactionOutcome::AppliedBySecondary,
                    Err(e) if e.is_already_reacted() => ReactionOutcome::AppliedBySecondary,
                    Err(e) => drop_reaction(name, "secondary identity", &e),
                }
            }
        }
    }
}

fn drop_reaction(name: &str, stage: &str, e: &SlackError) -> ReactionOutcome {
    error!("Giving up on reaction {} after {}: {}", name, stage, e);
    ReactionOutcome::Dropped
}

/// Per-reaction results, in completion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReactionReport {
    pub outcomes: Vec<(String, ReactionOutcome)>,
}

impl ReactionReport {
    #[must_use]
    pub fn applied(&self) -> usize {
        self.outcomes.iter().filter(|(_, o)| o.is_applied()).count()
    }

    #[must_use]
    pub fn dropped(&self) -> usize {
        self.outcomes.len() - self.applied()
    }

    #[must_use]
    pub fn outcome(&self, name: &str) -> Option<ReactionOutcome> {
        self.outcomes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, o)| *o)
    }
}

/// Scheduled reaction tasks. Dropping the handle aborts whatever has not run
/// yet, so call [`wait`](Self::wait).
pub struct ReactionHandle {
    tasks: JoinSet<(String, ReactionOutcome)>,
}

impl ReactionHandle {
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub async fn wait(mut self) -> ReactionReport {
        let mut report = ReactionReport::default();
        while let Some(joined) = self.tasks.join_next().await {
            match joined {
                Ok(result) => report.outcomes.push(result),
                Err(e) => error!("Reaction task failed to complete: {}", e),
            }
        }
        report
    }
}
