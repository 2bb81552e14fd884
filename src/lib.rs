/// Birthday Bot - A Slack bot that posts birthday celebrations and decorates them with reactions.
///
/// This crate implements a two-Lambda architecture:
/// 1. An API Lambda that receives and verifies Slack slash commands, answers help
///    requests inline, and queues everything else
/// 2. A Worker Lambda that parses the command, composes the message, posts it to the
///    announcement channel (or the invoker's DM in test mode), and adds reactions
///
/// # Architecture
///
/// The system uses:
/// - AWS Lambda for serverless execution
/// - SQS for task queuing between Lambdas
/// - slack-morphism and the Slack Web API for posting, joining and reacting
/// - Tokio for async runtime and paced reaction tasks
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
///
/// use birthday_bot::birthday::BirthdayCommand;
/// use birthday_bot::core::models::Invocation;
/// use birthday_bot::core::templates::TemplateStore;
/// use birthday_bot::slack::{Identities, ResponseUrlResponder, SlackClient};
///
/// #[tokio::main]
/// async fn main() {
///     birthday_bot::setup_logging();
///
///     let identities = Identities::new(Arc::new(SlackClient::service("xoxb-dummy".to_string())));
///     let store = Arc::new(TemplateStore::load("config"));
///     let command = BirthdayCommand::new(identities, store, "/birthdaybot", "announcements");
///
///     let responder = ResponseUrlResponder::new(
///         reqwest::Client::new(),
///         "https://hooks.slack.com/commands/T1/1/abc",
///     );
///     let invocation = Invocation {
///         text: "@leem --test".to_string(),
///         invoker_id: "U12345678".to_string(),
///         invocation_channel_id: "C12345678".to_string(),
///     };
///
///     if let birthday_bot::birthday::CommandOutcome::Completed(delivery) =
///         command.handle(&invocation, &responder).await
///     {
///         let report = delivery.reactions.wait().await;
///         println!("{} reactions applied", report.applied());
///     }
/// }
/// ```
// Module declarations
pub mod api;
pub mod birthday;
pub mod core;
pub mod errors;
pub mod slack;
pub mod worker;

pub use errors::{CommandError, SlackError};

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// Log level comes from `RUST_LOG` and defaults to `info`. Calling this more than
/// once is harmless; only the first call installs the subscriber.
///
/// # Example
///
/// ```
/// birthday_bot::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
