//! Handler for the birthday slash commands (`/birthdaybot`, `/birthdaybot-help`).

use serde_json::Value;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::helpers::{ok_empty, ok_ephemeral};
use super::parsing::parse_slack_event;
use super::sqs;
use crate::birthday::help::help_text;
use crate::core::config::AppConfig;
use crate::core::models::CommandTask;
use crate::errors::SlackError;
use crate::slack::command_parser::SlackCommandEvent;

/// What the API function does with a verified command.
#[derive(Debug)]
pub enum SlashRoute {
    /// Answer inline; nothing is queued.
    Help(String),
    /// Hand to the worker.
    Enqueue(CommandTask),
    /// Not one of ours; answered inline with a pointer to help.
    Unsupported(String),
}

#[must_use]
pub fn route_command(config: &AppConfig, event: &SlackCommandEvent) -> SlashRoute {
    if event.command == config.help_command_name() {
        return SlashRoute::Help(help_text(&config.command_name, &config.announcement_channel));
    }

    if event.command != config.command_name {
        return SlashRoute::Unsupported(format!(
            "Unknown command `{}`. Try `{}` for usage.",
            event.command,
            config.help_command_name()
        ));
    }

    SlashRoute::Enqueue(CommandTask {
        correlation_id: Uuid::new_v4().to_string(),
        command: event.command.clone(),
        text: event.text.clone(),
        user_id: event.user_id.clone(),
        channel_id: event.channel_id.clone(),
        response_url: event.response_url.clone(),
    })
}

/// Handle a slash command from Slack.
///
/// The returned 200 is Slack's acknowledgement; the celebration itself runs
/// in the worker.
///
/// # Errors
///
/// Returns an error if the body cannot be parsed.
pub async fn handle_slash_command(config: &AppConfig, body: &str) -> Result<Value, SlackError> {
    let slack_event = parse_slack_event(body)?;

    match route_command(config, &slack_event) {
        SlashRoute::Help(text) => Ok(ok_ephemeral(&text)),
        SlashRoute::Unsupported(text) => {
            warn!("Ignoring unsupported command {}", slack_event.command);
            Ok(ok_ephemeral(&text))
        }
        SlashRoute::Enqueue(task) => {
            info!(
                "Queueing {} from {} (correlation_id={})",
                task.command, task.user_id, task.correlation_id
            );
            if let Err(e) = sqs::send_to_sqs(&task, config).await {
                error!(
                    "Failed to enqueue task (correlation_id={}): {}",
                    task.correlation_id, e
                );
                let short_ref: String = task.correlation_id.chars().take(8).collect();
                return Ok(ok_ephemeral(&format!(
                    "Failed to start the birthday celebration. Please try again. (ref: {short_ref})"
                )));
            }
            Ok(ok_empty())
        }
    }
}
