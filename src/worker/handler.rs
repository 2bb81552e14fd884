use std::path::Path;
use std::sync::{Arc, OnceLock};

use lambda_runtime::{Error, LambdaEvent};
use reqwest::Client as HttpClient;
use serde_json::Value;
use tracing::{error, info};

use crate::birthday::{BirthdayCommand, CommandOutcome, ReactionReport};
use crate::core::config::AppConfig;
use crate::core::models::CommandTask;
use crate::core::templates::TemplateStore;
use crate::slack::{CommandResponder, Identities, ResponseUrlResponder, SlackClient};

/// Survives across warm invocations; reloaded at the start of each one.
static TEMPLATE_STORE: OnceLock<Arc<TemplateStore>> = OnceLock::new();

fn template_store(config: &AppConfig) -> Arc<TemplateStore> {
    shared_store(&TEMPLATE_STORE, &config.config_dir)
}

/// Load on first use; every later call re-reads the documents.
fn shared_store(cell: &OnceLock<Arc<TemplateStore>>, dir: &Path) -> Arc<TemplateStore> {
    if let Some(store) = cell.get() {
        store.reload();
        return Arc::clone(store);
    }
    Arc::clone(cell.get_or_init(|| Arc::new(TemplateStore::load(dir))))
}

#[must_use]
pub fn build_identities(config: &AppConfig) -> Identities {
    let identities = Identities::new(Arc::new(SlackClient::service(
        config.slack_bot_token.clone(),
    )));
    match &config.slack_user_token {
        Some(token) => {
            identities.with_impersonation(Arc::new(SlackClient::impersonation(token.clone())))
        }
        None => identities,
    }
}

/// Pull the `CommandTask` out of the first SQS record.
///
/// # Errors
///
/// Returns a description of what was missing or malformed.
pub fn parse_task(payload: &Value) -> Result<CommandTask, String> {
    let body = payload
        .get("Records")
        .and_then(|records| records.as_array())
        .and_then(|records| records.first())
        .and_then(|record| record.get("body"))
        .and_then(|body| body.as_str())
        .ok_or_else(|| "Failed to extract SQS message body".to_string())?;

    serde_json::from_str(body)
        .map_err(|e| format!("Failed to parse SQS message body into CommandTask: {e}"))
}

/// Run one task to the end, including its reactions. The invoker has
/// already been answered by the time this waits on reactions.
pub async fn run_task(
    command: &BirthdayCommand,
    task: &CommandTask,
    responder: &dyn CommandResponder,
) -> Option<ReactionReport> {
    match command.handle(&task.invocation(), responder).await {
        CommandOutcome::Completed(delivery) => {
            let report = delivery.reactions.wait().await;
            info!(
                correlation_id = %task.correlation_id,
                applied = report.applied(),
                dropped = report.dropped(),
                "Reactions finished for message {}",
                delivery.posted.ts
            );
            Some(report)
        }
        CommandOutcome::Rejected(e) | CommandOutcome::Failed(e) => {
            info!(correlation_id = %task.correlation_id, "Command ended without posting: {}", e);
            None
        }
        CommandOutcome::Unacknowledged => None,
    }
}

/// Lambda handler for the Worker entrypoint. Parses the SQS message and runs the command.
///
/// # Errors
///
/// Returns an error only for missing configuration or an unreadable task;
/// command failures are reported to the invoker and never retried.
#[tracing::instrument(level = "info", skip(event))]
pub async fn function_handler(event: LambdaEvent<Value>) -> Result<(), Error> {
    let config = AppConfig::from_env().map_err(|e| {
        error!("Config error: {}", e);
        Error::from(e)
    })?;

    let task = parse_task(&event.payload).map_err(|e| {
        error!("{}", e);
        Error::from(e)
    })?;
    info!(
        correlation_id = %task.correlation_id,
        "Worker received {} from {}",
        task.command,
        task.user_id
    );

    let command = BirthdayCommand::new(
        build_identities(&config),
        template_store(&config),
        &config.command_name,
        &config.announcement_channel,
    );
    let responder = ResponseUrlResponder::new(HttpClient::new(), &task.response_url);

    run_task(&command, &task, &responder).await;
    Ok(())
}

pub use self::function_handler as handler;
