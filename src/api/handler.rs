//! API Lambda handler - thin router that delegates to specialized handlers.
//!
//! This module handles:
//! - The unsigned health check
//! - Request validation (headers, body, signature)
//! - Slash commands (delegated to `slash_handler` module)

use super::{helpers, parsing, signature, slash_handler};
use crate::core::config::AppConfig;
use lambda_runtime::{Error, LambdaEvent};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};

pub use self::function_handler as handler;

pub const HEALTH_MESSAGE: &str = "Birthday Bot is running! 🎉";

/// Lambda handler for the API entrypoint.
///
/// # Errors
///
/// Returns an error if configuration is missing; malformed or unsigned
/// requests get a 4xx response payload instead.
#[tracing::instrument(level = "info", skip(event))]
pub async fn function_handler(
    event: LambdaEvent<serde_json::Value>,
) -> Result<impl Serialize, Error> {
    if parsing::request_path(&event.payload).is_some_and(|p| p.ends_with("/health")) {
        return Ok(helpers::ok_text(HEALTH_MESSAGE));
    }

    let config = AppConfig::from_env().map_err(|e| {
        error!("Config error: {}", e);
        Error::from(e)
    })?;

    Ok(route_signed_request(&config, &event.payload).await)
}

async fn route_signed_request(config: &AppConfig, payload: &Value) -> Value {
    let Some(headers) = payload.get("headers") else {
        error!("Request missing headers");
        return helpers::err_response(400, "Missing headers");
    };

    let body = match extract_body(payload) {
        Ok(b) => b,
        Err(response) => return response,
    };

    if let Err(response) = verify_signature(body, headers, config) {
        return response;
    }

    info!("Slack signature verified successfully");

    match slash_handler::handle_slash_command(config, body).await {
        Ok(response) => response,
        Err(e) => {
            error!("Failed to parse Slack event: {}", e);
            helpers::err_response(400, &format!("Parse Error: {e}"))
        }
    }
}

fn extract_body(payload: &Value) -> Result<&str, Value> {
    let Some(body) = payload.get("body") else {
        error!("Request missing body");
        return Err(helpers::err_response(400, "Missing body"));
    };

    let Some(body_str) = body.as_str() else {
        error!("Request body is not a string");
        return Err(helpers::err_response(400, "Invalid body format"));
    };

    Ok(body_str)
}

fn verify_signature(body: &str, headers: &Value, config: &AppConfig) -> Result<(), Value> {
    let Some(sig) = parsing::get_header_value(headers, "X-Slack-Signature") else {
        error!("Missing X-Slack-Signature header");
        return Err(helpers::err_response(
            401,
            "Missing X-Slack-Signature header",
        ));
    };

    let Some(timestamp) = parsing::get_header_value(headers, "X-Slack-Request-Timestamp") else {
        error!("Missing X-Slack-Request-Timestamp header");
        return Err(helpers::err_response(
            401,
            "Missing X-Slack-Request-Timestamp header",
        ));
    };

    if !signature::verify_slack_signature(body, timestamp, sig, &config.slack_signing_secret) {
        error!("Slack signature verification failed");
        return Err(helpers::err_response(401, "Invalid Slack signature"));
    }

    Ok(())
}
