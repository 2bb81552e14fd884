//! Form-encoded slash command bodies.

use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Structure representing a Slack slash command event.
/// This contains all the fields that Slack sends when a user invokes a slash command.
#[derive(Debug, Deserialize, Serialize)]
pub struct SlackCommandEvent {
    pub token: String,
    pub team_id: String,
    pub team_domain: String,
    pub channel_id: String,
    pub channel_name: String,
    pub user_id: String,
    pub user_name: String,
    pub command: String,
    pub text: String,
    pub response_url: String,
    pub trigger_id: String,
    pub command_ts: String,
}

/// Decodes URL encoded string using `percent_encoding` crate
///
/// # Errors
///
/// Returns an error message if the decoded bytes are not valid UTF-8.
///
/// # Examples
///
/// ```
/// use birthday_bot::slack::command_parser::decode_url_component;
///
/// let decoded = decode_url_component("hello+%40leem").unwrap();
/// assert_eq!(decoded, "hello @leem");
/// ```
pub fn decode_url_component(input: &str) -> Result<String, String> {
    // `+` is a space in form encoding; swap before decoding so an encoded `%2B` survives.
    let spaced = input.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(|s| s.to_string())
        .map_err(|e| format!("Failed to decode URL component: {e}"))
}

/// Parses URL-encoded form data into a `SlackCommandEvent` structure.
/// Missing fields default to empty strings.
///
/// # Errors
///
/// Returns an error message if any key or value fails to decode.
///
/// # Examples
///
/// ```
/// use birthday_bot::slack::command_parser::parse_form_data;
///
/// let form_data = "channel_id=C123&user_id=U123&command=%2Fbirthdaybot&text=%40leem";
///
/// let event = parse_form_data(form_data).unwrap();
/// assert_eq!(event.command, "/birthdaybot");
/// assert_eq!(event.text, "@leem");
/// ```
pub fn parse_form_data(form_data: &str) -> Result<SlackCommandEvent, String> {
    let mut map: HashMap<String, String> = HashMap::new();

    for pair in form_data.split('&') {
        if let Some(idx) = pair.find('=') {
            let key = decode_url_component(&pair[..idx])
                .map_err(|e| format!("Failed to decode key: {e}"))?;

            let value = decode_url_component(&pair[idx + 1..])
                .map_err(|e| format!("Failed to decode value: {e}"))?;

            map.insert(key, value);
        }
    }

    let field = |name: &str| map.get(name).cloned().unwrap_or_default();

    Ok(SlackCommandEvent {
        token: field("token"),
        team_id: field("team_id"),
        team_domain: field("team_domain"),
        channel_id: field("channel_id"),
        channel_name: field("channel_name"),
        user_id: field("user_id"),
        user_name: field("user_name"),
        command: field("command"),
        text: field("text"),
        response_url: field("response_url"),
        trigger_id: field("trigger_id"),
        command_ts: field("command_ts"),
    })
}
