use serde_json::Value;

use crate::errors::SlackError;
use crate::slack::command_parser::{SlackCommandEvent, parse_form_data};

/// # Errors
///
/// Returns `ParseError` if the form body cannot be decoded.
pub fn parse_slack_event(payload: &str) -> Result<SlackCommandEvent, SlackError> {
    parse_form_data(payload)
        .map_err(|e| SlackError::ParseError(format!("Failed to parse form data: {e}")))
}

/// Case-insensitive header lookup; API Gateway and function URLs disagree on casing.
pub fn get_header_value<'a>(headers: &'a Value, name: &str) -> Option<&'a str> {
    if let Some(v) = headers.get(name).and_then(|s| s.as_str()) {
        return Some(v);
    }
    headers.as_object().and_then(|map| {
        map.iter().find_map(|(k, v)| {
            if k.eq_ignore_ascii_case(name) {
                v.as_str()
            } else {
                None
            }
        })
    })
}

/// `rawPath` (function URLs, HTTP APIs) or `path` (REST APIs).
pub fn request_path(payload: &Value) -> Option<&str> {
    payload
        .get("rawPath")
        .and_then(Value::as_str)
        .or_else(|| payload.get("path").and_then(Value::as_str))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn header_lookup_ignores_case() {
        let headers = json!({ "x-slack-signature": "v0=abc" });
        assert_eq!(
            get_header_value(&headers, "X-Slack-Signature"),
            Some("v0=abc")
        );
        assert_eq!(get_header_value(&headers, "X-Missing"), None);
    }

    #[test]
    fn path_prefers_raw_path() {
        let payload = json!({ "rawPath": "/prod/health", "path": "/health" });
        assert_eq!(request_path(&payload), Some("/prod/health"));

        let rest = json!({ "path": "/slack/commands" });
        assert_eq!(request_path(&rest), Some("/slack/commands"));
    }
}
