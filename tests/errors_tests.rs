use std::error::Error;

use birthday_bot::errors::{CommandError, GENERIC_FAILURE_MESSAGE, SlackError};

#[test]
fn test_slack_error_implements_error_trait() {
    fn assert_error<T: Error>(_: &T) {}

    assert_error(&SlackError::ParseError("test error".to_string()));
    assert_error(&CommandError::NoRecipients);
}

#[test]
fn test_slack_error_display() {
    let error = SlackError::ApiError("API failed".to_string());
    assert_eq!(format!("{error}"), "Failed to access Slack API: API failed");

    let error = SlackError::platform("reactions.add", "not_in_channel");
    assert_eq!(
        format!("{error}"),
        "Slack API reactions.add returned error: not_in_channel"
    );

    let error = SlackError::HttpError("Connection error".to_string());
    assert_eq!(
        format!("{error}"),
        "Failed to send HTTP request: Connection error"
    );
}

#[test]
fn test_error_classification() {
    assert!(SlackError::platform("reactions.add", "channel_not_found").is_permission_failure());
    assert!(SlackError::platform("reactions.add", "not_in_channel").is_permission_failure());
    assert!(!SlackError::platform("reactions.add", "invalid_name").is_permission_failure());

    assert!(SlackError::platform("reactions.add", "already_reacted").is_already_reacted());

    assert!(SlackError::platform("conversations.list", "ratelimited").is_transient());
    assert!(SlackError::HttpError("reset".to_string()).is_transient());
    assert!(!SlackError::platform("chat.postMessage", "is_archived").is_transient());
    assert_eq!(SlackError::GeneralError("x".to_string()).code(), None);
}

#[test]
fn test_command_error_rejections() {
    assert!(CommandError::NoRecipients.is_rejection());
    assert!(CommandError::ChannelNotFound("announcements".to_string()).is_rejection());
    assert!(
        !CommandError::WrongDestination("test mode resolved to #general".to_string())
            .is_rejection()
    );
    assert!(
        !CommandError::Post(SlackError::platform("chat.postMessage", "is_archived"))
            .is_rejection()
    );
}

#[test]
fn test_command_error_user_messages() {
    let usage = CommandError::NoRecipients.user_message("/birthdaybot", "announcements");
    assert!(usage.contains("`/birthdaybot @username1, @username2`"));
    assert!(usage.contains("--test"));

    let missing = CommandError::ChannelNotFound("celebrations".to_string())
        .user_message("/birthdaybot", "celebrations");
    assert!(missing.contains("#celebrations"));

    let post = CommandError::Post(SlackError::HttpError("reset".to_string()))
        .user_message("/birthdaybot", "announcements");
    assert_eq!(post, GENERIC_FAILURE_MESSAGE);
}

#[test]
fn test_command_error_keeps_source() {
    let error = CommandError::ChannelLookup {
        name: "announcements".to_string(),
        source: SlackError::platform("conversations.list", "invalid_auth"),
    };
    let source = error.source().map(ToString::to_string);
    assert_eq!(
        source.as_deref(),
        Some("Slack API conversations.list returned error: invalid_auth")
    );
}

#[test]
fn test_slack_error_from_conversions() {
    #[allow(unused)]
    #[allow(clippy::items_after_statements)]
    fn _check_reqwest_conversion(err: reqwest::Error) -> SlackError {
        SlackError::from(err)
    }
}
