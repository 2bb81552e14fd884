use thiserror::Error;

/// Slack error codes that mean the posting identity cannot see the conversation.
const PERMISSION_CODES: &[&str] = &["channel_not_found", "not_in_channel"];

/// Slack error codes worth another attempt after a short backoff.
const TRANSIENT_CODES: &[&str] = &[
    "ratelimited",
    "internal_error",
    "fatal_error",
    "request_timeout",
    "service_unavailable",
];

#[derive(Debug, Error)]
pub enum SlackError {
    #[error("Failed to parse Slack event: {0}")]
    ParseError(String),

    #[error("Failed to access Slack API: {0}")]
    ApiError(String),

    #[error("Slack API {method} returned error: {code}")]
    Platform { method: String, code: String },

    #[error("Failed to send HTTP request: {0}")]
    HttpError(String),

    #[error("Failed to interact with AWS services: {0}")]
    AwsError(String),

    #[error("{0}")]
    GeneralError(String),
}

impl SlackError {
    pub fn platform(method: &str, code: &str) -> Self {
        SlackError::Platform {
            method: method.to_string(),
            code: code.to_string(),
        }
    }

    /// The structured Slack error code, when the API reported one.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            SlackError::Platform { code, .. } => Some(code),
            _ => None,
        }
    }

    /// `channel_not_found` / `not_in_channel`: the caller is not a member.
    #[must_use]
    pub fn is_permission_failure(&self) -> bool {
        self.code().is_some_and(|c| PERMISSION_CODES.contains(&c))
    }

    #[must_use]
    pub fn is_already_reacted(&self) -> bool {
        self.code() == Some("already_reacted")
    }

    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            SlackError::HttpError(_) => true,
            SlackError::Platform { code, .. } => TRANSIENT_CODES.contains(&code.as_str()),
            _ => false,
        }
    }
}

impl From<reqwest::Error> for SlackError {
    fn from(error: reqwest::Error) -> Self {
        SlackError::HttpError(error.to_string())
    }
}

/// Terminal failures of a single birthday command.
///
/// Every variant maps to exactly one ephemeral reply for the invoker.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("no recipients found in command text")]
    NoRecipients,

    #[error("channel #{0} not found")]
    ChannelNotFound(String),

    #[error("failed to look up channel #{name}: {source}")]
    ChannelLookup {
        name: String,
        #[source]
        source: SlackError,
    },

    #[error("failed to open a direct message with {user_id}: {source}")]
    DirectMessageUnavailable {
        user_id: String,
        #[source]
        source: SlackError,
    },

    #[error("would have sent to the wrong place: {0}")]
    WrongDestination(String),

    #[error("failed to post message: {0}")]
    Post(#[source] SlackError),
}

pub const GENERIC_FAILURE_MESSAGE: &str =
    "Sorry, there was an error processing your birthday request. Please try again!";

impl CommandError {
    /// Rejections are the invoker's to fix; everything else is a failure on our side.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            CommandError::NoRecipients
                | CommandError::ChannelNotFound(_)
                | CommandError::DirectMessageUnavailable { .. }
        )
    }

    /// The ephemeral text shown to whoever ran `command`.
    #[must_use]
    pub fn user_message(&self, command: &str, announcement_channel: &str) -> String {
        match self {
            CommandError::NoRecipients => format!(
                "Please provide at least one username to celebrate! Usage: `{command} @username1, @username2`\n\n\
                 Add `--test` or `-t` to send a test to your DM instead of #{announcement_channel}."
            ),
            CommandError::ChannelNotFound(name) => format!(
                "I couldn't find the #{name} channel, so nothing was posted. \
                 Please ask an admin to check the bot configuration."
            ),
            CommandError::ChannelLookup { name, .. } => format!(
                "I couldn't look up the #{name} channel, so nothing was posted. Please try again!"
            ),
            CommandError::DirectMessageUnavailable { .. } => {
                "I couldn't open a direct message with you, so the test message was not sent."
                    .to_string()
            }
            CommandError::WrongDestination(_) => {
                "Internal error: this message would have been sent to the wrong place, so nothing was posted."
                    .to_string()
            }
            CommandError::Post(_) => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}
