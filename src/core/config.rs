use std::env;
use std::path::PathBuf;

pub const DEFAULT_COMMAND_NAME: &str = "/birthdaybot";
pub const DEFAULT_ANNOUNCEMENT_CHANNEL: &str = "announcements";
pub const DEFAULT_CONFIG_DIR: &str = "config";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub processing_queue_url: String,
    pub slack_signing_secret: String,
    pub slack_bot_token: String,
    pub slack_user_token: Option<String>,
    pub command_name: String,
    pub announcement_channel: String,
    pub config_dir: PathBuf,
}

impl AppConfig {
    /// # Errors
    ///
    /// Returns the name of the first required variable that is missing.
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            processing_queue_url: env::var("PROCESSING_QUEUE_URL")
                .map_err(|e| format!("PROCESSING_QUEUE_URL: {e}"))?,
            slack_signing_secret: env::var("SLACK_SIGNING_SECRET")
                .map_err(|e| format!("SLACK_SIGNING_SECRET: {e}"))?,
            slack_bot_token: env::var("SLACK_BOT_TOKEN")
                .map_err(|e| format!("SLACK_BOT_TOKEN: {e}"))?,
            slack_user_token: env::var("SLACK_USER_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty()),
            command_name: env::var("SLACK_COMMAND_NAME")
                .unwrap_or_else(|_| DEFAULT_COMMAND_NAME.to_string()),
            announcement_channel: normalize_channel_name(
                &env::var("ANNOUNCEMENT_CHANNEL")
                    .unwrap_or_else(|_| DEFAULT_ANNOUNCEMENT_CHANNEL.to_string()),
            ),
            config_dir: env::var("BIRTHDAY_CONFIG_DIR")
                .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_DIR), PathBuf::from),
        })
    }

    /// `/birthdaybot` -> `/birthdaybot-help`
    #[must_use]
    pub fn help_command_name(&self) -> String {
        format!("{}-help", self.command_name)
    }
}

/// Strip surrounding whitespace and a leading `#`.
#[must_use]
pub fn normalize_channel_name(name: &str) -> String {
    name.trim().trim_start_matches('#').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_channel_names() {
        assert_eq!(normalize_channel_name("#announcements"), "announcements");
        assert_eq!(normalize_channel_name("  general "), "general");
    }

    #[test]
    fn help_command_is_derived_from_command_name() {
        let config = AppConfig {
            processing_queue_url: String::new(),
            slack_signing_secret: String::new(),
            slack_bot_token: String::new(),
            slack_user_token: None,
            command_name: "/cake".to_string(),
            announcement_channel: DEFAULT_ANNOUNCEMENT_CHANNEL.to_string(),
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
        };
        assert_eq!(config.help_command_name(), "/cake-help");
    }
}
