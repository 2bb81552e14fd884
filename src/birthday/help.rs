use crate::core::templates::{MESSAGES_FILE, REACTIONS_FILE};

/// Static usage text for the help command.
#[must_use]
pub fn help_text(command: &str, announcement_channel: &str) -> String {
    format!(
        "🎉 *Birthday Bot Help* 🎉\n\n\
         *Usage:*\n\
         `{command} @username1` - Single birthday (posts to #{announcement_channel})\n\
         `{command} @user1, @user2` - Multiple birthdays (posts to #{announcement_channel})\n\
         `{command} --test @username` - Test mode (posts to your DM)\n\n\
         *Behavior:*\n\
         - Normal mode: Always posts to #{announcement_channel}\n\
         - Test mode (`--test` or `-t`): Posts to your DM for testing\n\n\
         *Configuration:*\n\
         - Edit `config/{MESSAGES_FILE}` for message templates\n\
         - Edit `config/{REACTIONS_FILE}` for reaction lists\n\
         - Changes take effect on the next command (no redeploy needed)\n\n\
         *Examples:*\n\
         `{command} @leem`\n\
         `{command} @leem, @slack_user_2`\n\
         `{command} --test @leem, @slack_user_2, @user3`"
    )
}
