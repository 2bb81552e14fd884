use rand::Rng;
use rand::seq::SliceRandom;

use crate::core::templates::{Bucket, TemplateSet};

/// Used whenever the selected bucket has no templates.
pub const FALLBACK_MESSAGE: &str = "Happy birthday! 🎉";

pub const TEST_MODE_BANNER: &str = "🧪 *TEST MODE* 🧪";

/// Uniform pick from the bucket for `count` recipients.
pub fn choose_template<'a, R: Rng + ?Sized>(
    templates: &'a TemplateSet,
    count: usize,
    rng: &mut R,
) -> &'a str {
    templates
        .bucket(Bucket::for_count(count))
        .choose(rng)
        .map_or(FALLBACK_MESSAGE, String::as_str)
}

/// Slack's native mention syntax.
#[must_use]
pub fn mention(recipient: &str) -> String {
    format!("<@{recipient}>")
}

/// Fill `{user}`/`{user1}` with the first recipient and `{userN}` with the
/// N-th. Placeholders without a recipient stay as they are.
#[must_use]
pub fn fill_placeholders(template: &str, recipients: &[String]) -> String {
    let mut message = template.to_string();

    for (index, recipient) in recipients.iter().enumerate() {
        let rendered = mention(recipient);
        if index == 0 {
            message = message.replace("{user}", &rendered);
        }
        message = message.replace(&format!("{{user{}}}", index + 1), &rendered);
    }

    message
}

pub fn compose_message<R: Rng + ?Sized>(
    templates: &TemplateSet,
    recipients: &[String],
    rng: &mut R,
) -> String {
    let template = choose_template(templates, recipients.len(), rng);
    fill_placeholders(template, recipients)
}

#[must_use]
pub fn with_test_banner(message: &str) -> String {
    format!("{TEST_MODE_BANNER}\n{message}")
}
