//! Message templates and reaction lists, loaded from disk and hot-reloadable.
//!
//! Each invocation takes one [`ConfigSnapshot`] via [`TemplateStore::snapshot`]
//! and keeps it for the whole request, so a concurrent reload never produces a
//! torn read.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{error, info};

pub const MESSAGES_FILE: &str = "messages.json";
pub const REACTIONS_FILE: &str = "reactions.json";

pub const DEFAULT_BOT_NAME: &str = "Birthday Bot";
pub const DEFAULT_BOT_ICON: &str = ":birthday:";

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct PostingSettings {
    pub post_as_user: bool,
    pub bot_name: Option<String>,
    pub bot_icon: Option<String>,
}

impl PostingSettings {
    #[must_use]
    pub fn bot_name(&self) -> &str {
        self.bot_name.as_deref().unwrap_or(DEFAULT_BOT_NAME)
    }

    #[must_use]
    pub fn bot_icon(&self) -> &str {
        self.bot_icon.as_deref().unwrap_or(DEFAULT_BOT_ICON)
    }
}

/// Recipient-count bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Single,
    Double,
    Multiple,
}

impl Bucket {
    #[must_use]
    pub fn for_count(count: usize) -> Self {
        match count {
            0 | 1 => Bucket::Single,
            2 => Bucket::Double,
            _ => Bucket::Multiple,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TemplateSet {
    pub single: Vec<String>,
    pub double: Vec<String>,
    pub multiple: Vec<String>,
    pub settings: PostingSettings,
}

impl TemplateSet {
    #[must_use]
    pub fn bucket(&self, bucket: Bucket) -> &[String] {
        match bucket {
            Bucket::Single => &self.single,
            Bucket::Double => &self.double,
            Bucket::Multiple => &self.multiple,
        }
    }

    #[must_use]
    pub fn builtin() -> Self {
        Self {
            single: vec!["Happy birthday, {user}! 🎉".to_string()],
            double: vec!["Happy birthday, {user1} and {user2}! 🎉".to_string()],
            multiple: vec!["Happy birthday to {user1}, {user2}, and {user3}! 🎉".to_string()],
            settings: PostingSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReactionSet {
    pub favorites: Vec<String>,
    pub additional: Vec<String>,
}

impl ReactionSet {
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            favorites: to_strings(&["tada", "birthday", "balloon", "partying_face"]),
            additional: to_strings(&["confetti_ball", "gift", "sparkles", "star2"]),
        }
    }

    /// Bare lowercase names, so `:Tada:` and `tada` are the same reaction.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            favorites: self.favorites.iter().map(|r| normalize_reaction(r)).collect(),
            additional: self.additional.iter().map(|r| normalize_reaction(r)).collect(),
        }
    }
}

#[must_use]
pub fn normalize_reaction(name: &str) -> String {
    name.trim().trim_matches(':').to_lowercase()
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// Immutable view of both documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSnapshot {
    pub templates: TemplateSet,
    pub reactions: ReactionSet,
}

impl ConfigSnapshot {
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            templates: TemplateSet::builtin(),
            reactions: ReactionSet::builtin(),
        }
    }
}

pub struct TemplateStore {
    dir: PathBuf,
    current: ArcSwap<ConfigSnapshot>,
}

impl TemplateStore {
    /// Read both documents from `dir`. Never fails: a missing or malformed
    /// document is replaced by the built-in default.
    #[must_use]
    pub fn load(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let snapshot = read_snapshot(&dir);
        Self {
            dir,
            current: ArcSwap::from_pointee(snapshot),
        }
    }

    /// A store that never touches disk on reload.
    #[must_use]
    pub fn from_snapshot(snapshot: ConfigSnapshot) -> Self {
        Self {
            dir: PathBuf::new(),
            current: ArcSwap::from_pointee(snapshot),
        }
    }

    pub fn reload(&self) {
        if self.dir.as_os_str().is_empty() {
            return;
        }
        self.current.store(Arc::new(read_snapshot(&self.dir)));
        info!("Reloaded templates and reactions from {}", self.dir.display());
    }

    #[must_use]
    pub fn snapshot(&self) -> Arc<ConfigSnapshot> {
        self.current.load_full()
    }
}

fn read_snapshot(dir: &Path) -> ConfigSnapshot {
    let templates = read_document(&dir.join(MESSAGES_FILE)).unwrap_or_else(TemplateSet::builtin);
    let reactions = read_document::<ReactionSet>(&dir.join(REACTIONS_FILE))
        .unwrap_or_else(ReactionSet::builtin)
        .normalized();
    ConfigSnapshot {
        templates,
        reactions,
    }
}

fn read_document<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) => {
            error!("Error loading {}: {}", path.display(), e);
            return None;
        }
    };
    match serde_json::from_str(&data) {
        Ok(doc) => Some(doc),
        Err(e) => {
            error!("Error parsing {}: {}", path.display(), e);
            None
        }
    }
}
