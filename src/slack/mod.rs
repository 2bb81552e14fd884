//! All Slack-specific functionality

pub mod client;
pub mod command_parser;
pub mod platform;
pub mod responder;
pub mod response_builder;

// Re-export main types for convenience
pub use client::SlackClient;
pub use platform::{
    ChannelSummary, ChatPlatform, Identities, MessagePresentation, PostedMessage, choose_poster,
};
pub use responder::{CommandResponder, ResponseUrlResponder};
