//! The birthday command pipeline: parse, compose, pick reactions, resolve the
//! destination, post, then decorate the post with reactions.

pub mod applier;
pub mod composer;
pub mod help;
pub mod orchestrator;
pub mod parser;
pub mod reactions;
pub mod resolver;

pub use applier::{ReactionHandle, ReactionOutcome, ReactionPacing, ReactionReport};
pub use orchestrator::{BirthdayCommand, CommandOutcome, Delivery};
pub use parser::parse_command;
