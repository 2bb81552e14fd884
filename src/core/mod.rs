//! Configuration, data model and the template store.

pub mod config;
pub mod models;
pub mod templates;
