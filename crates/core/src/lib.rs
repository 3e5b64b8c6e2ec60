//! Shared types for the Medley bot.
//!
//! `errors` holds the error taxonomy used across the workspace, `models` the
//! JSON shapes of every third-party API the bot talks to, and `text` the small
//! formatting helpers shared by the Discord handlers and the web server.

pub mod errors;
pub mod models;
pub mod text;
