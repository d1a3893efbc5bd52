//! Discord bot that keeps named 3D coordinates for a game community.
//!
//! Four slash commands (search, add, list, delete) read and write a small
//! JSON file of place name → coordinate text. Deleting asks for a button
//! confirmation from the requesting user.

pub mod commands;
pub mod config;
pub mod discord;
pub mod error;
pub mod locale;
pub mod logging;
pub mod state;
pub mod store;
pub mod types;
