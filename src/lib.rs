//! Pokedeck - a command-line client for the Pokemon card-collection game.
//!
//! This library provides the core functionality for the pokedeck CLI:
//! credential validation, bearer-token session handling, the game API
//! client, and the game flows built on top of them.

pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod deck;
pub mod flows;
pub mod models;
pub mod notify;
pub mod session;
pub mod transcript;
pub mod validation;

#[cfg(test)]
pub mod test_utils;

// Re-export Args for the binary
pub use cli::Args;
