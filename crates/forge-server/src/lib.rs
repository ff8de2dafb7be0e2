// crates/forge-server/src/lib.rs
// Persona Forge - Telegram bot persona generator and chat preview

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod app;
pub mod chat;
pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod llm;
pub mod persona;
pub mod web;

#[cfg(test)]
pub(crate) mod test_utils;

pub use app::ForgeApp;
pub use error::{ForgeError, Result};
