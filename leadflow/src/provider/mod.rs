//! External intelligence provider: configuration, wire types, and client.

mod client;
mod config;

pub use client::{ChatMessage, ChatRequest, HttpProvider, Provider};
pub use config::ProviderConfig;
