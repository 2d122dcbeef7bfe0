//! masroufi-assistant
//!
//! The AI-assistant relay: prompt assembly, the upstream chat-completion
//! client, and the client used to invoke the deployed relay.

pub mod error;
pub mod invoke;
pub mod prompt;
pub mod proxy;
pub mod upstream;
