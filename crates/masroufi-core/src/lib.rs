//! masroufi-core
//!
//! Pure domain types, the financial context summarizer, and the
//! application-state reducer. No network or backend dependency: this is the
//! shared vocabulary of the Masroufi system.

pub mod conversation;
pub mod error;
pub mod models;
pub mod state;
pub mod summary;
