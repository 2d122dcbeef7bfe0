//! masroufi-client
//!
//! The signed-in session: wires the data adapter, the assistant relay and
//! the client state together.

pub mod assistant;
pub mod error;
pub mod session;

pub use session::{AuthEvent, Session};
