//! masroufi-store
//!
//! Data access for the hosted backend. Entities cross this boundary through
//! explicit row mappings; the backend itself sits behind the [`Backend`]
//! trait so tests can run against the in-memory implementation.

pub mod access;
pub mod backend;
pub mod changes;
pub mod error;
pub mod memory;
pub mod rest;
pub mod rows;

pub use access::DataAccess;
pub use backend::{Backend, Table};
