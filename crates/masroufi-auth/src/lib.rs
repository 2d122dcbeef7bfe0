//! masroufi-auth
//!
//! Sign-up, sign-in and sign-out against the hosted auth service, and local
//! validation of the session tokens it issues.

pub mod client;
pub mod error;
pub mod flows;
pub mod jwt;
