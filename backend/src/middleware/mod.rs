//! Request middleware.
//!
//! Purpose: request lifecycle concerns that sit in front of every handler:
//! trace correlation and the basic-auth gate.

pub mod basic_auth;
pub mod trace;

pub use basic_auth::{BasicAuth, BasicCredentials};
pub use trace::Trace;
