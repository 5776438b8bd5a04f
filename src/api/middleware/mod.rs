//! HTTP middleware for request processing and protection.
//!
//! - [`auth_gate`] - route classification and session enforcement
//! - [`tracing`] - request spans and response logging

pub mod auth_gate;
pub mod tracing;
