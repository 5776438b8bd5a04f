//! Data Transfer Objects for API requests and responses.
//!
//! JSON bodies use camelCase field names. Request DTOs are checked with
//! `validator` before they reach a service.

pub mod auth;
pub mod health;
pub mod shorturl;
