//! REST API layer for HTTP request/response handling.
//!
//! This layer translates HTTP requests into service calls and formats
//! responses according to API contracts.
//!
//! # Modules
//!
//! - [`dto`] - Data Transfer Objects for request/response serialization
//! - [`extractors`] - Client metadata and session user extraction
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Session gate and request tracing
//! - [`routes`] - Route configuration and composition
//! - [`session_cookie`] - `sessionId` cookie construction

pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod session_cookie;
