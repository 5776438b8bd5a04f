//! Server-rendered pages.
//!
//! Pages are thin Askama shells; the dashboard talks to the JSON API from the
//! browser. Access control for `/dashboard` is applied by
//! [`crate::api::middleware::auth_gate`].
//!
//! # Modules
//!
//! - [`handlers`] - Template rendering handlers
//! - [`routes`] - Page route configuration

pub mod handlers;
pub mod routes;
