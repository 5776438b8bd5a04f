//! Utility functions for code generation, URL processing, hashing and store calls.
//!
//! - [`code_generator`] - Short code generation and custom slug validation
//! - [`url_normalizer`] - Destination normalization and validation
//! - [`password`] - Argon2id password hashing
//! - [`store_call`] - Per-call store timeout

pub mod code_generator;
pub mod password;
pub mod store_call;
pub mod url_normalizer;
