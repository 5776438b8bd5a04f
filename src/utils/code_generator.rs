//! Short code generation and validation utilities.

use crate::error::AppError;
use rand::Rng;
use rand::distr::Alphanumeric;
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

/// Length of generated codes.
pub const GENERATED_CODE_LENGTH: usize = 6;

static CUSTOM_SLUG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9-]{3,20}$").expect("valid slug regex"));

/// Codes that would shadow application routes.
const RESERVED_CODES: &[&str] = &[
    "api",
    "dashboard",
    "login",
    "register",
    "learn-more",
    "not-found",
    "health",
    "verify-email",
    "static",
];

/// Generates a random code of [`GENERATED_CODE_LENGTH`] ASCII alphanumerics.
///
/// Reserved route names are redrawn. Uniqueness is not checked here; the
/// store's unique index is the arbiter and collisions are retried by the
/// caller.
pub fn generate_code() -> String {
    let mut rng = rand::rng();
    first_unreserved(|| {
        (&mut rng)
            .sample_iter(&Alphanumeric)
            .take(GENERATED_CODE_LENGTH)
            .map(char::from)
            .collect()
    })
}

fn first_unreserved(mut draw: impl FnMut() -> String) -> String {
    loop {
        let code = draw();
        if !is_reserved(&code) {
            return code;
        }
    }
}

fn is_reserved(code: &str) -> bool {
    RESERVED_CODES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(code))
}

/// Validates the shape of a caller-supplied slug.
///
/// # Rules
///
/// - 3-20 characters from `[A-Za-z0-9-]`
/// - Not a reserved route name (case-insensitive)
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_custom_slug(slug: &str) -> Result<(), AppError> {
    if !CUSTOM_SLUG_REGEX.is_match(slug) {
        return Err(AppError::bad_request(
            "Custom slug must be 3-20 letters, digits or hyphens",
            json!({ "slug": slug }),
        ));
    }

    if is_reserved(slug) {
        return Err(AppError::bad_request(
            "This slug is reserved",
            json!({ "slug": slug }),
        ));
    }

    Ok(())
}
