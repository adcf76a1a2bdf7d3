//! API handlers and shared utilities for the portal.
//!
//! This module organizes the service's route handlers and provides common
//! functions for validation, clock access, and the response envelope used by
//! the frontend.

pub mod auth;
pub mod events;
pub mod health;
pub mod ideas;
pub mod me;
pub mod root;
pub mod students;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use utoipa::ToSchema;

/// Failure envelope returned by every non-2xx response.
///
/// The frontend only inspects `success` and `message`; no error internals are
/// ever serialized into it.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ApiFailure {
    pub success: bool,
    pub message: String,
}

/// Build a failure response with the portal envelope.
pub(crate) fn failure(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ApiFailure {
            success: false,
            message: message.to_string(),
        }),
    )
        .into_response()
}

/// Generic 500 used when storage fails; details stay in the server log.
pub(crate) fn internal_error() -> Response {
    failure(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error.")
}

/// Lightweight email sanity check used by the login handler before lookup.
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

/// Normalize an email for lookup/uniqueness checks.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Unix seconds for token issuance and TTL validation.
pub(crate) fn now_unix_seconds() -> i64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_email_accepts_simple() {
        assert!(valid_email("user@example.edu"));
        assert!(valid_email("name.surname@college1.edu"));
    }

    #[test]
    fn valid_email_rejects_missing_parts() {
        assert!(!valid_email("not-an-email"));
        assert!(!valid_email("missing-at.example.edu"));
        assert!(!valid_email("missing-domain@"));
    }

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email(" Admin1@College1.EDU "), "admin1@college1.edu");
    }

    #[test]
    fn now_unix_seconds_is_positive() {
        assert!(now_unix_seconds() > 0);
    }

    #[test]
    fn failure_envelope_shape() {
        let value = serde_json::to_value(ApiFailure {
            success: false,
            message: "Invalid email or password.".to_string(),
        })
        .ok();
        let Some(value) = value else {
            panic!("failure envelope did not serialize");
        };
        assert_eq!(value.get("success"), Some(&serde_json::Value::Bool(false)));
        assert_eq!(
            value.get("message").and_then(serde_json::Value::as_str),
            Some("Invalid email or password.")
        );
    }
}
