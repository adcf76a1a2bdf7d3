//! Authenticated principal extraction and authorization helpers.
//!
//! Flow Overview: read the bearer header, verify the token offline, and
//! return a principal carrying the embedded claims. The credential store is
//! NOT consulted here; claims are trusted until the token expires.

use axum::{
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
};
use tracing::warn;
use uuid::Uuid;

use super::{role::Role, state::AuthState, token, visibility::Visibility};
use crate::api::handlers::{failure, now_unix_seconds};

/// Authenticated caller context derived from verified token claims.
#[derive(Clone, Debug)]
pub struct Principal {
    pub user_id: Uuid,
    pub role: Role,
    pub scope: Option<Uuid>,
}

impl Principal {
    /// Resolve the caller's row-visibility predicate.
    ///
    /// # Errors
    ///
    /// Fails closed when a scoped role carries no anchor; that claim set can
    /// only come from a corrupted credential record.
    pub fn visibility(&self) -> Result<Visibility, AuthError> {
        match Visibility::for_role(self.role, self.scope) {
            Some(visibility) => Ok(visibility),
            None => {
                warn!(
                    role = self.role.as_str(),
                    "Principal is missing its scope anchor"
                );
                Err(AuthError::Unauthenticated)
            }
        }
    }
}

/// Authentication/authorization failures. All are terminal for the request;
/// the client alone decides whether to re-authenticate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// Missing, garbled, or unverifiable bearer token.
    Unauthenticated,
    /// Well-formed and well-signed token past its expiry; clients use the
    /// distinct message to trigger re-login.
    TokenExpired,
    /// Authenticated, but the role is not in the route's allowed set.
    Forbidden,
    /// Login failure. Deliberately identical for unknown email, wrong
    /// password, and inactive accounts.
    InvalidCredentials,
}

impl AuthError {
    const fn status(self) -> StatusCode {
        match self {
            Self::Unauthenticated | Self::TokenExpired | Self::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            Self::Forbidden => StatusCode::FORBIDDEN,
        }
    }

    const fn message(self) -> &'static str {
        match self {
            Self::Unauthenticated => "Authentication required.",
            Self::TokenExpired => "Token expired, please sign in again.",
            Self::Forbidden => "You do not have permission to perform this action.",
            Self::InvalidCredentials => "Invalid email or password.",
        }
    }
}

impl From<token::Error> for AuthError {
    fn from(err: token::Error) -> Self {
        match err {
            token::Error::Expired => Self::TokenExpired,
            token::Error::Malformed | token::Error::SignatureInvalid => Self::Unauthenticated,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        failure(self.status(), self.message())
    }
}

/// Resolve the bearer header into a principal, or return the 401 taxonomy.
///
/// Validation is synchronous and bounded; requests never block on it.
///
/// # Errors
///
/// Returns `Unauthenticated` for missing/garbled tokens and `TokenExpired`
/// for genuine tokens past their expiry.
pub fn require_auth(headers: &HeaderMap, auth_state: &AuthState) -> Result<Principal, AuthError> {
    let token = extract_bearer_token(headers).ok_or(AuthError::Unauthenticated)?;
    let claims = token::verify(auth_state.config(), &token, now_unix_seconds())?;
    Ok(Principal {
        user_id: claims.sub,
        role: claims.role,
        scope: claims.scope,
    })
}

/// Enforce a route's allowed-role set.
///
/// # Errors
///
/// Returns `Forbidden` when the principal's role is not in `allowed`.
pub fn require_role(principal: &Principal, allowed: &[Role]) -> Result<(), AuthError> {
    if allowed.contains(&principal.role) {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();
    let token = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
