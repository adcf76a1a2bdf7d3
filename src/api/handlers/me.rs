//! Current-identity endpoint.
//!
//! Flow Overview:
//! 1) Authenticate via the bearer header (offline claim validation).
//! 2) Resolve the subject's current row from the credential store.

use axum::{
    Json,
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::error;

use super::auth::{
    AuthError, AuthState, require_auth, storage,
    types::{MeData, MeResponse},
};
use super::internal_error;

#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "Return the authenticated user.", body = MeResponse),
        (status = 401, description = "Missing, invalid, or expired bearer token."),
    ),
    tag = "auth"
)]
pub async fn me(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
) -> impl IntoResponse {
    let principal = match require_auth(&headers, &auth_state) {
        Ok(principal) => principal,
        Err(err) => return err.into_response(),
    };

    match storage::fetch_user(&pool, principal.user_id).await {
        Ok(Some(user)) => (
            StatusCode::OK,
            Json(MeResponse {
                success: true,
                data: MeData { user },
            }),
        )
            .into_response(),
        // The subject may have been removed after the token was issued.
        Ok(None) => AuthError::Unauthenticated.into_response(),
        Err(err) => {
            error!("Failed to fetch current user: {err}");
            internal_error()
        }
    }
}
