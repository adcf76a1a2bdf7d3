//! Password login issuing scoped bearer tokens.

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::error;
use uuid::Uuid;

use super::{
    password,
    principal::AuthError,
    role::{Role, ScopeKind},
    state::AuthState,
    storage::{self, CredentialRow},
    token,
    types::{LoginData, LoginRequest, LoginResponse, UserSummary},
};
use crate::api::handlers::{internal_error, normalize_email, now_unix_seconds, valid_email};

/// Why a credential record could not be turned into an identity.
enum LoginFailure {
    /// Unknown email, wrong password, or inactive account; all three are
    /// indistinguishable in the response.
    InvalidCredentials,
    /// The stored record violates the role/scope invariants; never issue a
    /// token from it.
    Integrity(&'static str),
}

/// Decide whether a credential record and password yield a scoped identity.
fn authenticate(record: &CredentialRow, password: &str) -> Result<(Role, Option<Uuid>), LoginFailure> {
    if !password::verify(password, &record.password_hash) {
        return Err(LoginFailure::InvalidCredentials);
    }
    if !record.is_active {
        return Err(LoginFailure::InvalidCredentials);
    }

    let Some(role) = Role::parse(&record.role) else {
        return Err(LoginFailure::Integrity("unknown role"));
    };

    let scope = match role.scope_kind() {
        ScopeKind::College => record.college_id,
        ScopeKind::Incubator => record.incubator_id,
        ScopeKind::Global => None,
    };
    if scope.is_none() && role.scope_kind() != ScopeKind::Global {
        return Err(LoginFailure::Integrity("missing scope anchor"));
    }

    Ok((role, scope))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials accepted; token issued.", body = LoginResponse),
        (status = 401, description = "Unknown email, wrong password, or inactive account."),
    ),
    tag = "auth"
)]
pub async fn login(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    let email = normalize_email(&payload.email);
    if !valid_email(&email) {
        return AuthError::InvalidCredentials.into_response();
    }

    let user = match storage::find_user_by_email(&pool, &email).await {
        Ok(Some(user)) => user,
        Ok(None) => return AuthError::InvalidCredentials.into_response(),
        Err(err) => {
            error!("Failed to look up credentials: {err}");
            return internal_error();
        }
    };

    let (role, scope) = match authenticate(&user, &payload.password) {
        Ok(identity) => identity,
        Err(LoginFailure::InvalidCredentials) => {
            return AuthError::InvalidCredentials.into_response();
        }
        Err(LoginFailure::Integrity(reason)) => {
            error!(role = %user.role, reason, "Credential record failed integrity checks");
            return internal_error();
        }
    };

    let token = match token::issue(auth_state.config(), user.id, role, scope, now_unix_seconds()) {
        Ok(token) => token,
        Err(err) => {
            error!("Failed to issue token: {err}");
            return internal_error();
        }
    };

    let response = LoginResponse {
        success: true,
        data: LoginData {
            token,
            user: UserSummary {
                id: user.id.to_string(),
                email: user.email,
                role: role.as_str().to_string(),
                college_id: user.college_id.map(|id| id.to_string()),
                incubator_id: user.incubator_id.map(|id| id.to_string()),
            },
        },
    };
    (StatusCode::OK, Json(response)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn record(role: &str, is_active: bool, password: &str) -> Result<CredentialRow> {
        Ok(CredentialRow {
            id: Uuid::from_u128(7),
            email: "admin1@college1.edu".to_string(),
            password_hash: password::hash(password)?,
            role: role.to_string(),
            college_id: Some(Uuid::from_u128(1)),
            incubator_id: None,
            is_active,
        })
    }

    #[test]
    fn active_account_with_correct_password_authenticates() -> Result<()> {
        let record = record("college_admin", true, "password123")?;
        let identity = authenticate(&record, "password123");
        assert!(matches!(
            identity,
            Ok((Role::CollegeAdmin, Some(scope))) if scope == Uuid::from_u128(1)
        ));
        Ok(())
    }

    #[test]
    fn wrong_password_is_invalid_credentials() -> Result<()> {
        let record = record("college_admin", true, "password123")?;
        assert!(matches!(
            authenticate(&record, "password124"),
            Err(LoginFailure::InvalidCredentials)
        ));
        Ok(())
    }

    #[test]
    fn inactive_account_fails_even_with_correct_password() -> Result<()> {
        let record = record("college_admin", false, "password123")?;
        assert!(matches!(
            authenticate(&record, "password123"),
            Err(LoginFailure::InvalidCredentials)
        ));
        Ok(())
    }

    #[test]
    fn system_admin_authenticates_without_anchor() -> Result<()> {
        let mut record = record("system_admin", true, "password123")?;
        record.college_id = None;
        assert!(matches!(
            authenticate(&record, "password123"),
            Ok((Role::SystemAdmin, None))
        ));
        Ok(())
    }

    #[test]
    fn unknown_role_fails_closed() -> Result<()> {
        let record = record("superuser", true, "password123")?;
        assert!(matches!(
            authenticate(&record, "password123"),
            Err(LoginFailure::Integrity(_))
        ));
        Ok(())
    }

    #[test]
    fn scoped_role_without_anchor_fails_closed() -> Result<()> {
        let mut record = record("student", true, "password123")?;
        record.college_id = None;
        assert!(matches!(
            authenticate(&record, "password123"),
            Err(LoginFailure::Integrity(_))
        ));
        Ok(())
    }

    #[test]
    fn incubator_manager_uses_the_incubator_anchor() -> Result<()> {
        let mut record = record("incubator_manager", true, "password123")?;
        record.college_id = None;
        record.incubator_id = Some(Uuid::from_u128(9));
        assert!(matches!(
            authenticate(&record, "password123"),
            Ok((Role::IncubatorManager, Some(scope))) if scope == Uuid::from_u128(9)
        ));
        Ok(())
    }
}
