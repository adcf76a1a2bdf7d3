//! Credential store lookups.
//!
//! Authentication only reads this table; identity creation and password
//! updates happen through administrative tooling outside this service.

use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::types::UserSummary;

pub(crate) struct CredentialRow {
    pub(crate) id: Uuid,
    pub(crate) email: String,
    pub(crate) password_hash: String,
    pub(crate) role: String,
    pub(crate) college_id: Option<Uuid>,
    pub(crate) incubator_id: Option<Uuid>,
    pub(crate) is_active: bool,
}

/// Fetch the credential record for a normalized email, if any.
pub(crate) async fn find_user_by_email(
    pool: &PgPool,
    email: &str,
) -> Result<Option<CredentialRow>, sqlx::Error> {
    let query = r"
        SELECT id, email, password_hash, role, college_id, incubator_id, is_active
        FROM users
        WHERE email = $1
        LIMIT 1
    ";
    let row = sqlx::query(query).bind(email).fetch_optional(pool).await?;
    Ok(row.map(|row| CredentialRow {
        id: row.get("id"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        role: row.get("role"),
        college_id: row.get("college_id"),
        incubator_id: row.get("incubator_id"),
        is_active: row.get("is_active"),
    }))
}

/// Fetch the profile for an authenticated subject.
///
/// Token validation never re-reads this table, so a row may have been
/// deactivated or removed since issuance; `None` means the subject is gone.
pub(crate) async fn fetch_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<UserSummary>, sqlx::Error> {
    let query = r"
        SELECT
            id::text AS id,
            email,
            role,
            college_id::text AS college_id,
            incubator_id::text AS incubator_id
        FROM users
        WHERE id = $1
        LIMIT 1
    ";
    let row = sqlx::query(query).bind(user_id).fetch_optional(pool).await?;
    Ok(row.map(|row| UserSummary {
        id: row.get("id"),
        email: row.get("email"),
        role: row.get("role"),
        college_id: row.get("college_id"),
        incubator_id: row.get("incubator_id"),
    }))
}
