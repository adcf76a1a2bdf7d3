//! Student directory endpoint.
//!
//! Restricted to administrative roles; students and mentors cannot browse
//! the directory. Listing applies the caller's [`Visibility`], so a college
//! admin sees their college's students and an incubator manager sees
//! students attached to their incubator.

use axum::{
    Json,
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Row};
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;

use super::auth::{AuthState, Role, Visibility, require_auth, require_role};
use super::internal_error;

const STUDENT_DIRECTORY_ROLES: [Role; 4] = [
    Role::CollegeAdmin,
    Role::CollegeCoordinator,
    Role::IncubatorManager,
    Role::SystemAdmin,
];

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct StudentResponse {
    pub id: String,
    pub email: String,
    pub college_id: Option<String>,
    pub created_at: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct StudentListResponse {
    pub success: bool,
    pub data: Vec<StudentResponse>,
}

#[utoipa::path(
    get,
    path = "/students",
    responses(
        (status = 200, description = "Students visible to the caller.", body = StudentListResponse),
        (status = 401, description = "Missing, invalid, or expired bearer token."),
        (status = 403, description = "Role may not browse the student directory."),
    ),
    tag = "portal"
)]
pub async fn list_students(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
) -> impl IntoResponse {
    let principal = match require_auth(&headers, &auth_state) {
        Ok(principal) => principal,
        Err(err) => return err.into_response(),
    };
    if let Err(err) = require_role(&principal, &STUDENT_DIRECTORY_ROLES) {
        return err.into_response();
    }
    let visibility = match principal.visibility() {
        Ok(visibility) => visibility,
        Err(err) => return err.into_response(),
    };

    match fetch_students(&pool, &visibility).await {
        Ok(data) => (
            StatusCode::OK,
            Json(StudentListResponse {
                success: true,
                data,
            }),
        )
            .into_response(),
        Err(err) => {
            error!("Failed to list students: {err}");
            internal_error()
        }
    }
}

async fn fetch_students(
    pool: &PgPool,
    visibility: &Visibility,
) -> Result<Vec<StudentResponse>, sqlx::Error> {
    let (college_id, incubator_id) = visibility.bind_params();
    let query = r#"
        SELECT
            id::text AS id,
            email,
            college_id::text AS college_id,
            to_char(created_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at
        FROM users
        WHERE role = 'student'
          AND ($1::uuid IS NULL OR college_id = $1)
          AND ($2::uuid IS NULL OR incubator_id = $2)
        ORDER BY created_at DESC
    "#;
    let rows = sqlx::query(query)
        .bind(college_id)
        .bind(incubator_id)
        .fetch_all(pool)
        .await?;
    Ok(rows
        .into_iter()
        .map(|row| StudentResponse {
            id: row.get("id"),
            email: row.get("email"),
            college_id: row.get("college_id"),
            created_at: row.get("created_at"),
        })
        .collect())
}
