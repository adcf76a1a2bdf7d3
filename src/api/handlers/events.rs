//! Event endpoints.
//!
//! Listing applies the caller's [`Visibility`]. Events created by a
//! `system_admin` carry no anchor and are therefore globally scoped, which
//! per the null-anchor rule makes them visible only to `system_admin`.

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
use uuid::Uuid;

use super::auth::{AuthState, Role, Visibility, require_auth, require_role};
use super::{failure, internal_error};

const EVENT_MANAGER_ROLES: [Role; 3] = [
    Role::CollegeAdmin,
    Role::CollegeCoordinator,
    Role::SystemAdmin,
];

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct EventResponse {
    pub id: String,
    pub title: String,
    pub starts_at: String,
    pub college_id: Option<String>,
    pub incubator_id: Option<String>,
    pub created_at: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct EventListResponse {
    pub success: bool,
    pub data: Vec<EventResponse>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct EventDetailResponse {
    pub success: bool,
    pub data: EventResponse,
}

#[derive(ToSchema, Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct EventCreateRequest {
    pub title: String,
    /// RFC 3339 timestamp for the event start.
    pub starts_at: String,
}

#[utoipa::path(
    get,
    path = "/events",
    responses(
        (status = 200, description = "Events visible to the caller.", body = EventListResponse),
        (status = 401, description = "Missing, invalid, or expired bearer token."),
    ),
    tag = "portal"
)]
pub async fn list_events(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
) -> impl IntoResponse {
    let principal = match require_auth(&headers, &auth_state) {
        Ok(principal) => principal,
        Err(err) => return err.into_response(),
    };
    let visibility = match principal.visibility() {
        Ok(visibility) => visibility,
        Err(err) => return err.into_response(),
    };

    match fetch_events(&pool, &visibility).await {
        Ok(data) => (
            StatusCode::OK,
            Json(EventListResponse {
                success: true,
                data,
            }),
        )
            .into_response(),
        Err(err) => {
            error!("Failed to list events: {err}");
            internal_error()
        }
    }
}

#[utoipa::path(
    post,
    path = "/events",
    request_body = EventCreateRequest,
    responses(
        (status = 201, description = "Event created.", body = EventDetailResponse),
        (status = 400, description = "Missing title or invalid timestamp."),
        (status = 401, description = "Missing, invalid, or expired bearer token."),
        (status = 403, description = "Role may not create events."),
    ),
    tag = "portal"
)]
pub async fn create_event(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    Json(payload): Json<EventCreateRequest>,
) -> impl IntoResponse {
    let principal = match require_auth(&headers, &auth_state) {
        Ok(principal) => principal,
        Err(err) => return err.into_response(),
    };
    if let Err(err) = require_role(&principal, &EVENT_MANAGER_ROLES) {
        return err.into_response();
    }

    let title = payload.title.trim();
    if title.is_empty() {
        return failure(StatusCode::BAD_REQUEST, "Title is required.");
    }
    let starts_at = payload.starts_at.trim();
    if starts_at.is_empty() {
        return failure(StatusCode::BAD_REQUEST, "Invalid starts_at timestamp.");
    }

    let college_id = match principal.visibility() {
        Ok(Visibility::College(id)) => Some(id),
        Ok(Visibility::Unrestricted) => None,
        Ok(Visibility::Incubator(_)) => {
            error!(
                role = principal.role.as_str(),
                "Event manager has unexpected incubator scope"
            );
            return internal_error();
        }
        Err(err) => return err.into_response(),
    };

    match insert_event(&pool, title, starts_at, college_id, principal.user_id).await {
        Ok(data) => (
            StatusCode::CREATED,
            Json(EventDetailResponse {
                success: true,
                data,
            }),
        )
            .into_response(),
        Err(err) => {
            if is_datetime_violation(&err) {
                return failure(StatusCode::BAD_REQUEST, "Invalid starts_at timestamp.");
            }
            error!("Failed to insert event: {err}");
            internal_error()
        }
    }
}

async fn fetch_events(
    pool: &PgPool,
    visibility: &Visibility,
) -> Result<Vec<EventResponse>, sqlx::Error> {
    let (college_id, incubator_id) = visibility.bind_params();
    let query = r#"
        SELECT
            id::text AS id,
            title,
            to_char(starts_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS starts_at,
            college_id::text AS college_id,
            incubator_id::text AS incubator_id,
            to_char(created_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at
        FROM events
        WHERE ($1::uuid IS NULL OR college_id = $1)
          AND ($2::uuid IS NULL OR incubator_id = $2)
        ORDER BY starts_at DESC
    "#;
    let rows = sqlx::query(query)
        .bind(college_id)
        .bind(incubator_id)
        .fetch_all(pool)
        .await?;
    Ok(rows
        .into_iter()
        .map(|row| EventResponse {
            id: row.get("id"),
            title: row.get("title"),
            starts_at: row.get("starts_at"),
            college_id: row.get("college_id"),
            incubator_id: row.get("incubator_id"),
            created_at: row.get("created_at"),
        })
        .collect())
}

async fn insert_event(
    pool: &PgPool,
    title: &str,
    starts_at: &str,
    college_id: Option<Uuid>,
    created_by: Uuid,
) -> Result<EventResponse, sqlx::Error> {
    let query = r#"
        INSERT INTO events (title, starts_at, college_id, created_by)
        VALUES ($1, $2::timestamptz, $3, $4)
        RETURNING
            id::text AS id,
            title,
            to_char(starts_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS starts_at,
            college_id::text AS college_id,
            incubator_id::text AS incubator_id,
            to_char(created_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at
    "#;
    let row = sqlx::query(query)
        .bind(title)
        .bind(starts_at)
        .bind(college_id)
        .bind(created_by)
        .fetch_one(pool)
        .await?;
    Ok(EventResponse {
        id: row.get("id"),
        title: row.get("title"),
        starts_at: row.get("starts_at"),
        college_id: row.get("college_id"),
        incubator_id: row.get("incubator_id"),
        created_at: row.get("created_at"),
    })
}

/// SQLSTATE 22007/22008 are datetime format/overflow errors from the
/// `starts_at` cast; they map to a 400 instead of a 500.
fn is_datetime_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            matches!(db_err.code().as_deref(), Some("22007" | "22008"))
        }
        _ => false,
    }
}
