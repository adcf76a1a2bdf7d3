//! Idea endpoints.
//!
//! Every read goes through the caller's [`Visibility`]; single-row reads
//! outside the caller's scope answer 404 so idea ids cannot be probed across
//! colleges.

use axum::{
    Json,
    extract::{Extension, Path},
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

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct IdeaResponse {
    pub id: String,
    pub title: String,
    pub summary: Option<String>,
    pub college_id: Option<String>,
    pub incubator_id: Option<String>,
    pub created_at: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct IdeaListResponse {
    pub success: bool,
    pub data: Vec<IdeaResponse>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct IdeaDetailResponse {
    pub success: bool,
    pub data: IdeaResponse,
}

#[derive(ToSchema, Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct IdeaCreateRequest {
    pub title: String,
    pub summary: Option<String>,
}

#[utoipa::path(
    get,
    path = "/ideas",
    responses(
        (status = 200, description = "Ideas visible to the caller.", body = IdeaListResponse),
        (status = 401, description = "Missing, invalid, or expired bearer token."),
    ),
    tag = "portal"
)]
pub async fn list_ideas(
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

    match fetch_ideas(&pool, &visibility).await {
        Ok(data) => (
            StatusCode::OK,
            Json(IdeaListResponse {
                success: true,
                data,
            }),
        )
            .into_response(),
        Err(err) => {
            error!("Failed to list ideas: {err}");
            internal_error()
        }
    }
}

#[utoipa::path(
    get,
    path = "/ideas/{id}",
    params(("id" = String, Path, description = "Idea id")),
    responses(
        (status = 200, description = "Idea detail.", body = IdeaDetailResponse),
        (status = 401, description = "Missing, invalid, or expired bearer token."),
        (status = 404, description = "Idea missing or outside the caller's scope."),
    ),
    tag = "portal"
)]
pub async fn get_idea(
    Path(id): Path<String>,
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

    let Ok(idea_id) = Uuid::parse_str(id.trim()) else {
        return failure(StatusCode::BAD_REQUEST, "Invalid idea id.");
    };

    match fetch_idea(&pool, idea_id).await {
        Ok(Some(row)) => {
            // Out-of-scope rows are indistinguishable from missing ones.
            if !visibility.allows(row.college_id, row.incubator_id) {
                return failure(StatusCode::NOT_FOUND, "Idea not found.");
            }
            (
                StatusCode::OK,
                Json(IdeaDetailResponse {
                    success: true,
                    data: row.response,
                }),
            )
                .into_response()
        }
        Ok(None) => failure(StatusCode::NOT_FOUND, "Idea not found."),
        Err(err) => {
            error!("Failed to fetch idea: {err}");
            internal_error()
        }
    }
}

#[utoipa::path(
    post,
    path = "/ideas",
    request_body = IdeaCreateRequest,
    responses(
        (status = 201, description = "Idea created under the caller's college.", body = IdeaDetailResponse),
        (status = 400, description = "Missing title."),
        (status = 401, description = "Missing, invalid, or expired bearer token."),
        (status = 403, description = "Role may not submit ideas."),
    ),
    tag = "portal"
)]
pub async fn create_idea(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    Json(payload): Json<IdeaCreateRequest>,
) -> impl IntoResponse {
    let principal = match require_auth(&headers, &auth_state) {
        Ok(principal) => principal,
        Err(err) => return err.into_response(),
    };
    if let Err(err) = require_role(&principal, &[Role::Student, Role::Mentor]) {
        return err.into_response();
    }

    let title = payload.title.trim();
    if title.is_empty() {
        return failure(StatusCode::BAD_REQUEST, "Title is required.");
    }
    let summary = payload
        .summary
        .map(|summary| summary.trim().to_string())
        .filter(|summary| !summary.is_empty());

    // Submitters are college-scoped roles, so the new row inherits their
    // college anchor.
    let college_id = match principal.visibility() {
        Ok(Visibility::College(id)) => id,
        Ok(_) => {
            error!(role = principal.role.as_str(), "Idea submitter is not college-scoped");
            return internal_error();
        }
        Err(err) => return err.into_response(),
    };

    match insert_idea(&pool, title, summary.as_deref(), college_id, principal.user_id).await {
        Ok(data) => (
            StatusCode::CREATED,
            Json(IdeaDetailResponse {
                success: true,
                data,
            }),
        )
            .into_response(),
        Err(err) => {
            error!("Failed to insert idea: {err}");
            internal_error()
        }
    }
}

struct IdeaRow {
    response: IdeaResponse,
    college_id: Option<Uuid>,
    incubator_id: Option<Uuid>,
}

async fn fetch_ideas(
    pool: &PgPool,
    visibility: &Visibility,
) -> Result<Vec<IdeaResponse>, sqlx::Error> {
    let (college_id, incubator_id) = visibility.bind_params();
    let query = r#"
        SELECT
            id::text AS id,
            title,
            summary,
            college_id::text AS college_id,
            incubator_id::text AS incubator_id,
            to_char(created_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at
        FROM ideas
        WHERE ($1::uuid IS NULL OR college_id = $1)
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
        .map(|row| IdeaResponse {
            id: row.get("id"),
            title: row.get("title"),
            summary: row.get("summary"),
            college_id: row.get("college_id"),
            incubator_id: row.get("incubator_id"),
            created_at: row.get("created_at"),
        })
        .collect())
}

async fn fetch_idea(pool: &PgPool, idea_id: Uuid) -> Result<Option<IdeaRow>, sqlx::Error> {
    let query = r#"
        SELECT
            id::text AS id,
            title,
            summary,
            college_id,
            incubator_id,
            college_id::text AS college_id_text,
            incubator_id::text AS incubator_id_text,
            to_char(created_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at
        FROM ideas
        WHERE id = $1
        LIMIT 1
    "#;
    let row = sqlx::query(query).bind(idea_id).fetch_optional(pool).await?;
    Ok(row.map(|row| IdeaRow {
        response: IdeaResponse {
            id: row.get("id"),
            title: row.get("title"),
            summary: row.get("summary"),
            college_id: row.get("college_id_text"),
            incubator_id: row.get("incubator_id_text"),
            created_at: row.get("created_at"),
        },
        college_id: row.get("college_id"),
        incubator_id: row.get("incubator_id"),
    }))
}

async fn insert_idea(
    pool: &PgPool,
    title: &str,
    summary: Option<&str>,
    college_id: Uuid,
    created_by: Uuid,
) -> Result<IdeaResponse, sqlx::Error> {
    let query = r#"
        INSERT INTO ideas (title, summary, college_id, created_by)
        VALUES ($1, $2, $3, $4)
        RETURNING
            id::text AS id,
            title,
            summary,
            college_id::text AS college_id,
            incubator_id::text AS incubator_id,
            to_char(created_at AT TIME ZONE 'utc', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at
    "#;
    let row = sqlx::query(query)
        .bind(title)
        .bind(summary)
        .bind(college_id)
        .bind(created_by)
        .fetch_one(pool)
        .await?;
    Ok(IdeaResponse {
        id: row.get("id"),
        title: row.get("title"),
        summary: row.get("summary"),
        college_id: row.get("college_id"),
        incubator_id: row.get("incubator_id"),
        created_at: row.get("created_at"),
    })
}
