use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use axum_extra::extract::cookie::SignedCookieJar;
use serde::Deserialize;
use tracing::info;

use crate::web::{
    AppState,
    auth::{Role, authorize},
    data::{fetch_announcements, fetch_documents, fetch_users},
    models::{AnnouncementView, DocumentView, UserView, timestamp_now},
    responses::{ApiError, ApiResult, json_body, optional, required},
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDocument {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    file_name: Option<String>,
    #[serde(default)]
    mime_type: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAnnouncement {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    is_important: Option<bool>,
}

pub async fn list_employees(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> ApiResult<Json<Vec<UserView>>> {
    authorize(&state, &jar, Role::Employee).await?;
    let users = fetch_users(state.pool_ref()).await?;
    Ok(Json(users.into_iter().map(UserView::from).collect()))
}

pub async fn list_documents(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> ApiResult<Json<Vec<DocumentView>>> {
    authorize(&state, &jar, Role::Employee).await?;
    let documents = fetch_documents(state.pool_ref()).await?;
    Ok(Json(documents.into_iter().map(DocumentView::from).collect()))
}

pub async fn create_document(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    payload: Result<Json<NewDocument>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<DocumentView>)> {
    let user = authorize(&state, &jar, Role::Employee).await?;
    let request = json_body(payload)?;

    let title = required(request.title, "title")?;
    let file_name = safe_file_name(&required(request.file_name, "fileName")?)?;
    let mime_type = parse_mime_type(&required(request.mime_type, "mimeType")?)?;
    let description = optional(request.description);
    let created_at = timestamp_now();

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO documents (title, description, file_name, mime_type, uploaded_by, created_at)
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
    )
    .bind(&title)
    .bind(description.as_deref())
    .bind(&file_name)
    .bind(&mime_type)
    .bind(user.id)
    .bind(&created_at)
    .fetch_one(state.pool_ref())
    .await?;

    info!(document_id = id, uploaded_by = user.id, "document created");

    Ok((
        StatusCode::CREATED,
        Json(DocumentView {
            id,
            title,
            description,
            file_name,
            mime_type,
            uploaded_by: user.id,
            created_at,
        }),
    ))
}

pub async fn delete_document(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    let admin = authorize(&state, &jar, Role::Admin).await?;

    let result = sqlx::query("DELETE FROM documents WHERE id = $1")
        .bind(id)
        .execute(state.pool_ref())
        .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Document not found"));
    }

    info!(document_id = id, deleted_by = admin.id, "document deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_announcements(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> ApiResult<Json<Vec<AnnouncementView>>> {
    authorize(&state, &jar, Role::Employee).await?;
    let announcements = fetch_announcements(state.pool_ref()).await?;
    Ok(Json(
        announcements
            .into_iter()
            .map(AnnouncementView::from)
            .collect(),
    ))
}

pub async fn create_announcement(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    payload: Result<Json<NewAnnouncement>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<AnnouncementView>)> {
    let admin = authorize(&state, &jar, Role::Admin).await?;
    let request = json_body(payload)?;

    let title = required(request.title, "title")?;
    let content = required(request.content, "content")?;
    let is_important = request.is_important.unwrap_or(false);
    let created_at = timestamp_now();

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO announcements (title, content, created_by, created_at, is_important)
         VALUES ($1, $2, $3, $4, $5) RETURNING id",
    )
    .bind(&title)
    .bind(&content)
    .bind(admin.id)
    .bind(&created_at)
    .bind(i64::from(is_important))
    .fetch_one(state.pool_ref())
    .await?;

    info!(announcement_id = id, "announcement created");

    Ok((
        StatusCode::CREATED,
        Json(AnnouncementView {
            id,
            title,
            content,
            created_by: admin.id,
            created_at,
            is_important,
        }),
    ))
}

pub async fn delete_announcement(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    authorize(&state, &jar, Role::Admin).await?;

    let result = sqlx::query("DELETE FROM announcements WHERE id = $1")
        .bind(id)
        .execute(state.pool_ref())
        .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Announcement not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}

fn parse_mime_type(raw: &str) -> ApiResult<String> {
    raw.parse::<mime::Mime>()
        .map(|mime| mime.to_string())
        .map_err(|_| ApiError::validation(format!("Invalid mimeType: {raw}")))
}

fn safe_file_name(raw: &str) -> ApiResult<String> {
    let cleaned = sanitize_filename::sanitize(raw);
    let cleaned = cleaned.trim();
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        return Err(ApiError::validation("Invalid fileName"));
    }
    Ok(cleaned.to_string())
}
