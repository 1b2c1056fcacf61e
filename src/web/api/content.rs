use anyhow::anyhow;
use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use axum_extra::extract::cookie::SignedCookieJar;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::info;

use crate::{
    web::{
        AppState,
        auth::{Role, authorize},
        data::{
            fetch_content_history, fetch_content_item, fetch_content_items, fetch_user_by_id,
            fetch_workflows, insert_content_history,
        },
        models::{
            ContentHistoryView, ContentItemRow, ContentItemView, ContentWorkflowView,
            format_timestamp, timestamp_now,
        },
        responses::{ApiError, ApiResult, json_body, optional, required},
    },
    workflow::{ContentStatus, ContentType},
};

const CREATED_NOTE: &str = "Content item created";

#[derive(Default, Deserialize)]
pub struct ContentFilter {
    #[serde(default, rename = "contentType", alias = "type")]
    content_type: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default, rename = "assignedTo")]
    assigned_to: Option<String>,
}

#[derive(Default, Deserialize)]
pub struct WorkflowFilter {
    #[serde(default, rename = "type")]
    content_type: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContentItem {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    content_type: Option<String>,
    #[serde(default)]
    assigned_to: Option<i64>,
    #[serde(default)]
    deadline: Option<String>,
}

/// Partial update; absent fields keep their stored value, an explicit `null`
/// clears a nullable one.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItemUpdate {
    #[serde(default)]
    title: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    description: Option<Option<String>>,
    #[serde(default)]
    content_type: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    assigned_to: Option<Option<i64>>,
    #[serde(default, deserialize_with = "nullable")]
    deadline: Option<Option<String>>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    notes: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWorkflow {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    content_type: Option<String>,
    #[serde(default)]
    steps: Option<serde_json::Value>,
}

#[derive(Serialize)]
pub struct ContentItemDetail {
    #[serde(flatten)]
    item: ContentItemView,
    history: Vec<ContentHistoryView>,
}

impl ContentFilter {
    fn matches(&self, row: &ContentItemRow, assigned_to: Option<i64>) -> bool {
        self.content_type
            .as_deref()
            .is_none_or(|wanted| row.content_type == wanted)
            && self
                .status
                .as_deref()
                .is_none_or(|wanted| row.status == wanted)
            && assigned_to.is_none_or(|wanted| row.assigned_to == Some(wanted))
    }
}

pub async fn list_content_items(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Query(filter): Query<ContentFilter>,
) -> ApiResult<Json<Vec<ContentItemView>>> {
    authorize(&state, &jar, Role::Employee).await?;

    let assigned_to = match optional(filter.assigned_to.clone()) {
        Some(raw) => Some(
            raw.parse::<i64>()
                .map_err(|_| ApiError::validation(format!("Invalid assignedTo: {raw}")))?,
        ),
        None => None,
    };

    let items = fetch_content_items(state.pool_ref()).await?;
    Ok(Json(
        items
            .into_iter()
            .filter(|row| filter.matches(row, assigned_to))
            .map(ContentItemView::from)
            .collect(),
    ))
}

pub async fn get_content_item(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Path(id): Path<i64>,
) -> ApiResult<Json<ContentItemDetail>> {
    authorize(&state, &jar, Role::Employee).await?;

    let item = fetch_content_item(state.pool_ref(), id)
        .await?
        .ok_or_else(content_not_found)?;
    let history = fetch_content_history(state.pool_ref(), id).await?;

    Ok(Json(ContentItemDetail {
        item: item.into(),
        history: history.into_iter().map(Into::into).collect(),
    }))
}

pub async fn create_content_item(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    payload: Result<Json<NewContentItem>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ContentItemView>)> {
    let user = authorize(&state, &jar, Role::Employee).await?;
    let request = json_body(payload)?;

    let title = required(request.title, "title")?;
    let content_type = parse_content_type(&required(request.content_type, "contentType")?)?;
    let description = optional(request.description);
    let deadline = optional(request.deadline)
        .map(|raw| parse_deadline(&raw))
        .transpose()?;
    if let Some(assignee) = request.assigned_to {
        ensure_user_exists(&state, assignee).await?;
    }

    let now = timestamp_now();
    let mut tx = state.begin().await?;

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO content_items (title, description, content_type, status, assigned_to, deadline, created_by, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8) RETURNING id",
    )
    .bind(&title)
    .bind(description.as_deref())
    .bind(content_type.as_str())
    .bind(ContentStatus::Draft.as_str())
    .bind(request.assigned_to)
    .bind(deadline.as_deref())
    .bind(user.id)
    .bind(&now)
    .fetch_one(&mut *tx)
    .await?;

    insert_content_history(
        &mut *tx,
        id,
        ContentStatus::Draft.as_str(),
        Some(CREATED_NOTE),
        user.id,
        &now,
    )
    .await?;

    let item = fetch_content_item(&mut *tx, id)
        .await?
        .ok_or_else(|| ApiError::Internal(anyhow!("content item {id} vanished after insert")))?;
    tx.commit().await?;

    info!(content_id = id, created_by = user.id, "content item created");
    Ok((StatusCode::CREATED, Json(item.into())))
}

pub async fn update_content_item(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Path(id): Path<i64>,
    payload: Result<Json<ContentItemUpdate>, JsonRejection>,
) -> ApiResult<Json<ContentItemView>> {
    let user = authorize(&state, &jar, Role::Employee).await?;
    let request = json_body(payload)?;

    let title = request
        .title
        .map(|title| required(Some(title), "title"))
        .transpose()?;
    let content_type = request
        .content_type
        .map(|raw| parse_content_type(raw.trim()))
        .transpose()?;
    let deadline = match request.deadline {
        Some(raw) => Some(optional(raw).map(|raw| parse_deadline(&raw)).transpose()?),
        None => None,
    };
    let requested_status = optional(request.status)
        .map(|raw| {
            ContentStatus::parse(&raw)
                .ok_or_else(|| ApiError::validation(format!("Invalid status: {raw}")))
        })
        .transpose()?;
    if let Some(Some(assignee)) = request.assigned_to {
        ensure_user_exists(&state, assignee).await?;
    }

    let mut tx = state.begin().await?;
    let current = fetch_content_item(&mut *tx, id)
        .await?
        .ok_or_else(content_not_found)?;

    let title = title.unwrap_or_else(|| current.title.clone());
    let description = match request.description {
        Some(description) => optional(description),
        None => current.description.clone(),
    };
    let content_type = content_type
        .map(|t| t.as_str().to_string())
        .unwrap_or_else(|| current.content_type.clone());
    let deadline = deadline.unwrap_or_else(|| current.deadline.clone());
    let assigned_to = request.assigned_to.unwrap_or(current.assigned_to);

    let from = ContentStatus::parse(&current.status).ok_or_else(|| {
        ApiError::Internal(anyhow!(
            "content item {id} has unknown status {}",
            current.status
        ))
    })?;
    let status_change = match requested_status {
        Some(to) if to != from => Some(
            from.transition(to)
                .map_err(|err| ApiError::validation(err.to_string()))?,
        ),
        _ => None,
    };
    let status = status_change.unwrap_or(from);

    let now = timestamp_now();
    sqlx::query(
        "UPDATE content_items
         SET title = $1, description = $2, content_type = $3, status = $4, assigned_to = $5, deadline = $6, updated_at = $7
         WHERE id = $8",
    )
    .bind(&title)
    .bind(description.as_deref())
    .bind(&content_type)
    .bind(status.as_str())
    .bind(assigned_to)
    .bind(deadline.as_deref())
    .bind(&now)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    if let Some(next) = status_change {
        let notes = optional(request.notes)
            .unwrap_or_else(|| format!("Status changed to {}", next.as_str()));
        insert_content_history(&mut *tx, id, next.as_str(), Some(&notes), user.id, &now).await?;
        info!(
            content_id = id,
            from = from.as_str(),
            to = next.as_str(),
            "content status changed"
        );
    }

    let item = fetch_content_item(&mut *tx, id)
        .await?
        .ok_or_else(content_not_found)?;
    tx.commit().await?;

    Ok(Json(item.into()))
}

pub async fn delete_content_item(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    authorize(&state, &jar, Role::Admin).await?;

    let mut tx = state.begin().await?;
    sqlx::query("DELETE FROM content_history WHERE content_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let result = sqlx::query("DELETE FROM content_items WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    if result.rows_affected() == 0 {
        return Err(content_not_found());
    }
    tx.commit().await?;

    info!(content_id = id, "content item deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_workflows(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Query(filter): Query<WorkflowFilter>,
) -> ApiResult<Json<Vec<ContentWorkflowView>>> {
    authorize(&state, &jar, Role::Employee).await?;

    let wanted = optional(filter.content_type);
    let workflows = fetch_workflows(state.pool_ref()).await?;
    Ok(Json(
        workflows
            .into_iter()
            .filter(|row| wanted.as_deref().is_none_or(|t| row.content_type == t))
            .map(ContentWorkflowView::from)
            .collect(),
    ))
}

pub async fn create_workflow(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    payload: Result<Json<NewWorkflow>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ContentWorkflowView>)> {
    authorize(&state, &jar, Role::Admin).await?;
    let request = json_body(payload)?;

    let name = required(request.name, "name")?;
    let content_type = parse_content_type(&required(request.content_type, "contentType")?)?;
    let steps = match request.steps {
        Some(serde_json::Value::Array(steps)) if !steps.is_empty() => {
            serde_json::Value::Array(steps)
        }
        _ => return Err(ApiError::validation("steps must be a non-empty array")),
    };
    let now = timestamp_now();

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO content_workflows (name, content_type, steps, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $4) RETURNING id",
    )
    .bind(&name)
    .bind(content_type.as_str())
    .bind(steps.to_string())
    .bind(&now)
    .fetch_one(state.pool_ref())
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ContentWorkflowView {
            id,
            name,
            content_type: content_type.as_str().to_string(),
            steps,
            created_at: now.clone(),
            updated_at: now,
        }),
    ))
}

/// Keep an explicit `null` apart from an absent key: `Some(None)` versus `None`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn content_not_found() -> ApiError {
    ApiError::not_found("Content item not found")
}

fn parse_content_type(raw: &str) -> ApiResult<ContentType> {
    ContentType::parse(raw).ok_or_else(|| ApiError::validation(format!("Invalid contentType: {raw}")))
}

/// Deadlines arrive as RFC 3339 timestamps or bare `YYYY-MM-DD` dates and are
/// stored as UTC timestamps.
fn parse_deadline(raw: &str) -> ApiResult<String> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(format_timestamp(at.with_timezone(&Utc)));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| format_timestamp(midnight.and_utc()))
        .ok_or_else(|| ApiError::validation(format!("Invalid deadline: {raw}")))
}

async fn ensure_user_exists(state: &AppState, user_id: i64) -> ApiResult<()> {
    match fetch_user_by_id(state.pool_ref(), user_id).await? {
        Some(_) => Ok(()),
        None => Err(ApiError::validation(format!(
            "assignedTo references unknown user {user_id}"
        ))),
    }
}
