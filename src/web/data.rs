use sqlx::{Any, AnyPool, Executor};

use super::models::{
    AnnouncementRow, ContentHistoryRow, ContentItemRow, ContentWorkflowRow, DocumentRow,
    FinancialMetricRow, InvestorEventRow, RevenueBreakdownRow, UserRow, YearlyFinancialRow,
};

const USER_COLUMNS: &str =
    "id, username, password_hash, full_name, email, department, title, role";
const CONTENT_ITEM_COLUMNS: &str = "id, title, description, content_type, status, assigned_to, deadline, created_by, created_at, updated_at";

pub async fn fetch_users(pool: &AnyPool) -> sqlx::Result<Vec<UserRow>> {
    sqlx::query_as::<_, UserRow>(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))
        .fetch_all(pool)
        .await
}

pub async fn fetch_user_by_id(pool: &AnyPool, id: i64) -> sqlx::Result<Option<UserRow>> {
    sqlx::query_as::<_, UserRow>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn fetch_user_by_username(
    pool: &AnyPool,
    username: &str,
) -> sqlx::Result<Option<UserRow>> {
    sqlx::query_as::<_, UserRow>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
    ))
    .bind(username)
    .fetch_optional(pool)
    .await
}

pub async fn fetch_documents(pool: &AnyPool) -> sqlx::Result<Vec<DocumentRow>> {
    sqlx::query_as::<_, DocumentRow>(
        "SELECT id, title, description, file_name, mime_type, uploaded_by, created_at FROM documents ORDER BY id",
    )
    .fetch_all(pool)
    .await
}

pub async fn fetch_announcements(pool: &AnyPool) -> sqlx::Result<Vec<AnnouncementRow>> {
    sqlx::query_as::<_, AnnouncementRow>(
        "SELECT id, title, content, created_by, created_at, is_important FROM announcements ORDER BY id",
    )
    .fetch_all(pool)
    .await
}

pub async fn fetch_financial_metrics(pool: &AnyPool) -> sqlx::Result<Vec<FinancialMetricRow>> {
    sqlx::query_as::<_, FinancialMetricRow>(
        "SELECT id, name, value, description, icon, display_order, created_at FROM financial_metrics ORDER BY display_order, id",
    )
    .fetch_all(pool)
    .await
}

pub async fn fetch_revenue_breakdown(pool: &AnyPool) -> sqlx::Result<Vec<RevenueBreakdownRow>> {
    sqlx::query_as::<_, RevenueBreakdownRow>(
        "SELECT id, category, percentage, color_class, display_order, year, created_at FROM revenue_breakdowns ORDER BY display_order, id",
    )
    .fetch_all(pool)
    .await
}

/// Yearly figures, newest year first. `limit` caps the number of rows.
pub async fn fetch_yearly_financials(
    pool: &AnyPool,
    limit: Option<i64>,
) -> sqlx::Result<Vec<YearlyFinancialRow>> {
    let sql = "SELECT id, year, revenue, growth_percentage, profit, created_at FROM yearly_financials ORDER BY year DESC, id";
    match limit {
        Some(limit) => {
            sqlx::query_as::<_, YearlyFinancialRow>(&format!("{sql} LIMIT $1"))
                .bind(limit)
                .fetch_all(pool)
                .await
        }
        None => {
            sqlx::query_as::<_, YearlyFinancialRow>(sql)
                .fetch_all(pool)
                .await
        }
    }
}

pub async fn fetch_investor_events(pool: &AnyPool) -> sqlx::Result<Vec<InvestorEventRow>> {
    sqlx::query_as::<_, InvestorEventRow>(
        "SELECT id, title, description, event_date, created_at FROM investor_events ORDER BY event_date, id",
    )
    .fetch_all(pool)
    .await
}

/// Events dated on or after `from_date` (`YYYY-MM-DD`), soonest first.
pub async fn fetch_upcoming_investor_events(
    pool: &AnyPool,
    from_date: &str,
    limit: i64,
) -> sqlx::Result<Vec<InvestorEventRow>> {
    sqlx::query_as::<_, InvestorEventRow>(
        "SELECT id, title, description, event_date, created_at FROM investor_events WHERE event_date >= $1 ORDER BY event_date, id LIMIT $2",
    )
    .bind(from_date)
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub async fn fetch_content_items(pool: &AnyPool) -> sqlx::Result<Vec<ContentItemRow>> {
    sqlx::query_as::<_, ContentItemRow>(&format!(
        "SELECT {CONTENT_ITEM_COLUMNS} FROM content_items ORDER BY updated_at DESC, id DESC"
    ))
    .fetch_all(pool)
    .await
}

pub async fn fetch_content_item<'e, E>(executor: E, id: i64) -> sqlx::Result<Option<ContentItemRow>>
where
    E: Executor<'e, Database = Any>,
{
    sqlx::query_as::<_, ContentItemRow>(&format!(
        "SELECT {CONTENT_ITEM_COLUMNS} FROM content_items WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await
}

/// History entries for one content item, newest first.
pub async fn fetch_content_history(
    pool: &AnyPool,
    content_id: i64,
) -> sqlx::Result<Vec<ContentHistoryRow>> {
    sqlx::query_as::<_, ContentHistoryRow>(
        "SELECT id, content_id, status, notes, created_by, created_at FROM content_history WHERE content_id = $1 ORDER BY created_at DESC, id DESC",
    )
    .bind(content_id)
    .fetch_all(pool)
    .await
}

pub async fn insert_content_history<'e, E>(
    executor: E,
    content_id: i64,
    status: &str,
    notes: Option<&str>,
    created_by: i64,
    created_at: &str,
) -> sqlx::Result<()>
where
    E: Executor<'e, Database = Any>,
{
    sqlx::query(
        "INSERT INTO content_history (content_id, status, notes, created_by, created_at) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(content_id)
    .bind(status)
    .bind(notes)
    .bind(created_by)
    .bind(created_at)
    .execute(executor)
    .await
    .map(|_| ())
}

pub async fn fetch_workflows(pool: &AnyPool) -> sqlx::Result<Vec<ContentWorkflowRow>> {
    sqlx::query_as::<_, ContentWorkflowRow>(
        "SELECT id, name, content_type, steps, created_at, updated_at FROM content_workflows ORDER BY id",
    )
    .fetch_all(pool)
    .await
}
