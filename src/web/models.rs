use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::web::auth::Role;

/// Timestamps are stored as fixed-width RFC 3339 text so they order correctly
/// on every backend.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn timestamp_now() -> String {
    format_timestamp(Utc::now())
}

/// Current calendar date in UTC, the clock every date comparison uses.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[derive(Clone, Debug, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub full_name: String,
    pub email: String,
    pub department: String,
    pub title: String,
    pub role: String,
}

impl UserRow {
    pub fn role(&self) -> Role {
        Role::parse(&self.role).unwrap_or(Role::Employee)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: i64,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub department: String,
    pub title: String,
    pub role: String,
}

impl From<UserRow> for UserView {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            full_name: row.full_name,
            email: row.email,
            department: row.department,
            title: row.title,
            role: row.role,
        }
    }
}

#[derive(Clone, Debug, FromRow)]
pub struct DocumentRow {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub file_name: String,
    pub mime_type: String,
    pub uploaded_by: i64,
    pub created_at: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentView {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub file_name: String,
    pub mime_type: String,
    pub uploaded_by: i64,
    pub created_at: String,
}

impl From<DocumentRow> for DocumentView {
    fn from(row: DocumentRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            file_name: row.file_name,
            mime_type: row.mime_type,
            uploaded_by: row.uploaded_by,
            created_at: row.created_at,
        }
    }
}

#[derive(Clone, Debug, FromRow)]
pub struct AnnouncementRow {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_by: i64,
    pub created_at: String,
    pub is_important: i64,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementView {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_by: i64,
    pub created_at: String,
    pub is_important: bool,
}

impl From<AnnouncementRow> for AnnouncementView {
    fn from(row: AnnouncementRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
            created_by: row.created_by,
            created_at: row.created_at,
            is_important: row.is_important != 0,
        }
    }
}

#[derive(Clone, Debug, FromRow)]
pub struct FinancialMetricRow {
    pub id: i64,
    pub name: String,
    pub value: f64,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub display_order: i64,
    pub created_at: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialMetricView {
    pub id: i64,
    pub name: String,
    pub value: f64,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub display_order: i64,
    pub created_at: String,
}

impl From<FinancialMetricRow> for FinancialMetricView {
    fn from(row: FinancialMetricRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            value: row.value,
            description: row.description,
            icon: row.icon,
            display_order: row.display_order,
            created_at: row.created_at,
        }
    }
}

#[derive(Clone, Debug, FromRow)]
pub struct RevenueBreakdownRow {
    pub id: i64,
    pub category: String,
    pub percentage: f64,
    pub color_class: String,
    pub display_order: i64,
    pub year: i64,
    pub created_at: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueBreakdownView {
    pub id: i64,
    pub category: String,
    pub percentage: f64,
    pub color_class: String,
    pub display_order: i64,
    pub year: i64,
    pub created_at: String,
}

impl From<RevenueBreakdownRow> for RevenueBreakdownView {
    fn from(row: RevenueBreakdownRow) -> Self {
        Self {
            id: row.id,
            category: row.category,
            percentage: row.percentage,
            color_class: row.color_class,
            display_order: row.display_order,
            year: row.year,
            created_at: row.created_at,
        }
    }
}

#[derive(Clone, Debug, FromRow)]
pub struct YearlyFinancialRow {
    pub id: i64,
    pub year: i64,
    pub revenue: f64,
    pub growth_percentage: Option<f64>,
    pub profit: Option<f64>,
    pub created_at: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyFinancialView {
    pub id: i64,
    pub year: i64,
    pub revenue: f64,
    pub growth_percentage: Option<f64>,
    pub profit: Option<f64>,
    pub created_at: String,
}

impl From<YearlyFinancialRow> for YearlyFinancialView {
    fn from(row: YearlyFinancialRow) -> Self {
        Self {
            id: row.id,
            year: row.year,
            revenue: row.revenue,
            growth_percentage: row.growth_percentage,
            profit: row.profit,
            created_at: row.created_at,
        }
    }
}

#[derive(Clone, Debug, FromRow)]
pub struct InvestorEventRow {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub event_date: String,
    pub created_at: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestorEventView {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub event_date: String,
    pub created_at: String,
}

impl From<InvestorEventRow> for InvestorEventView {
    fn from(row: InvestorEventRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            event_date: row.event_date,
            created_at: row.created_at,
        }
    }
}

#[derive(Clone, Debug, FromRow)]
pub struct ContentItemRow {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub content_type: String,
    pub status: String,
    pub assigned_to: Option<i64>,
    pub deadline: Option<String>,
    pub created_by: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItemView {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub content_type: String,
    pub status: String,
    pub assigned_to: Option<i64>,
    pub deadline: Option<String>,
    pub created_by: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ContentItemRow> for ContentItemView {
    fn from(row: ContentItemRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            content_type: row.content_type,
            status: row.status,
            assigned_to: row.assigned_to,
            deadline: row.deadline,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Clone, Debug, FromRow)]
pub struct ContentHistoryRow {
    pub id: i64,
    pub content_id: i64,
    pub status: String,
    pub notes: Option<String>,
    pub created_by: i64,
    pub created_at: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentHistoryView {
    pub id: i64,
    pub content_id: i64,
    pub status: String,
    pub notes: Option<String>,
    pub created_by: i64,
    pub created_at: String,
}

impl From<ContentHistoryRow> for ContentHistoryView {
    fn from(row: ContentHistoryRow) -> Self {
        Self {
            id: row.id,
            content_id: row.content_id,
            status: row.status,
            notes: row.notes,
            created_by: row.created_by,
            created_at: row.created_at,
        }
    }
}

#[derive(Clone, Debug, FromRow)]
pub struct ContentWorkflowRow {
    pub id: i64,
    pub name: String,
    pub content_type: String,
    pub steps: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentWorkflowView {
    pub id: i64,
    pub name: String,
    pub content_type: String,
    pub steps: serde_json::Value,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ContentWorkflowRow> for ContentWorkflowView {
    fn from(row: ContentWorkflowRow) -> Self {
        // Steps are opaque to the server; hand back the raw text if it is not JSON.
        let steps = serde_json::from_str(&row.steps)
            .unwrap_or_else(|_| serde_json::Value::String(row.steps.clone()));
        Self {
            id: row.id,
            name: row.name,
            content_type: row.content_type,
            steps,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
