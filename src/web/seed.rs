use axum::{extract::State, http::StatusCode};
use axum_extra::extract::cookie::SignedCookieJar;
use chrono::{Datelike, NaiveDate};
use sqlx::AnyConnection;
use tracing::{error, info};

use crate::web::{
    AppState,
    auth::{self, Role},
    models::{timestamp_now, today},
};

pub struct SampleMetric {
    pub name: &'static str,
    pub value: f64,
    pub description: &'static str,
    pub icon: &'static str,
    pub display_order: i64,
}

pub struct SampleRevenueCategory {
    pub category: &'static str,
    pub percentage: f64,
    pub color_class: &'static str,
    pub display_order: i64,
    pub year: i64,
}

/// (year, revenue, growth percentage, profit)
pub type SampleYear = (i64, f64, f64, f64);

pub struct SampleEvent {
    pub title: String,
    pub description: &'static str,
    pub event_date: NaiveDate,
}

pub const SAMPLE_METRICS: &[SampleMetric] = &[
    SampleMetric {
        name: "Revenue Growth",
        value: 24.0,
        description: "Year-over-year revenue growth, outperforming industry average of 18%",
        icon: "fas fa-dollar-sign",
        display_order: 1,
    },
    SampleMetric {
        name: "Profit Margin",
        value: 18.5,
        description: "Strong profit margins reflecting our operational efficiency",
        icon: "fas fa-chart-pie",
        display_order: 2,
    },
    SampleMetric {
        name: "Return on Investment",
        value: 21.2,
        description: "Strong returns for our investors across all business units",
        icon: "fas fa-hand-holding-usd",
        display_order: 3,
    },
];

pub const SAMPLE_REVENUE: &[SampleRevenueCategory] = &[
    SampleRevenueCategory {
        category: "Product Sales",
        percentage: 45.0,
        color_class: "bg-primary",
        display_order: 1,
        year: 2024,
    },
    SampleRevenueCategory {
        category: "Service Contracts",
        percentage: 30.0,
        color_class: "bg-success",
        display_order: 2,
        year: 2024,
    },
    SampleRevenueCategory {
        category: "Consulting",
        percentage: 15.0,
        color_class: "bg-info",
        display_order: 3,
        year: 2024,
    },
    SampleRevenueCategory {
        category: "Licensing",
        percentage: 10.0,
        color_class: "bg-warning",
        display_order: 4,
        year: 2024,
    },
];

pub const SAMPLE_YEARS: &[SampleYear] = &[
    (2024, 152.4, 24.0, 28.2),
    (2023, 122.9, 20.0, 22.1),
    (2022, 102.4, 18.0, 18.4),
    (2021, 86.8, 15.0, 15.2),
    (2020, 75.5, 12.0, 12.8),
];

/// Investor calendar for the year after `current_year`, so seeded events are upcoming.
pub fn sample_events(current_year: i32) -> Vec<SampleEvent> {
    let year = current_year + 1;
    let date = |month, day| NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default();
    vec![
        SampleEvent {
            title: format!("Q1 {year} Earnings Release"),
            description: "First quarter financial results announcement",
            event_date: date(4, 15),
        },
        SampleEvent {
            title: "Annual Shareholders Meeting".to_string(),
            description: "Annual meeting for all shareholders",
            event_date: date(5, 20),
        },
        SampleEvent {
            title: format!("Q2 {year} Earnings Release"),
            description: "Second quarter financial results announcement",
            event_date: date(7, 15),
        },
    ]
}

pub async fn init_financial_data(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> (StatusCode, String) {
    if let Err(err) = auth::authorize(&state, &jar, Role::Admin).await {
        return (err.status(), err.to_string());
    }

    let result = async {
        let mut tx = state.begin().await?;
        reset_financial_data(&mut tx, today().year()).await?;
        tx.commit().await
    }
    .await;

    match result {
        Ok(()) => {
            info!("financial sample data initialized");
            (
                StatusCode::OK,
                "Financial data initialized successfully!".to_string(),
            )
        }
        Err(err) => {
            error!(?err, "error initializing financial data");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error initializing financial data: {err}"),
            )
        }
    }
}

/// Wipe the four financial tables and insert the fixed sample data.
pub async fn reset_financial_data(conn: &mut AnyConnection, current_year: i32) -> sqlx::Result<()> {
    for table in [
        "financial_metrics",
        "revenue_breakdowns",
        "yearly_financials",
        "investor_events",
    ] {
        sqlx::query(&format!("DELETE FROM {table}"))
            .execute(&mut *conn)
            .await?;
    }

    let now = timestamp_now();

    for metric in SAMPLE_METRICS {
        sqlx::query(
            "INSERT INTO financial_metrics (name, value, description, icon, display_order, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $6)",
        )
        .bind(metric.name)
        .bind(metric.value)
        .bind(metric.description)
        .bind(metric.icon)
        .bind(metric.display_order)
        .bind(&now)
        .execute(&mut *conn)
        .await?;
    }

    for category in SAMPLE_REVENUE {
        sqlx::query(
            "INSERT INTO revenue_breakdowns (category, percentage, color_class, display_order, year, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $6)",
        )
        .bind(category.category)
        .bind(category.percentage)
        .bind(category.color_class)
        .bind(category.display_order)
        .bind(category.year)
        .bind(&now)
        .execute(&mut *conn)
        .await?;
    }

    for (year, revenue, growth, profit) in SAMPLE_YEARS {
        sqlx::query(
            "INSERT INTO yearly_financials (year, revenue, growth_percentage, profit, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $5)",
        )
        .bind(*year)
        .bind(*revenue)
        .bind(*growth)
        .bind(*profit)
        .bind(&now)
        .execute(&mut *conn)
        .await?;
    }

    for event in sample_events(current_year) {
        sqlx::query(
            "INSERT INTO investor_events (title, description, event_date, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(&event.title)
        .bind(event.description)
        .bind(event.event_date.format("%Y-%m-%d").to_string())
        .bind(&now)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}
