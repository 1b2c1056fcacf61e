use std::borrow::Cow;

use axum::{extract::State, response::Html};
use chrono::NaiveDate;
use sqlx::AnyPool;
use tracing::error;

use crate::web::{
    AppState,
    data::{
        fetch_financial_metrics, fetch_revenue_breakdown, fetch_upcoming_investor_events,
        fetch_yearly_financials,
    },
    models::{
        FinancialMetricView, InvestorEventView, RevenueBreakdownView, YearlyFinancialView, today,
    },
    templates::{PageLayout, escape_html, render_page},
};

const YEARLY_LIMIT: i64 = 5;
const UPCOMING_EVENTS_LIMIT: i64 = 3;

/// Everything the financials page shows. When `has_dynamic_data` is false the
/// collections are empty and the page falls back to its built-in figures.
#[derive(Debug, Default)]
pub struct FinancialsPageData {
    pub has_dynamic_data: bool,
    pub financial_metrics: Vec<FinancialMetricView>,
    pub revenue_breakdown: Vec<RevenueBreakdownView>,
    pub yearly_financials: Vec<YearlyFinancialView>,
    pub investor_events: Vec<InvestorEventView>,
}

pub async fn load_financials_page_data(
    pool: &AnyPool,
    today: NaiveDate,
) -> sqlx::Result<FinancialsPageData> {
    let metrics = fetch_financial_metrics(pool).await?;
    let breakdown = fetch_revenue_breakdown(pool).await?;
    let yearly = fetch_yearly_financials(pool, Some(YEARLY_LIMIT)).await?;
    let events = fetch_upcoming_investor_events(
        pool,
        &today.format("%Y-%m-%d").to_string(),
        UPCOMING_EVENTS_LIMIT,
    )
    .await?;

    if metrics.is_empty() || breakdown.is_empty() || yearly.is_empty() || events.is_empty() {
        return Ok(FinancialsPageData::default());
    }

    Ok(FinancialsPageData {
        has_dynamic_data: true,
        financial_metrics: metrics.into_iter().map(Into::into).collect(),
        revenue_breakdown: breakdown.into_iter().map(Into::into).collect(),
        yearly_financials: yearly.into_iter().map(Into::into).collect(),
        investor_events: events.into_iter().map(Into::into).collect(),
    })
}

pub async fn financials_page(State(state): State<AppState>) -> Html<String> {
    let data = load_financials_page_data(state.pool_ref(), today())
        .await
        .unwrap_or_else(|err| {
            error!(?err, "error fetching financial data");
            FinancialsPageData::default()
        });

    Html(render_page(PageLayout {
        meta_title: "Financials",
        active_page: "financials",
        flash_html: Cow::Borrowed(""),
        body_html: Cow::Owned(render_financials_body(&data)),
    }))
}

fn render_financials_body(data: &FinancialsPageData) -> String {
    let sections = if data.has_dynamic_data {
        Cow::Owned(render_dynamic_sections(data))
    } else {
        Cow::Borrowed(STATIC_FINANCIALS_HTML)
    };

    format!(
        r#"<div id="financials" data-has-dynamic-data="{flag}">
        <section class="panel">
            <h1>Financial performance</h1>
            <p class="note">Key figures for shareholders, analysts and partners.</p>
        </section>
{sections}
        </div>"#,
        flag = data.has_dynamic_data,
    )
}

fn render_dynamic_sections(data: &FinancialsPageData) -> String {
    let metrics = data
        .financial_metrics
        .iter()
        .map(|metric| {
            format!(
                r#"<div class="panel"><p><i class="{icon}"></i> {name}</p><p class="metric-value">{value:.1}%</p><p class="note">{description}</p></div>"#,
                icon = escape_html(metric.icon.as_deref().unwrap_or_default()),
                name = escape_html(&metric.name),
                value = metric.value,
                description = escape_html(metric.description.as_deref().unwrap_or_default()),
            )
        })
        .collect::<String>();

    let breakdown = data
        .revenue_breakdown
        .iter()
        .map(|entry| {
            format!(
                r#"<div><p>{category} ({percentage:.0}%)</p><div class="bar {color}" style="width: {percentage:.0}%"></div></div>"#,
                category = escape_html(&entry.category),
                percentage = entry.percentage,
                color = escape_html(&entry.color_class),
            )
        })
        .collect::<String>();

    let yearly = data
        .yearly_financials
        .iter()
        .map(|row| {
            format!(
                "<tr><td>{year}</td><td>${revenue:.1}M</td><td>{growth}</td><td>{profit}</td></tr>",
                year = row.year,
                revenue = row.revenue,
                growth = row
                    .growth_percentage
                    .map(|g| format!("{g:.1}%"))
                    .unwrap_or_else(|| "-".to_string()),
                profit = row
                    .profit
                    .map(|p| format!("${p:.1}M"))
                    .unwrap_or_else(|| "-".to_string()),
            )
        })
        .collect::<String>();

    let events = data
        .investor_events
        .iter()
        .map(|event| {
            format!(
                r#"<li><strong>{date}</strong> {title}<br><span class="note">{description}</span></li>"#,
                date = escape_html(&event.event_date),
                title = escape_html(&event.title),
                description = escape_html(event.description.as_deref().unwrap_or_default()),
            )
        })
        .collect::<String>();

    format!(
        r#"        <section class="grid">{metrics}</section>
        <section class="panel"><h2>Revenue breakdown</h2>{breakdown}</section>
        <section class="panel"><h2>Five-year summary</h2>
            <table><thead><tr><th>Year</th><th>Revenue</th><th>Growth</th><th>Profit</th></tr></thead><tbody>{yearly}</tbody></table>
        </section>
        <section class="panel"><h2>Upcoming investor events</h2><ul>{events}</ul></section>"#
    )
}

const STATIC_FINANCIALS_HTML: &str = r#"        <section class="grid">
            <div class="panel"><p><i class="fas fa-dollar-sign"></i> Revenue Growth</p><p class="metric-value">24.0%</p><p class="note">Year-over-year revenue growth, outperforming industry average of 18%</p></div>
            <div class="panel"><p><i class="fas fa-chart-pie"></i> Profit Margin</p><p class="metric-value">18.5%</p><p class="note">Strong profit margins reflecting our operational efficiency</p></div>
            <div class="panel"><p><i class="fas fa-hand-holding-usd"></i> Return on Investment</p><p class="metric-value">21.2%</p><p class="note">Strong returns for our investors across all business units</p></div>
        </section>
        <section class="panel"><h2>Revenue breakdown</h2>
            <div><p>Product Sales (45%)</p><div class="bar bg-primary" style="width: 45%"></div></div>
            <div><p>Service Contracts (30%)</p><div class="bar bg-success" style="width: 30%"></div></div>
            <div><p>Consulting (15%)</p><div class="bar bg-info" style="width: 15%"></div></div>
            <div><p>Licensing (10%)</p><div class="bar bg-warning" style="width: 10%"></div></div>
        </section>
        <section class="panel"><h2>Five-year summary</h2>
            <table><thead><tr><th>Year</th><th>Revenue</th><th>Growth</th><th>Profit</th></tr></thead><tbody>
                <tr><td>2024</td><td>$152.4M</td><td>24.0%</td><td>$28.2M</td></tr>
                <tr><td>2023</td><td>$122.9M</td><td>20.0%</td><td>$22.1M</td></tr>
                <tr><td>2022</td><td>$102.4M</td><td>18.0%</td><td>$18.4M</td></tr>
                <tr><td>2021</td><td>$86.8M</td><td>15.0%</td><td>$15.2M</td></tr>
                <tr><td>2020</td><td>$75.5M</td><td>12.0%</td><td>$12.8M</td></tr>
            </tbody></table>
        </section>
        <section class="panel"><h2>Upcoming investor events</h2>
            <p class="note">Our investor calendar will be published here shortly.</p>
        </section>"#;
