use axum::{
    Router,
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;

use crate::web::{AppState, api, auth, financials, pages, seed};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::home))
        .route("/about", get(pages::about))
        .route("/services", get(pages::services))
        .route("/team", get(pages::team))
        .route("/careers", get(pages::careers))
        .route("/financials", get(financials::financials_page))
        .route(
            "/contact",
            get(pages::contact_page).post(pages::submit_contact),
        )
        .route("/admin/init-financial-data", get(seed::init_financial_data))
        .route("/healthz", get(healthz))
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
        .route("/api/logout", post(auth::logout))
        .route("/api/user", get(auth::current_user))
        .route("/api/employees", get(api::list_employees))
        .route(
            "/api/documents",
            get(api::list_documents).post(api::create_document),
        )
        .route("/api/documents/:id", delete(api::delete_document))
        .route(
            "/api/announcements",
            get(api::list_announcements).post(api::create_announcement),
        )
        .route("/api/announcements/:id", delete(api::delete_announcement))
        .route(
            "/api/financials/metrics",
            get(api::list_financial_metrics).post(api::create_financial_metric),
        )
        .route(
            "/api/financials/revenue-breakdown",
            get(api::list_revenue_breakdown),
        )
        .route("/api/financials/yearly", get(api::list_yearly_financials))
        .route(
            "/api/financials/investor-events",
            get(api::list_investor_events),
        )
        .route(
            "/api/content",
            get(api::list_content_items).post(api::create_content_item),
        )
        .route(
            "/api/content/:id",
            get(api::get_content_item)
                .put(api::update_content_item)
                .delete(api::delete_content_item),
        )
        .route(
            "/api/workflows",
            get(api::list_workflows).post(api::create_workflow),
        )
        .fallback(pages::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    StatusCode::OK
}
