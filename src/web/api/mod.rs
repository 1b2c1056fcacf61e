mod content;
mod directory;
mod financials;

pub use content::{
    create_content_item, create_workflow, delete_content_item, get_content_item,
    list_content_items, list_workflows, update_content_item,
};
pub use directory::{
    create_announcement, create_document, delete_announcement, delete_document,
    list_announcements, list_documents, list_employees,
};
pub use financials::{
    create_financial_metric, list_financial_metrics, list_investor_events,
    list_revenue_breakdown, list_yearly_financials,
};
