pub mod api;
pub mod auth;
pub mod data;
pub mod financials;
pub mod flash;
pub mod models;
pub mod pages;
pub mod responses;
pub mod router;
pub mod seed;
pub mod state;
pub mod templates;

#[cfg(test)]
mod tests;

pub use state::AppState;
