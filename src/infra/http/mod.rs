//! reqwest-backed Post-API and login exchange.

mod auth;
mod client;
mod posts;

pub use auth::HttpAuthExchange;
pub use client::ApiClient;
pub use posts::HttpPostApi;

pub(crate) const API_REQUESTS_TOTAL: &str = "penman_api_requests_total";
