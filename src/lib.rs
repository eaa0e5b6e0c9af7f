pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

// Re-export commonly used items
pub use models::stats::AggregateResponse;
pub use services::stats_service::StatsService;
