pub mod cache;
pub mod stats;
