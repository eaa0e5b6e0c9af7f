pub mod normalize;
pub mod stats_service;
