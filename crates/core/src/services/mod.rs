pub mod aggregator;
pub mod holdings_service;
pub mod projection_engine;
