pub mod holding;
pub mod metadata;
pub mod portfolio;
pub mod projection;
pub mod settings;
pub mod summary;
