/// Database configuration and connection management
pub mod database;

/// Reference data and inventory settings loaded from config.toml
pub mod catalog;
