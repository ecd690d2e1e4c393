/// Database connection, schema migration and seeding
pub mod database;

/// Application settings loaded from config.toml
pub mod settings;
