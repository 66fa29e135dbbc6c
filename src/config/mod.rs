/// Database connection and table creation
pub mod database;

/// Library settings loaded from library.toml and the environment
pub mod settings;
