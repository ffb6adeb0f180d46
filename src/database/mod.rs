//! # Database Module
//!
//! PostgreSQL connection pooling with tokio-postgres and deadpool.

pub mod connection;

pub use connection::{ConnectionStats, DatabaseConfig, DatabaseConnection};
