//! # ERP Backend
//!
//! HTTP backend for the ERP application, built with Axum and Tokio.
//!
//! ## Architecture
//! - `server`: router construction, listener bootstrap and shutdown
//! - `config`: environment variable configuration
//! - `database`: PostgreSQL connection pool handle
//! - `middleware`: CORS policy and JSON body parsing
//! - `routes`: HTTP route handlers
//!   - `health`: liveness probe at `/api/ping`

pub mod clock;
pub mod config;
pub mod database;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
