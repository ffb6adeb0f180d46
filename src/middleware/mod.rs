//! # Middleware Module
//!
//! Request processing layers applied to every route.

pub mod cors;
pub mod json_body;

pub use json_body::{JsonBody, JsonBodyLimit};
