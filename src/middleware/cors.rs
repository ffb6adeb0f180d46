//! Cross-origin policy
//!
//! Any origin may call the API. Preflight requests advertise the usual REST
//! methods and echo back whatever headers the browser asks for.

use axum::http::Method;
use tower_http::cors::{AllowHeaders, Any, CorsLayer};

pub const ALLOWED_METHODS: [Method; 6] = [
    Method::GET,
    Method::HEAD,
    Method::PUT,
    Method::PATCH,
    Method::POST,
    Method::DELETE,
];

pub fn permissive() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(ALLOWED_METHODS)
        .allow_headers(AllowHeaders::mirror_request())
}
