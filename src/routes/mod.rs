// # Routes Module
//
// HTTP route handlers, one submodule per API area.
//
// ## Available Route Modules
// - `health`: liveness probe at `/api/ping`

/// Health check and monitoring endpoints
pub mod health;
