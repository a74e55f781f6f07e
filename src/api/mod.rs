//! API Module
//!
//! HTTP handlers and routing for inspecting and driving one cache instance.
//!
//! # Endpoints
//! - `PUT /cache` - Store a key-value pair
//! - `DELETE /cache` - Invalidate every entry
//! - `GET /cache/:key` - Retrieve a live value by key
//! - `DELETE /cache/:key` - Invalidate a key
//! - `GET /keys` - List physically present keys
//! - `POST /cleanup` - Sweep expired entries
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
