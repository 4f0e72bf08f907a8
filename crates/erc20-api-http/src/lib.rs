//! # erc20-api-http
//!
//! REST endpoints over the token service, served with axum.

pub mod handlers;
pub mod openapi;
pub mod routes;
pub mod server;
pub mod types;

pub use routes::build_router;
pub use server::{AppState, HttpServer, ServerConfig};
