//! API route definitions.
//!
//! Maps HTTP paths to handler functions.

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    handle_allowance, handle_approve, handle_balance, handle_docs, handle_health, handle_mint,
    handle_token, handle_transfer, handle_transfer_from,
};
use crate::server::AppState;

/// Builds the axum router with all API routes.
///
/// Routes:
/// - `GET /health` health check
/// - `GET /docs` OpenAPI document
/// - `GET /api/token` token metadata and supply
/// - `GET /api/balance/:address` holder balance
/// - `GET /api/allowance/:owner/:spender` spender allowance
/// - `POST /api/approve`, `/api/transferFrom`, `/api/transfer`, `/api/mint` signed writes
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/token", get(handle_token))
        .route("/balance/:address", get(handle_balance))
        .route("/allowance/:owner/:spender", get(handle_allowance))
        .route("/approve", post(handle_approve))
        .route("/transferFrom", post(handle_transfer_from))
        .route("/transfer", post(handle_transfer))
        .route("/mint", post(handle_mint));

    Router::new()
        .route("/health", get(handle_health))
        .route("/docs", get(handle_docs))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
