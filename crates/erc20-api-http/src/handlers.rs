//! Request handlers.
//!
//! Each handler delegates to the [`TokenService`](erc20_api_evm::TokenService)
//! and maps its errors to `{"error": "<message>"}` bodies.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{error, warn};

use erc20_api_core::audit::AuditEvent;
use erc20_api_evm::{AllowanceInfo, BalanceInfo, ServiceError, TokenInfo, TxResult};

use crate::openapi;
use crate::server::AppState;
use crate::types::{
    field_amount, field_text, ApproveRequest, RecipientRequest, TransferFromRequest,
};

/// Errors returned by handlers.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Internal(String),
}

impl HandlerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn bad_request(err: ServiceError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let mut message = self.to_string();
        if message.is_empty() {
            message = "request failed".into();
        }
        (self.status(), Json(json!({ "error": message }))).into_response()
    }
}

type HandlerResult<T> = Result<Json<T>, HandlerError>;

/// Parses a JSON request body. An empty body is treated as `{}`.
fn parse_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, HandlerError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| HandlerError::BadRequest(format!("invalid JSON body: {e}")))
}

/// Appends a write to the audit log, if one is configured.
fn audit(
    state: &AppState,
    operation: &str,
    mut details: Value,
    result: &Result<TxResult, ServiceError>,
) {
    let Some(audit) = &state.audit else {
        return;
    };

    let outcome = match result {
        Ok(tx) => {
            details["hash"] = json!(tx.hash);
            match tx.status {
                1 => "success".to_string(),
                _ => "reverted".to_string(),
            }
        }
        Err(e) => format!("error: {e}"),
    };

    let event = AuditEvent::new(operation, details, outcome);
    match audit.lock() {
        Ok(mut logger) => {
            if let Err(e) = logger.log_event(event) {
                warn!(operation, "failed to write audit event: {e}");
            }
        }
        Err(_) => warn!(operation, "audit logger lock poisoned"),
    }
}

/// `GET /health`
pub async fn handle_health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

/// `GET /docs`
pub async fn handle_docs() -> Json<Value> {
    Json(openapi::document())
}

/// `GET /api/token`
pub async fn handle_token(State(state): State<AppState>) -> HandlerResult<TokenInfo> {
    state.service.token_info().await.map(Json).map_err(|e| {
        error!("token info failed: {e}");
        HandlerError::Internal(e.to_string())
    })
}

/// `GET /api/balance/:address`
pub async fn handle_balance(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> HandlerResult<BalanceInfo> {
    state
        .service
        .balance(&address)
        .await
        .map(Json)
        .map_err(HandlerError::bad_request)
}

/// `GET /api/allowance/:owner/:spender`
pub async fn handle_allowance(
    State(state): State<AppState>,
    Path((owner, spender)): Path<(String, String)>,
) -> HandlerResult<AllowanceInfo> {
    state
        .service
        .allowance(&owner, &spender)
        .await
        .map(Json)
        .map_err(HandlerError::bad_request)
}

/// `POST /api/approve`
pub async fn handle_approve(State(state): State<AppState>, body: Bytes) -> HandlerResult<TxResult> {
    let req: ApproveRequest = parse_body(&body)?;
    let spender = field_text(&req.spender);
    let amount = field_amount(&req.amount);

    let result = state.service.approve(&spender, &amount).await;
    audit(
        &state,
        "approve",
        json!({ "spender": spender, "amount": amount.to_string() }),
        &result,
    );
    result.map(Json).map_err(HandlerError::bad_request)
}

/// `POST /api/transferFrom`
pub async fn handle_transfer_from(
    State(state): State<AppState>,
    body: Bytes,
) -> HandlerResult<TxResult> {
    let req: TransferFromRequest = parse_body(&body)?;
    let from = field_text(&req.from);
    let to = field_text(&req.to);
    let amount = field_amount(&req.amount);

    let result = state.service.transfer_from(&from, &to, &amount).await;
    audit(
        &state,
        "transfer_from",
        json!({ "from": from, "to": to, "amount": amount.to_string() }),
        &result,
    );
    result.map(Json).map_err(HandlerError::bad_request)
}

/// `POST /api/transfer`
pub async fn handle_transfer(State(state): State<AppState>, body: Bytes) -> HandlerResult<TxResult> {
    let req: RecipientRequest = parse_body(&body)?;
    let to = field_text(&req.to);
    let amount = field_amount(&req.amount);

    let result = state.service.transfer(&to, &amount).await;
    audit(
        &state,
        "transfer",
        json!({ "to": to, "amount": amount.to_string() }),
        &result,
    );
    result.map(Json).map_err(HandlerError::bad_request)
}

/// `POST /api/mint`
pub async fn handle_mint(State(state): State<AppState>, body: Bytes) -> HandlerResult<TxResult> {
    let req: RecipientRequest = parse_body(&body)?;
    let to = field_text(&req.to);
    let amount = field_amount(&req.amount);

    let result = state.service.mint(&to, &amount).await;
    audit(
        &state,
        "mint",
        json!({ "to": to, "amount": amount.to_string() }),
        &result,
    );
    result.map(Json).map_err(HandlerError::bad_request)
}
