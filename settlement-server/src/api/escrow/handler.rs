//! Escrow API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use validator::Validate;

use shared::error::{AppError, AppResult};
use shared::escrow::{CreateEscrowInput, EscrowAccount};

use crate::core::ServerState;
use crate::settlement::ExpiryStatus;

/// Create escrow request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateEscrowRequest {
    #[validate(length(min = 1, max = 64))]
    pub order_id: String,
    #[validate(length(min = 1, max = 64))]
    pub buyer_id: String,
    #[validate(length(min = 1, max = 64))]
    pub supplier_id: String,
    pub amount: f64,
    #[validate(length(equal = 3))]
    pub currency: String,
}

/// Fund escrow request
#[derive(Debug, Deserialize, Validate)]
pub struct FundEscrowRequest {
    #[validate(length(min = 1, max = 64))]
    pub payment_method: String,
    #[validate(length(min = 1, max = 64))]
    pub transaction_id: String,
}

/// Release escrow request - QC outcome supplied by the external QC system
#[derive(Debug, Deserialize)]
pub struct ReleaseEscrowRequest {
    pub qc_passed: bool,
}

/// Refund escrow request
#[derive(Debug, Deserialize, Validate)]
pub struct RefundEscrowRequest {
    #[validate(length(min = 1, max = 500))]
    pub reason: String,
}

/// Create an escrow account for an order
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CreateEscrowRequest>,
) -> AppResult<Json<EscrowAccount>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    let input = CreateEscrowInput {
        order_id: payload.order_id,
        buyer_id: payload.buyer_id,
        supplier_id: payload.supplier_id,
        amount: payload.amount,
        currency: payload.currency,
    };
    let account = state.orchestrator.create_escrow(&input).await?;
    Ok(Json(account))
}

/// Get escrow account by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<EscrowAccount>> {
    let account = state.orchestrator.get_escrow(&id).await?;
    Ok(Json(account))
}

/// Get the escrow account owning an order
pub async fn get_by_order(
    State(state): State<ServerState>,
    Path(order_id): Path<String>,
) -> AppResult<Json<EscrowAccount>> {
    let account = state
        .ledger
        .find_escrow_by_order(&order_id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::not_found(format!("escrow for order {}", order_id)))?;
    Ok(Json(account))
}

/// Fund a pending escrow account
pub async fn fund(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<FundEscrowRequest>,
) -> AppResult<Json<EscrowAccount>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    let account = state
        .orchestrator
        .fund_escrow(&id, &payload.payment_method, &payload.transaction_id)
        .await?;
    Ok(Json(account))
}

/// Settle a funded account on the QC outcome
pub async fn release(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ReleaseEscrowRequest>,
) -> AppResult<Json<EscrowAccount>> {
    let account = state
        .orchestrator
        .release_escrow(&id, payload.qc_passed)
        .await?;
    Ok(Json(account))
}

/// Refund a funded-but-undelivered order
pub async fn refund(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<RefundEscrowRequest>,
) -> AppResult<Json<EscrowAccount>> {
    let account = state
        .orchestrator
        .refund_escrow(&id, &payload.reason)
        .await?;
    Ok(Json(account))
}

/// Read-time expiry observation
pub async fn check_expiry(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ExpiryStatus>> {
    let status = state.orchestrator.check_expiry(&id).await?;
    Ok(Json(status))
}
