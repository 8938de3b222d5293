// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token issuance endpoint. Invokes the remote issue flow and returns the
//! identifier of the resulting transaction.
//!
//! The flow itself returns a signed-transaction object; only its identifier
//! is representable in this response, so the gateway requires the node to
//! report the identifier as a JSON string and fails fast on anything else
//! instead of emitting malformed output.

use axum::{extract::State, Json};

use crate::error::ApiError;
use crate::ledger::session::PROC_ISSUE;
use crate::models::{IssueRequest, IssueResponse};
use crate::state::AppState;

/// Issue new fungible REC tokens to a holder.
#[utoipa::path(
    post,
    path = "/issue/",
    tag = "Issue",
    request_body = IssueRequest,
    responses(
        (status = 200, description = "Identifier of the issue transaction", body = IssueResponse),
        (status = 400, description = "Malformed request body"),
        (status = 500, description = "Flow result not representable as a transaction id"),
        (status = 502, description = "Issue flow failed"),
        (status = 503, description = "Ledger session unavailable")
    )
)]
pub async fn issue_tokens(
    State(state): State<AppState>,
    Json(request): Json<IssueRequest>,
) -> Result<Json<IssueResponse>, ApiError> {
    if request.quantity == 0 {
        return Err(ApiError::bad_request("quantity must be positive"));
    }

    let args = serde_json::to_value(&request)
        .map_err(|e| ApiError::internal(format!("failed to encode flow arguments: {e}")))?;
    let result = state.session.invoke(PROC_ISSUE, args).await?;

    let transaction_id = result.as_str().ok_or_else(|| {
        tracing::error!(?result, "Issue flow result is not a transaction id string");
        ApiError::internal("issue flow result is not representable as a transaction id")
    })?;

    tracing::info!(
        transaction_id,
        holder = %request.holder,
        quantity = request.quantity,
        "Issued REC tokens"
    );
    Ok(Json(IssueResponse {
        transaction_id: transaction_id.to_string(),
    }))
}
