// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Fungible-family endpoints: aggregated balances instead of raw records.
//! No request body; the fungible REC token schema is fixed.

use axum::{
    extract::State,
    response::sse::{KeepAlive, Sse},
    Json,
};
use futures::Stream;
use futures::StreamExt;

use crate::aggregate::{sum_tokens, AggregateBalance};
use crate::error::ApiError;
use crate::ledger::{Family, StatusFilter};
use crate::snapshot;
use crate::state::AppState;
use crate::stream::token_events;

/// Current balances: total active quantity per (issuer, token type).
#[utoipa::path(
    post,
    path = "/tokens/",
    tag = "Tokens",
    responses(
        (status = 200, description = "Balances keyed by `tokenType@issuer`", body = Object),
        (status = 502, description = "Vault query failed"),
        (status = 503, description = "Ledger session unavailable")
    )
)]
pub async fn snapshot(State(state): State<AppState>) -> Result<Json<AggregateBalance>, ApiError> {
    let schema = state
        .registry
        .resolve(crate::registry::FUNGIBLE_REC_TOKEN, Family::Fungible)?;
    let entries = snapshot::fetch(state.session.as_ref(), &schema, StatusFilter::Active).await?;
    let balance = sum_tokens(&entries);
    tracing::debug!(groups = balance.len(), "Served token balance snapshot");
    Ok(Json(balance))
}

/// Live balance feed: one SSE event per committed transaction carrying the
/// gross consumed and gross produced amounts per (issuer, token type).
#[utoipa::path(
    post,
    path = "/tokens/updates",
    tag = "Tokens",
    responses(
        (status = 200, description = "Stream of balance updates", body = crate::stream::TokenUpdate,
            content_type = "text/event-stream"),
        (status = 502, description = "Subscription could not be opened"),
        (status = 503, description = "Ledger session unavailable")
    )
)]
pub async fn updates(
    State(state): State<AppState>,
) -> Result<Sse<impl Stream<Item = Result<axum::response::sse::Event, axum::Error>>>, ApiError> {
    let schema = state
        .registry
        .resolve(crate::registry::FUNGIBLE_REC_TOKEN, Family::Fungible)?;
    let rx = state.session.subscribe(&schema, StatusFilter::All).await?;
    tracing::debug!("Opened token balance update stream");
    let events = token_events(rx).take_until(state.shutdown.clone().cancelled_owned());
    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}
