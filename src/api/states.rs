// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Generic-family endpoints: full snapshots keyed by record reference and
//! the matching live update feed.

use axum::{
    extract::State,
    response::sse::{KeepAlive, Sse},
    Json,
};
use futures::Stream;
use futures::StreamExt;

use super::parse_type_name;
use crate::error::ApiError;
use crate::ledger::{Family, StatusFilter};
use crate::snapshot::{self, key_entries, Snapshot};
use crate::state::AppState;
use crate::stream::state_events;

/// Snapshot of all active records of the named type, keyed by reference.
#[utoipa::path(
    post,
    path = "/states/",
    tag = "States",
    request_body(content = String, description = "Fully-qualified record type name"),
    responses(
        (status = 200, description = "Active records keyed by `txhash(index)`", body = Object),
        (status = 400, description = "Unknown type or malformed body"),
        (status = 502, description = "Vault query failed"),
        (status = 503, description = "Ledger session unavailable")
    )
)]
pub async fn snapshot(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<Snapshot>, ApiError> {
    let name = parse_type_name(&body)?;
    let schema = state.registry.resolve(name, Family::Generic)?;
    let entries = snapshot::fetch(state.session.as_ref(), &schema, StatusFilter::Active).await?;
    tracing::debug!(schema = %schema.name, records = entries.len(), "Served state snapshot");
    Ok(Json(key_entries(&entries, Family::Generic)))
}

/// Live update feed for the named type: one SSE event per committed
/// transaction, consumed and produced records keyed by reference.
#[utoipa::path(
    post,
    path = "/states/updates",
    tag = "States",
    request_body(content = String, description = "Fully-qualified record type name"),
    responses(
        (status = 200, description = "Stream of vault updates", body = crate::stream::StateUpdate,
            content_type = "text/event-stream"),
        (status = 400, description = "Unknown type or malformed body"),
        (status = 502, description = "Subscription could not be opened"),
        (status = 503, description = "Ledger session unavailable")
    )
)]
pub async fn updates(
    State(state): State<AppState>,
    body: String,
) -> Result<Sse<impl Stream<Item = Result<axum::response::sse::Event, axum::Error>>>, ApiError> {
    let name = parse_type_name(&body)?;
    let schema = state.registry.resolve(name, Family::Generic)?;
    let rx = state.session.subscribe(&schema, StatusFilter::All).await?;
    tracing::debug!(schema = %schema.name, "Opened state update stream");
    let events = state_events(rx, Family::Generic)
        .take_until(state.shutdown.clone().cancelled_owned());
    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}
