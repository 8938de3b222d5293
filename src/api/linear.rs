// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Linked-family endpoints: snapshots and update feeds keyed by the durable
//! record identity rather than the per-version reference.

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

/// Snapshot of all active linked records of the named type, keyed by
/// record identity.
#[utoipa::path(
    post,
    path = "/linear/",
    tag = "Linear",
    request_body(content = String, description = "Fully-qualified record type name"),
    responses(
        (status = 200, description = "Active records keyed by identity", body = Object),
        (status = 400, description = "Unknown type, wrong family or malformed body"),
        (status = 502, description = "Vault query failed"),
        (status = 503, description = "Ledger session unavailable")
    )
)]
pub async fn snapshot(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<Snapshot>, ApiError> {
    let name = parse_type_name(&body)?;
    let schema = state.registry.resolve(name, Family::Linked)?;
    let entries = snapshot::fetch(state.session.as_ref(), &schema, StatusFilter::Active).await?;
    tracing::debug!(schema = %schema.name, records = entries.len(), "Served linear snapshot");
    Ok(Json(key_entries(&entries, Family::Linked)))
}

/// Live update feed for the named linked type, keyed by record identity.
#[utoipa::path(
    post,
    path = "/linear/updates",
    tag = "Linear",
    request_body(content = String, description = "Fully-qualified record type name"),
    responses(
        (status = 200, description = "Stream of vault updates", body = crate::stream::StateUpdate,
            content_type = "text/event-stream"),
        (status = 400, description = "Unknown type, wrong family or malformed body"),
        (status = 502, description = "Subscription could not be opened"),
        (status = 503, description = "Ledger session unavailable")
    )
)]
pub async fn updates(
    State(state): State<AppState>,
    body: String,
) -> Result<Sse<impl Stream<Item = Result<axum::response::sse::Event, axum::Error>>>, ApiError> {
    let name = parse_type_name(&body)?;
    let schema = state.registry.resolve(name, Family::Linked)?;
    let rx = state.session.subscribe(&schema, StatusFilter::All).await?;
    tracing::debug!(schema = %schema.name, "Opened linear update stream");
    let events = state_events(rx, Family::Linked)
        .take_until(state.shutdown.clone().cancelled_owned());
    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    use crate::ledger::mock::{linked_entry, MockLedgerSession};
    use crate::ledger::QueryPage;
    use crate::registry::{ENERGY_PRODUCTION, FUNGIBLE_REC_TOKEN};

    #[tokio::test]
    async fn snapshot_returns_records_keyed_by_identity() {
        let first = linked_entry("tx0", 0);
        let identity = first.record.identity.unwrap().to_string();
        let session = MockLedgerSession::new().with_pages(vec![QueryPage {
            entries: vec![first, linked_entry("tx1", 0)],
            total_available: 2,
        }]);
        let state = AppState::for_tests(session);

        let Json(snapshot) = snapshot(State(state), ENERGY_PRODUCTION.to_string())
            .await
            .unwrap();
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.contains_key(&identity));
    }

    #[tokio::test]
    async fn non_linked_types_are_rejected() {
        // The token schema resolves, but not as a member of the linked family.
        let state = AppState::for_tests(MockLedgerSession::new());
        let err = snapshot(State(state), FUNGIBLE_REC_TOKEN.to_string())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.message.contains("linked"));
    }

    #[tokio::test]
    async fn updates_enforce_the_family_check_too() {
        let state = AppState::for_tests(MockLedgerSession::new());
        let err = updates(State(state), FUNGIBLE_REC_TOKEN.to_string())
            .await
            .err()
            .expect("family mismatch must not open a stream");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn updates_opens_a_stream_for_linked_types() {
        let state = AppState::for_tests(MockLedgerSession::new());
        assert!(updates(State(state), ENERGY_PRODUCTION.to_string())
            .await
            .is_ok());
    }
}
