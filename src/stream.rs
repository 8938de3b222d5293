// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Update Stream Bridge
//!
//! Adapts the push-based ledger subscription to a pull-based server-sent-event
//! response. The session delivers update batches through a bounded channel;
//! this module wraps the receiving half as a stream of SSE events, one event
//! per batch, in ledger commit order. Batches are never merged, reordered or
//! buffered beyond the channel bound: a slow client backpressures the
//! session's forwarding task instead of growing a queue.
//!
//! Dropping the returned stream (client disconnect, server shutdown) drops
//! the receiver, which the session observes as a failed send and releases
//! the upstream subscription.

use axum::response::sse::Event;
use futures::Stream;
use futures::StreamExt;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use utoipa::ToSchema;

use crate::aggregate::{sum_tokens, AggregateBalance};
use crate::ledger::{Family, UpdateBatch};
use crate::snapshot::{key_entries, Snapshot};

/// One vault update event for the generic and linked families: consumed and
/// produced records keyed per family.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct StateUpdate {
    #[schema(value_type = Object)]
    pub consumed: Snapshot,
    #[schema(value_type = Object)]
    pub produced: Snapshot,
}

/// One vault update event for the fungible family: gross consumed and gross
/// produced balances, summed separately and never netted.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TokenUpdate {
    #[schema(value_type = Object)]
    pub consumed: AggregateBalance,
    #[schema(value_type = Object)]
    pub produced: AggregateBalance,
}

/// Re-shape one batch into the keyed representation of `family`.
pub fn state_envelope(batch: &UpdateBatch, family: Family) -> StateUpdate {
    StateUpdate {
        consumed: key_entries(&batch.consumed, family),
        produced: key_entries(&batch.produced, family),
    }
}

/// Re-shape one batch into gross consumed/produced balances.
pub fn token_envelope(batch: &UpdateBatch) -> TokenUpdate {
    TokenUpdate {
        consumed: sum_tokens(&batch.consumed),
        produced: sum_tokens(&batch.produced),
    }
}

/// SSE events for a generic- or linked-family subscription.
pub fn state_events(
    rx: mpsc::Receiver<UpdateBatch>,
    family: Family,
) -> impl Stream<Item = Result<Event, axum::Error>> {
    ReceiverStream::new(rx)
        .map(move |batch| Event::default().json_data(state_envelope(&batch, family)))
}

/// SSE events for a fungible-family subscription.
pub fn token_events(
    rx: mpsc::Receiver<UpdateBatch>,
) -> impl Stream<Item = Result<Event, axum::Error>> {
    ReceiverStream::new(rx).map(|batch| Event::default().json_data(token_envelope(&batch)))
}
