// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Ledger Session
//!
//! The seam between the gateway and the remote ledger node. A session is an
//! established, authenticated handle exposing three capabilities:
//!
//! 1. bounded-page vault queries by schema and status filter,
//! 2. live subscriptions yielding consumed/produced update batches,
//! 3. one-shot invocation of named remote procedures (flows).
//!
//! One session is created at process start and shared by every request; all
//! operations must be safe to call concurrently. Reconnection and credential
//! handling live behind this trait, not in the gateway.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{
    NetworkParameters, NodeInfo, PageSpec, QueryPage, StatusFilter, UpdateBatch,
};
use crate::registry::SchemaDescriptor;

/// Remote procedure that issues new fungible REC tokens to a holder.
pub const PROC_ISSUE: &str = "issue";

/// Remote procedure that moves held tokens to a new holder.
pub const PROC_MOVE: &str = "move";

/// Remote procedure that redeems (retires) held tokens with their issuer.
pub const PROC_REDEEM: &str = "redeem";

/// Capacity of the per-subscription batch channel. A slow HTTP client
/// backpressures the forwarding task once this many batches are queued;
/// batches are never dropped or reordered.
pub const UPDATE_CHANNEL_CAPACITY: usize = 32;

/// Errors surfaced by session operations. The gateway never retries these;
/// they map onto upstream-failure HTTP statuses at the request boundary.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The session is not established (connect failed or was torn down).
    #[error("ledger session unavailable: {0}")]
    Unavailable(String),

    /// A vault query failed at the transport or on the node.
    #[error("vault query failed: {0}")]
    QueryFailed(String),

    /// A subscription could not be opened or broke mid-stream.
    #[error("update subscription failed: {0}")]
    StreamFailed(String),

    /// A remote procedure invocation was rejected or errored.
    #[error("remote procedure `{procedure}` failed: {message}")]
    InvocationFailed { procedure: String, message: String },
}

/// Authenticated handle to the remote ledger node.
///
/// Subscriptions are handed back as the receiving half of a bounded channel.
/// Dropping the receiver is the cancellation signal: the implementation must
/// release the upstream subscription as soon as a send fails. A fresh
/// subscription starts from "now" and never replays history.
#[async_trait]
pub trait LedgerSession: Send + Sync {
    /// Legal identity name of the node this session is connected to.
    async fn our_identity(&self) -> Result<String, SessionError>;

    /// Legal identity names of all participants currently in the network map.
    async fn network_peers(&self) -> Result<Vec<String>, SessionError>;

    /// Node diagnostic information.
    async fn node_info(&self) -> Result<NodeInfo, SessionError>;

    /// Network-wide parameters.
    async fn network_parameters(&self) -> Result<NetworkParameters, SessionError>;

    /// One bounded page of vault records matching schema and status.
    async fn query(
        &self,
        schema: &SchemaDescriptor,
        status: StatusFilter,
        page: PageSpec,
    ) -> Result<QueryPage, SessionError>;

    /// Open a live subscription for vault updates matching schema and status.
    /// Batches arrive in ledger commit order.
    async fn subscribe(
        &self,
        schema: &SchemaDescriptor,
        status: StatusFilter,
    ) -> Result<mpsc::Receiver<UpdateBatch>, SessionError>;

    /// Invoke a named remote procedure and wait for its result.
    async fn invoke(
        &self,
        procedure: &str,
        args: serde_json::Value,
    ) -> Result<serde_json::Value, SessionError>;
}
