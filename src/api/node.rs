// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Node identity and network metadata endpoints, passed through verbatim
//! from the ledger session.

use axum::{extract::State, Json};

use crate::error::ApiError;
use crate::ledger::{NetworkParameters, NodeInfo};
use crate::state::AppState;

/// Legal identity name of the node this gateway is connected to.
#[utoipa::path(
    get,
    path = "/me/",
    tag = "Node",
    responses(
        (status = 200, description = "Caller's ledger identity name", body = String),
        (status = 502, description = "Ledger node failed"),
        (status = 503, description = "Ledger session unavailable")
    )
)]
pub async fn who_am_i(State(state): State<AppState>) -> Result<Json<String>, ApiError> {
    Ok(Json(state.session.our_identity().await?))
}

/// Legal identity names of all participants in the network map.
#[utoipa::path(
    get,
    path = "/info/networkMapSnapshot",
    tag = "Node",
    responses(
        (status = 200, description = "Known participant identities", body = Vec<String>),
        (status = 502, description = "Ledger node failed"),
        (status = 503, description = "Ledger session unavailable")
    )
)]
pub async fn network_map_snapshot(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.session.network_peers().await?))
}

/// Node diagnostic information.
#[utoipa::path(
    get,
    path = "/info/nodeInfo",
    tag = "Node",
    responses(
        (status = 200, description = "Node version and loaded extensions", body = NodeInfo),
        (status = 502, description = "Ledger node failed"),
        (status = 503, description = "Ledger session unavailable")
    )
)]
pub async fn node_info(State(state): State<AppState>) -> Result<Json<NodeInfo>, ApiError> {
    Ok(Json(state.session.node_info().await?))
}

/// Network-wide parameters.
#[utoipa::path(
    get,
    path = "/info/networkParameters",
    tag = "Node",
    responses(
        (status = 200, description = "Network parameters", body = NetworkParameters),
        (status = 502, description = "Ledger node failed"),
        (status = 503, description = "Ledger session unavailable")
    )
)]
pub async fn network_parameters(
    State(state): State<AppState>,
) -> Result<Json<NetworkParameters>, ApiError> {
    Ok(Json(state.session.network_parameters().await?))
}
