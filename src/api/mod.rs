// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    error::ApiError,
    ledger::{FungibleData, LedgerRecord, NetworkParameters, NodeInfo, RecordEntry, RecordRef},
    models::{EnergySource, IssueRequest, IssueResponse},
    state::AppState,
    stream::{StateUpdate, TokenUpdate},
};

pub mod issue;
pub mod linear;
pub mod node;
pub mod states;
pub mod tokens;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/me/", get(node::who_am_i))
        .route("/info/networkMapSnapshot", get(node::network_map_snapshot))
        .route("/info/nodeInfo", get(node::node_info))
        .route("/info/networkParameters", get(node::network_parameters))
        .route("/states/", post(states::snapshot))
        .route("/states/updates", post(states::updates))
        .route("/linear/", post(linear::snapshot))
        .route("/linear/updates", post(linear::updates))
        .route("/tokens/", post(tokens::snapshot))
        .route("/tokens/updates", post(tokens::updates))
        .route("/issue/", post(issue::issue_tokens))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Extract a record type name from a raw request body. Accepts either a
/// bare name or a JSON string literal, as clients send both.
fn parse_type_name(body: &str) -> Result<&str, ApiError> {
    let trimmed = body.trim();
    let name = trimmed
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(trimmed);
    if name.is_empty() {
        return Err(ApiError::bad_request("request body must be a record type name"));
    }
    Ok(name)
}

#[derive(OpenApi)]
#[openapi(
    paths(
        node::who_am_i,
        node::network_map_snapshot,
        node::node_info,
        node::network_parameters,
        states::snapshot,
        states::updates,
        linear::snapshot,
        linear::updates,
        tokens::snapshot,
        tokens::updates,
        issue::issue_tokens
    ),
    components(
        schemas(
            RecordRef,
            RecordEntry,
            LedgerRecord,
            FungibleData,
            NodeInfo,
            NetworkParameters,
            StateUpdate,
            TokenUpdate,
            EnergySource,
            IssueRequest,
            IssueResponse
        )
    ),
    tags(
        (name = "Node", description = "Node identity and network metadata"),
        (name = "States", description = "Generic record snapshots and update feeds"),
        (name = "Linear", description = "Linked record snapshots and update feeds"),
        (name = "Tokens", description = "Aggregated fungible token balances"),
        (name = "Issue", description = "Token issuance")
    )
)]
struct ApiDoc;
