// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! REC Gateway - HTTP access to the REC token ledger
//!
//! This crate bridges a remote append-only record ledger to HTTP clients:
//! point-in-time JSON snapshots, live server-sent-event update feeds,
//! aggregated token balances and the issue flow.
//!
//! ## Modules
//!
//! - `api` - HTTP handlers and router (Axum)
//! - `ledger` - data model and the remote session seam
//! - `registry` - runtime type-name resolution with family checks
//! - `snapshot` - paginated snapshot fetching
//! - `stream` - subscription-to-SSE bridging
//! - `aggregate` - fungible balance aggregation

pub mod aggregate;
pub mod api;
pub mod config;
pub mod error;
pub mod ledger;
pub mod models;
pub mod registry;
pub mod snapshot;
pub mod state;
pub mod stream;
