// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response structures for the issue endpoint and the energy
//! source vocabulary of the REC extension. All types derive `Serialize`/
//! `Deserialize` and `ToSchema` for JSON handling and OpenAPI documentation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Energy source a certificate attests to. Serialized in the upper-case
/// form used on the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnergySource {
    Solar,
    Wind,
    Hydro,
    Tidal,
    Geothermal,
    Biomass,
}

/// Request body for `POST /issue/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct IssueRequest {
    /// Legal identity name of the party receiving the tokens.
    pub holder: String,
    /// Number of certificates to issue. Must be positive; REC tokens have
    /// zero fraction digits.
    pub quantity: u64,
    /// Energy source backing the issued certificates.
    pub source: EnergySource,
}

/// Response body for `POST /issue/`: the identifier of the transaction the
/// issue flow produced, never the raw transaction object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct IssueResponse {
    pub transaction_id: String,
}
