// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Ledger Data Model
//!
//! Types shared by every layer that touches the remote ledger: record
//! references and identities, record payloads, page specifications and the
//! consumed/produced update batches delivered by a subscription.
//!
//! Records are immutable versions of logical entities. Each version is either
//! *active* (unconsumed) or *superseded* (consumed by a later transaction);
//! the transition is one-way. The gateway only ever observes records, it
//! never creates or mutates them.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

pub mod rpc;
pub mod session;

#[cfg(test)]
pub mod mock;

pub use session::{LedgerSession, SessionError};

/// Reference to one specific version of a ledger record: the transaction
/// that produced it plus the output index within that transaction.
///
/// Immutable once issued. Renders as `txhash(index)`, which is also the
/// key format used in snapshot maps for the generic record family.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
pub struct RecordRef {
    /// Hash of the producing transaction.
    pub txhash: String,
    /// Output index within the producing transaction.
    pub index: u32,
}

impl RecordRef {
    pub fn new(txhash: impl Into<String>, index: u32) -> Self {
        Self {
            txhash: txhash.into(),
            index,
        }
    }
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.txhash, self.index)
    }
}

/// Durable logical identifier shared by all versions of a linked record as
/// it is superseded over time.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
#[schema(value_type = String)]
pub struct RecordIdentity(pub Uuid);

impl RecordIdentity {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for RecordIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Record family a schema can belong to.
///
/// Every schema is queryable as `Generic`; `Linked` records additionally
/// carry a [`RecordIdentity`], and `Fungible` records carry issuer, holder
/// and an exact integer quantity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    Generic,
    Linked,
    Fungible,
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Family::Generic => write!(f, "generic"),
            Family::Linked => write!(f, "linked"),
            Family::Fungible => write!(f, "fungible"),
        }
    }
}

impl std::str::FromStr for Family {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "generic" => Ok(Family::Generic),
            "linked" => Ok(Family::Linked),
            "fungible" => Ok(Family::Fungible),
            other => Err(format!("unknown record family `{other}`")),
        }
    }
}

/// Status filter for vault queries and subscriptions.
///
/// The gateway itself only issues `Active` (snapshots) and `All` (update
/// feeds); `Superseded` completes the node's query contract so the wire
/// type covers every status the node accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    /// Only records that are currently unconsumed.
    Active,
    /// Only records consumed by a later transaction.
    Superseded,
    /// Both active and superseded records.
    All,
}

/// Fungible attributes of a record: who issued it, who holds it and how
/// much it represents. Quantities are exact integers (REC certificates
/// have zero fraction digits); arithmetic on them never goes through
/// floating point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FungibleData {
    /// Identity of the issuing party.
    pub issuer: String,
    /// Declared fungible-type tag, e.g. `"REC"`.
    pub token_type: String,
    /// Quantity in the smallest indivisible unit.
    pub quantity: u64,
    /// Identity of the current holder.
    pub holder: String,
}

/// One version of a ledger record as observed by the gateway.
///
/// The business payload stays an opaque JSON document; the gateway only
/// interprets the family metadata next to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LedgerRecord {
    /// Fully-qualified schema name, e.g. `"rec.states.FungibleRECToken"`.
    pub schema: String,
    /// Stable identity, present for the linked family.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<RecordIdentity>,
    /// Fungible attributes, present for the fungible family.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fungible: Option<FungibleData>,
    /// Opaque business payload.
    #[schema(value_type = Object)]
    pub payload: serde_json::Value,
}

/// A record together with the reference that locates it on the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecordEntry {
    pub reference: RecordRef,
    pub record: LedgerRecord,
}

/// Page coordinates for a bounded vault query. Page numbers start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSpec {
    pub page_number: u64,
    pub page_size: u64,
}

impl PageSpec {
    pub fn first(page_size: u64) -> Self {
        Self {
            page_number: 1,
            page_size,
        }
    }

    pub fn next(self) -> Self {
        Self {
            page_number: self.page_number + 1,
            ..self
        }
    }
}

/// One page of query results plus the total number of matching records the
/// node reported *at the time this page was produced*. The total drifts
/// under concurrent ledger mutation; see the snapshot fetcher for how it
/// is interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryPage {
    pub entries: Vec<RecordEntry>,
    pub total_available: u64,
}

/// One committed transaction's worth of vault changes, delivered atomically:
/// the records it consumed and the records it produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateBatch {
    pub consumed: Vec<RecordEntry>,
    pub produced: Vec<RecordEntry>,
}

/// Node diagnostic information, passed through verbatim from the ledger node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NodeInfo {
    pub version: String,
    pub vendor: String,
    /// Names of the loaded ledger extensions.
    pub extensions: Vec<String>,
    #[serde(rename = "platformVersion")]
    pub platform_version: u32,
    pub revision: String,
}

/// Network-wide parameters agreed by all participants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NetworkParameters {
    pub notaries: Vec<String>,
    #[serde(rename = "minimumPlatformVersion")]
    pub minimum_platform_version: u32,
    #[serde(rename = "maxTransactionSize")]
    pub max_transaction_size: u64,
    #[serde(rename = "maxMessageSize")]
    pub max_message_size: u64,
}
