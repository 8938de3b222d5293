// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Scripted in-memory ledger session for unit tests.
//!
//! Queries are served from a pre-loaded page script in order; subscriptions
//! forward pre-loaded batches through the same bounded channel the real
//! session uses, so cancellation behaves identically.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::{mpsc, Notify};

use super::session::UPDATE_CHANNEL_CAPACITY;
use super::{
    FungibleData, LedgerRecord, LedgerSession, NetworkParameters, NodeInfo, PageSpec, QueryPage,
    RecordEntry, RecordIdentity, RecordRef, SessionError, StatusFilter, UpdateBatch,
};
use crate::registry::{SchemaDescriptor, ENERGY_PRODUCTION, FUNGIBLE_REC_TOKEN};

pub struct MockLedgerSession {
    identity: String,
    pages: Mutex<VecDeque<QueryPage>>,
    batches: Mutex<Vec<UpdateBatch>>,
    query_failure: Option<String>,
    subscribe_failure: Option<String>,
    invoke_result: Mutex<Option<Result<serde_json::Value, String>>>,
    invocations: Mutex<Vec<(String, serde_json::Value)>>,
    queries: AtomicUsize,
    /// Notified when a subscription's forwarding task has exited, i.e. the
    /// upstream subscription has been released.
    released: Arc<Notify>,
}

impl MockLedgerSession {
    pub fn new() -> Self {
        Self {
            identity: "O=PartyA, L=London, C=GB".to_string(),
            pages: Mutex::new(VecDeque::new()),
            batches: Mutex::new(Vec::new()),
            query_failure: None,
            subscribe_failure: None,
            invoke_result: Mutex::new(None),
            invocations: Mutex::new(Vec::new()),
            queries: AtomicUsize::new(0),
            released: Arc::new(Notify::new()),
        }
    }

    pub fn with_pages(self, pages: Vec<QueryPage>) -> Self {
        *self.pages.lock().unwrap() = pages.into();
        self
    }

    pub fn with_batches(self, batches: Vec<UpdateBatch>) -> Self {
        *self.batches.lock().unwrap() = batches;
        self
    }

    pub fn failing_queries(mut self, message: &str) -> Self {
        self.query_failure = Some(message.to_string());
        self
    }

    pub fn failing_subscriptions(mut self, message: &str) -> Self {
        self.subscribe_failure = Some(message.to_string());
        self
    }

    pub fn with_invoke_result(self, result: serde_json::Value) -> Self {
        *self.invoke_result.lock().unwrap() = Some(Ok(result));
        self
    }

    pub fn failing_invocations(self, message: &str) -> Self {
        *self.invoke_result.lock().unwrap() = Some(Err(message.to_string()));
        self
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub fn invocations(&self) -> Vec<(String, serde_json::Value)> {
        self.invocations.lock().unwrap().clone()
    }

    /// Wait until the forwarding task of a subscription has exited.
    pub async fn subscription_released(&self) {
        self.released.notified().await;
    }
}

#[async_trait]
impl LedgerSession for MockLedgerSession {
    async fn our_identity(&self) -> Result<String, SessionError> {
        Ok(self.identity.clone())
    }

    async fn network_peers(&self) -> Result<Vec<String>, SessionError> {
        Ok(vec![
            self.identity.clone(),
            "O=PartyB, L=New York, C=US".to_string(),
            "O=Notary, L=Zurich, C=CH".to_string(),
        ])
    }

    async fn node_info(&self) -> Result<NodeInfo, SessionError> {
        Ok(NodeInfo {
            version: "4.9".to_string(),
            vendor: "Corda Open Source".to_string(),
            extensions: vec!["rec-contracts".to_string(), "rec-workflows".to_string()],
            platform_version: 10,
            revision: "deadbeef".to_string(),
        })
    }

    async fn network_parameters(&self) -> Result<NetworkParameters, SessionError> {
        Ok(NetworkParameters {
            notaries: vec!["O=Notary, L=Zurich, C=CH".to_string()],
            minimum_platform_version: 4,
            max_transaction_size: 524_288_000,
            max_message_size: 10_485_760,
        })
    }

    async fn query(
        &self,
        _schema: &SchemaDescriptor,
        _status: StatusFilter,
        _page: PageSpec,
    ) -> Result<QueryPage, SessionError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.query_failure {
            return Err(SessionError::QueryFailed(message.clone()));
        }
        let mut pages = self.pages.lock().unwrap();
        Ok(pages.pop_front().unwrap_or(QueryPage {
            entries: vec![],
            total_available: 0,
        }))
    }

    async fn subscribe(
        &self,
        _schema: &SchemaDescriptor,
        _status: StatusFilter,
    ) -> Result<mpsc::Receiver<UpdateBatch>, SessionError> {
        if let Some(message) = &self.subscribe_failure {
            return Err(SessionError::StreamFailed(message.clone()));
        }
        let (tx, rx) = mpsc::channel(UPDATE_CHANNEL_CAPACITY);
        let batches = self.batches.lock().unwrap().clone();
        let released = Arc::clone(&self.released);
        tokio::spawn(async move {
            for batch in batches {
                if tx.send(batch).await.is_err() {
                    break;
                }
            }
            // notify_one stores a permit, so a waiter that arrives after the
            // task has already exited still observes the release.
            released.notify_one();
        });
        Ok(rx)
    }

    async fn invoke(
        &self,
        procedure: &str,
        args: serde_json::Value,
    ) -> Result<serde_json::Value, SessionError> {
        self.invocations
            .lock()
            .unwrap()
            .push((procedure.to_string(), args));
        match self.invoke_result.lock().unwrap().clone() {
            Some(Ok(value)) => Ok(value),
            Some(Err(message)) => Err(SessionError::InvocationFailed {
                procedure: procedure.to_string(),
                message,
            }),
            None => Ok(serde_json::Value::String(format!("TX-{procedure}"))),
        }
    }
}

/// A fungible REC token entry held by `PartyA`, referenced by `txhash(index)`.
pub fn entry(txhash: &str, index: u32, quantity: u64) -> RecordEntry {
    token_entry(txhash, index, "O=Issuer, L=Oslo, C=NO", "O=PartyA, L=London, C=GB", quantity)
}

/// A fungible REC token entry with explicit issuer and holder.
pub fn token_entry(
    txhash: &str,
    index: u32,
    issuer: &str,
    holder: &str,
    quantity: u64,
) -> RecordEntry {
    RecordEntry {
        reference: RecordRef::new(txhash, index),
        record: LedgerRecord {
            schema: FUNGIBLE_REC_TOKEN.to_string(),
            identity: None,
            fungible: Some(FungibleData {
                issuer: issuer.to_string(),
                token_type: "REC".to_string(),
                quantity,
                holder: holder.to_string(),
            }),
            payload: serde_json::json!({ "source": "SOLAR" }),
        },
    }
}

/// A linked energy production entry with a fresh random identity.
pub fn linked_entry(txhash: &str, index: u32) -> RecordEntry {
    RecordEntry {
        reference: RecordRef::new(txhash, index),
        record: LedgerRecord {
            schema: ENERGY_PRODUCTION.to_string(),
            identity: Some(RecordIdentity::random()),
            fungible: None,
            payload: serde_json::json!({
                "source": "WIND",
                "megawattHour": 42,
                "relatedToElectricity": true,
            }),
        },
    }
}
