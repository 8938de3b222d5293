// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # RPC Ledger Session
//!
//! Concrete [`LedgerSession`] over the ledger node's HTTP RPC surface:
//!
//! - `GET  rpc/identity`, `rpc/networkMap`, `rpc/nodeInfo`,
//!   `rpc/networkParameters` — node metadata.
//! - `POST rpc/query` — one bounded page of vault records.
//! - `POST rpc/subscribe` — long-lived response of newline-delimited JSON
//!   update batches, one per committed transaction.
//! - `POST rpc/invoke` — run a named flow and return its result.
//!
//! One session is constructed at startup and shared by all requests; the
//! underlying `reqwest::Client` pools connections and is safe to use
//! concurrently. Reconnect policy is out of scope here: once established,
//! transport failures surface as session errors and the caller decides.

use async_trait::async_trait;
use futures::StreamExt;
use serde::Serialize;
use tokio::sync::mpsc;
use url::Url;

use super::session::{LedgerSession, SessionError, UPDATE_CHANNEL_CAPACITY};
use super::{
    NetworkParameters, NodeInfo, PageSpec, QueryPage, StatusFilter, UpdateBatch,
};
use crate::config::GatewayConfig;
use crate::registry::SchemaDescriptor;

pub struct RpcLedgerSession {
    http: reqwest::Client,
    base: Url,
    username: String,
    password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    schema: &'a str,
    status: StatusFilter,
    page_number: u64,
    page_size: u64,
}

#[derive(Serialize)]
struct SubscribeRequest<'a> {
    schema: &'a str,
    status: StatusFilter,
}

#[derive(Serialize)]
struct InvokeRequest<'a> {
    procedure: &'a str,
    args: &'a serde_json::Value,
}

impl RpcLedgerSession {
    /// Establish a session against the configured node. Performs a metadata
    /// round trip so a dead node fails startup instead of every request.
    pub async fn connect(config: &GatewayConfig) -> Result<Self, SessionError> {
        let base = Url::parse(&config.node_url)
            .map_err(|e| SessionError::Unavailable(format!("invalid node url: {e}")))?;
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| SessionError::Unavailable(e.to_string()))?;

        let session = Self {
            http,
            base,
            username: config.rpc_username.clone(),
            password: config.rpc_password.clone(),
        };

        let info = session
            .node_info()
            .await
            .map_err(|e| SessionError::Unavailable(e.to_string()))?;
        tracing::info!(
            version = %info.version,
            platform_version = info.platform_version,
            "Ledger session established"
        );
        Ok(session)
    }

    fn endpoint(&self, path: &str) -> Result<Url, SessionError> {
        self.base
            .join(path)
            .map_err(|e| SessionError::QueryFailed(format!("invalid endpoint `{path}`: {e}")))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, SessionError> {
        let url = self.endpoint(path)?;
        let response = self
            .http
            .get(url)
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await
            .map_err(|e| SessionError::QueryFailed(e.to_string()))?
            .error_for_status()
            .map_err(|e| SessionError::QueryFailed(e.to_string()))?;
        response
            .json()
            .await
            .map_err(|e| SessionError::QueryFailed(e.to_string()))
    }
}

#[async_trait]
impl LedgerSession for RpcLedgerSession {
    async fn our_identity(&self) -> Result<String, SessionError> {
        self.get_json("rpc/identity").await
    }

    async fn network_peers(&self) -> Result<Vec<String>, SessionError> {
        self.get_json("rpc/networkMap").await
    }

    async fn node_info(&self) -> Result<NodeInfo, SessionError> {
        self.get_json("rpc/nodeInfo").await
    }

    async fn network_parameters(&self) -> Result<NetworkParameters, SessionError> {
        self.get_json("rpc/networkParameters").await
    }

    async fn query(
        &self,
        schema: &SchemaDescriptor,
        status: StatusFilter,
        page: PageSpec,
    ) -> Result<QueryPage, SessionError> {
        let url = self.endpoint("rpc/query")?;
        let request = QueryRequest {
            schema: &schema.name,
            status,
            page_number: page.page_number,
            page_size: page.page_size,
        };
        let response = self
            .http
            .post(url)
            .basic_auth(&self.username, Some(&self.password))
            .json(&request)
            .send()
            .await
            .map_err(|e| SessionError::QueryFailed(e.to_string()))?
            .error_for_status()
            .map_err(|e| SessionError::QueryFailed(e.to_string()))?;
        response
            .json()
            .await
            .map_err(|e| SessionError::QueryFailed(e.to_string()))
    }

    async fn subscribe(
        &self,
        schema: &SchemaDescriptor,
        status: StatusFilter,
    ) -> Result<mpsc::Receiver<UpdateBatch>, SessionError> {
        let url = self.endpoint("rpc/subscribe")?;
        let request = SubscribeRequest {
            schema: &schema.name,
            status,
        };
        let response = self
            .http
            .post(url)
            .basic_auth(&self.username, Some(&self.password))
            .json(&request)
            .send()
            .await
            .map_err(|e| SessionError::StreamFailed(e.to_string()))?
            .error_for_status()
            .map_err(|e| SessionError::StreamFailed(e.to_string()))?;

        let (tx, rx) = mpsc::channel(UPDATE_CHANNEL_CAPACITY);
        let schema_name = schema.name.clone();
        tokio::spawn(forward_batches(response, tx, schema_name));
        Ok(rx)
    }

    async fn invoke(
        &self,
        procedure: &str,
        args: serde_json::Value,
    ) -> Result<serde_json::Value, SessionError> {
        let url = self.endpoint("rpc/invoke").map_err(|e| {
            SessionError::InvocationFailed {
                procedure: procedure.to_string(),
                message: e.to_string(),
            }
        })?;
        let request = InvokeRequest {
            procedure,
            args: &args,
        };
        let invocation_failed = |message: String| SessionError::InvocationFailed {
            procedure: procedure.to_string(),
            message,
        };
        let response = self
            .http
            .post(url)
            .basic_auth(&self.username, Some(&self.password))
            .json(&request)
            .send()
            .await
            .map_err(|e| invocation_failed(e.to_string()))?
            .error_for_status()
            .map_err(|e| invocation_failed(e.to_string()))?;
        response
            .json()
            .await
            .map_err(|e| invocation_failed(e.to_string()))
    }
}

/// Forward newline-delimited JSON batches from the node's streaming response
/// into the bounded channel. Exits when the subscriber drops the receiver,
/// the transport errors, or a batch fails to parse; returning drops the
/// response body, which closes the upstream subscription.
async fn forward_batches(
    response: reqwest::Response,
    tx: mpsc::Sender<UpdateBatch>,
    schema: String,
) {
    let mut body = response.bytes_stream();
    let mut buffer: Vec<u8> = Vec::new();

    loop {
        // The body read races receiver closure: a departed subscriber must
        // release the upstream subscription even while the ledger is quiet
        // and the read would otherwise stay parked.
        let chunk = tokio::select! {
            _ = tx.closed() => {
                tracing::debug!(%schema, "Subscriber gone, releasing subscription");
                return;
            }
            chunk = body.next() => chunk,
        };
        let chunk = match chunk {
            Some(Ok(chunk)) => chunk,
            Some(Err(e)) => {
                tracing::warn!(%schema, error = %e, "Update subscription transport error");
                return;
            }
            None => break,
        };
        buffer.extend_from_slice(&chunk);

        while let Some(line) = drain_line(&mut buffer) {
            if line.is_empty() {
                continue;
            }
            let batch = match serde_json::from_slice::<UpdateBatch>(&line) {
                Ok(batch) => batch,
                Err(e) => {
                    tracing::warn!(%schema, error = %e, "Malformed update batch, ending subscription");
                    return;
                }
            };
            if tx.send(batch).await.is_err() {
                tracing::debug!(%schema, "Subscriber gone, releasing subscription");
                return;
            }
        }
    }
    tracing::debug!(%schema, "Update subscription ended by the node");
}

/// Pop one `\n`-terminated line off the front of `buffer`, stripping the
/// terminator and any trailing `\r`. Returns `None` while no full line is
/// buffered.
fn drain_line(buffer: &mut Vec<u8>) -> Option<Vec<u8>> {
    let pos = buffer.iter().position(|b| *b == b'\n')?;
    let mut line: Vec<u8> = buffer.drain(..=pos).collect();
    line.pop();
    if line.last() == Some(&b'\r') {
        line.pop();
    }
    Some(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use tokio_stream::wrappers::ReceiverStream;

    fn streaming_response(
        body_rx: mpsc::Receiver<Result<Vec<u8>, std::io::Error>>,
    ) -> reqwest::Response {
        let body = reqwest::Body::wrap_stream(ReceiverStream::new(body_rx));
        reqwest::Response::from(axum::http::Response::new(body))
    }

    #[tokio::test]
    async fn quiet_subscription_is_released_when_the_subscriber_departs() {
        // The body never yields a byte; keeping the sender alive holds the
        // stream pending the way a quiet ledger does.
        let (_body_tx, body_rx) = mpsc::channel::<Result<Vec<u8>, std::io::Error>>(1);
        let response = streaming_response(body_rx);

        let (tx, rx) = mpsc::channel(UPDATE_CHANNEL_CAPACITY);
        let forwarder = tokio::spawn(forward_batches(
            response,
            tx,
            "rec.states.FungibleRECToken".to_string(),
        ));

        drop(rx);
        tokio::time::timeout(Duration::from_secs(1), forwarder)
            .await
            .expect("forwarding task should exit while the ledger is quiet")
            .unwrap();
    }

    #[tokio::test]
    async fn batches_are_forwarded_line_by_line() {
        let (body_tx, body_rx) = mpsc::channel(4);
        let response = streaming_response(body_rx);

        let (tx, mut rx) = mpsc::channel(UPDATE_CHANNEL_CAPACITY);
        tokio::spawn(forward_batches(
            response,
            tx,
            "rec.states.FungibleRECToken".to_string(),
        ));

        let batch = UpdateBatch {
            consumed: vec![],
            produced: vec![],
        };
        let mut line = serde_json::to_vec(&batch).unwrap();
        line.push(b'\n');
        body_tx.send(Ok(line)).await.unwrap();

        let received = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap()
            .expect("one batch should come through");
        assert_eq!(received, batch);
    }

    #[test]
    fn drain_line_waits_for_a_full_line() {
        let mut buffer = b"{\"partial".to_vec();
        assert_eq!(drain_line(&mut buffer), None);
        buffer.extend_from_slice(b"\":1}\n{\"next\"");
        assert_eq!(drain_line(&mut buffer), Some(b"{\"partial\":1}".to_vec()));
        assert_eq!(drain_line(&mut buffer), None);
        assert_eq!(buffer, b"{\"next\"");
    }

    #[test]
    fn drain_line_strips_carriage_returns() {
        let mut buffer = b"one\r\ntwo\n\n".to_vec();
        assert_eq!(drain_line(&mut buffer), Some(b"one".to_vec()));
        assert_eq!(drain_line(&mut buffer), Some(b"two".to_vec()));
        assert_eq!(drain_line(&mut buffer), Some(Vec::new()));
        assert_eq!(drain_line(&mut buffer), None);
    }

    #[test]
    fn query_request_serializes_camel_case() {
        let request = QueryRequest {
            schema: "rec.states.FungibleRECToken",
            status: StatusFilter::Active,
            page_number: 1,
            page_size: 200,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["pageNumber"], 1);
        assert_eq!(json["pageSize"], 200);
        assert_eq!(json["status"], "active");
    }
}
