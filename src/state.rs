// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::ledger::LedgerSession;
use crate::registry::TypeRegistry;

/// Shared application state: the single long-lived ledger session, the
/// schema registry and the shutdown token that ends open update streams.
///
/// The gateway holds no other mutable state; every request re-queries or
/// re-subscribes through the session.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<dyn LedgerSession>,
    pub registry: Arc<TypeRegistry>,
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(session: Arc<dyn LedgerSession>, registry: TypeRegistry) -> Self {
        Self {
            session,
            registry: Arc::new(registry),
            shutdown: CancellationToken::new(),
        }
    }
}

#[cfg(test)]
impl AppState {
    pub fn for_tests(session: crate::ledger::mock::MockLedgerSession) -> Self {
        Self::new(Arc::new(session), TypeRegistry::with_builtin())
    }
}
