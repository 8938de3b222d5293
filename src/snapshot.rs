// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Snapshot Fetcher
//!
//! Drives a bounded-page vault query to completion and returns the full set
//! of currently-active records of one schema.
//!
//! ## Pagination policy
//!
//! The node reports the total number of matching records alongside every
//! page, but that total is an as-of-page-N figure: it drifts whenever the
//! ledger mutates between pages. Re-reading it each iteration can loop
//! forever on a growing vault or stop early on a shrinking one. The fetcher
//! therefore captures the total reported by the *first* page once and treats
//! it as authoritative for the whole fetch; later totals are ignored. An
//! empty page ends the loop regardless, so a vault that shrinks below the
//! captured total cannot stall the request.
//!
//! Results are deduplicated by record reference (row shift between pages can
//! surface the same record twice) before being keyed into a snapshot map.

use std::collections::{BTreeMap, HashSet};

use crate::ledger::{
    Family, LedgerRecord, LedgerSession, PageSpec, RecordEntry, SessionError, StatusFilter,
};
use crate::registry::SchemaDescriptor;

/// Records fetched per page, matching the node's default page size.
pub const DEFAULT_PAGE_SIZE: u64 = 200;

/// Full point-in-time view of active records of one schema, keyed by record
/// reference (generic family) or record identity (linked family).
pub type Snapshot = BTreeMap<String, LedgerRecord>;

/// Fetch every active record of `schema`, paging until the total reported by
/// the first page has been collected.
///
/// A vault with zero matching records yields an empty vector, not an error.
pub async fn fetch(
    session: &dyn LedgerSession,
    schema: &SchemaDescriptor,
    status: StatusFilter,
) -> Result<Vec<RecordEntry>, SessionError> {
    let mut page = PageSpec::first(DEFAULT_PAGE_SIZE);
    let first = session.query(schema, status, page).await?;

    // Fixed cutoff: the page-1 total is authoritative for this fetch.
    // Deduplication happens as pages arrive so the cutoff counts unique
    // records; duplicate rows surfaced by row shift must not satisfy it.
    let total = first.total_available;
    let mut seen = HashSet::new();
    let mut entries: Vec<RecordEntry> = Vec::new();
    collect_unique(&mut entries, &mut seen, first.entries);

    while (entries.len() as u64) < total {
        page = page.next();
        let next = session.query(schema, status, page).await?;
        if next.entries.is_empty() {
            tracing::debug!(
                schema = %schema.name,
                collected = entries.len(),
                expected = total,
                "Vault shrank mid-fetch, ending pagination early"
            );
            break;
        }
        collect_unique(&mut entries, &mut seen, next.entries);
    }

    Ok(entries)
}

fn collect_unique(
    entries: &mut Vec<RecordEntry>,
    seen: &mut HashSet<crate::ledger::RecordRef>,
    page: Vec<RecordEntry>,
) {
    for entry in page {
        if seen.insert(entry.reference.clone()) {
            entries.push(entry);
        }
    }
}

/// Key entries by the map key of their family: record reference for the
/// generic and fungible families, record identity for the linked family.
///
/// Linked-family entries without an identity are data errors on the node
/// side; they are dropped with a warning rather than failing the snapshot.
pub fn key_entries(entries: &[RecordEntry], family: Family) -> Snapshot {
    let mut snapshot = Snapshot::new();
    for entry in entries {
        let key = match family {
            Family::Linked => match entry.record.identity {
                Some(identity) => identity.to_string(),
                None => {
                    tracing::warn!(
                        reference = %entry.reference,
                        schema = %entry.record.schema,
                        "Linked record without identity, dropping from snapshot"
                    );
                    continue;
                }
            },
            Family::Generic | Family::Fungible => entry.reference.to_string(),
        };
        snapshot.insert(key, entry.record.clone());
    }
    snapshot
}
