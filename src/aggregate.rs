// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Balance Aggregator
//!
//! Reduces collections of fungible records into per-issuer, per-type
//! quantity totals. Applied to snapshots ("current balances") and to each
//! half of an update batch separately (gross consumed and gross produced;
//! netting is left to the client).
//!
//! Totals use exact integer arithmetic end to end: record quantities are
//! `u64`, sums are `u128`. REC certificates have zero fraction digits, so
//! there is no fixed-point scaling to apply and no rounding anywhere.

use std::collections::BTreeMap;

use crate::ledger::RecordEntry;

/// Derived mapping from `token_type@issuer` to total quantity. Never
/// persisted; recomputed from a snapshot or update batch on every request.
/// Groups with no records are omitted rather than reported as zero.
pub type AggregateBalance = BTreeMap<String, u128>;

/// Map key for one (issuer, fungible-type) group.
fn balance_key(token_type: &str, issuer: &str) -> String {
    format!("{token_type}@{issuer}")
}

/// Sum fungible quantities grouped by (issuer, fungible-type).
///
/// Entries without fungible attributes are skipped; the resolver keeps
/// non-fungible schemas away from the token endpoints, so such entries
/// only appear if the node misreports a record.
pub fn sum_tokens<'a>(entries: impl IntoIterator<Item = &'a RecordEntry>) -> AggregateBalance {
    let mut totals = AggregateBalance::new();
    for entry in entries {
        let Some(fungible) = &entry.record.fungible else {
            tracing::warn!(
                reference = %entry.reference,
                schema = %entry.record.schema,
                "Non-fungible record in token aggregation, skipping"
            );
            continue;
        };
        let key = balance_key(&fungible.token_type, &fungible.issuer);
        *totals.entry(key).or_insert(0) += u128::from(fungible.quantity);
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::mock::{linked_entry, token_entry};

    const ISSUER: &str = "O=Issuer, L=Oslo, C=NO";
    const OTHER_ISSUER: &str = "O=Issuer2, L=Bergen, C=NO";
    const HOLDER_A: &str = "O=PartyA, L=London, C=GB";
    const HOLDER_B: &str = "O=PartyB, L=New York, C=US";

    #[test]
    fn empty_collection_yields_empty_balance() {
        let entries: Vec<crate::ledger::RecordEntry> = vec![];
        assert!(sum_tokens(&entries).is_empty());
    }

    #[test]
    fn quantities_group_by_issuer_and_type() {
        let entries = vec![
            token_entry("tx0", 0, ISSUER, HOLDER_A, 10),
            token_entry("tx1", 0, ISSUER, HOLDER_B, 4),
            token_entry("tx2", 0, OTHER_ISSUER, HOLDER_A, 7),
        ];
        let balance = sum_tokens(&entries);
        assert_eq!(balance.len(), 2);
        assert_eq!(balance[&format!("REC@{ISSUER}")], 14);
        assert_eq!(balance[&format!("REC@{OTHER_ISSUER}")], 7);
    }

    #[test]
    fn holders_do_not_split_groups() {
        // Balances are per issuer and type, not per holder.
        let entries = vec![
            token_entry("tx0", 0, ISSUER, HOLDER_A, 6),
            token_entry("tx0", 1, ISSUER, HOLDER_B, 4),
        ];
        let balance = sum_tokens(&entries);
        assert_eq!(balance.len(), 1);
        assert_eq!(balance[&format!("REC@{ISSUER}")], 10);
    }

    #[test]
    fn summation_is_idempotent() {
        let entries = vec![
            token_entry("tx0", 0, ISSUER, HOLDER_A, 10),
            token_entry("tx1", 0, ISSUER, HOLDER_A, 32),
        ];
        assert_eq!(sum_tokens(&entries), sum_tokens(&entries));
    }

    #[test]
    fn sums_exceeding_u64_do_not_overflow() {
        let entries = vec![
            token_entry("tx0", 0, ISSUER, HOLDER_A, u64::MAX),
            token_entry("tx1", 0, ISSUER, HOLDER_A, u64::MAX),
        ];
        let balance = sum_tokens(&entries);
        assert_eq!(balance[&format!("REC@{ISSUER}")], 2 * u128::from(u64::MAX));
    }

    #[test]
    fn non_fungible_entries_are_skipped() {
        let entries = vec![
            linked_entry("tx0", 0),
            token_entry("tx1", 0, ISSUER, HOLDER_A, 3),
        ];
        let balance = sum_tokens(&entries);
        assert_eq!(balance.len(), 1);
        assert_eq!(balance[&format!("REC@{ISSUER}")], 3);
    }
}
