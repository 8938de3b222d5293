// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Schema Registry
//!
//! Resolves client-supplied type names to concrete record schemas. The
//! original node resolves names through a dynamic extension classloader;
//! here that is replaced by an explicit runtime registry seeded with the
//! schemas of the built-in REC extension and extendable at startup from
//! configuration.
//!
//! Resolution is a pure lookup with a strict family check: a name that
//! resolves to a schema outside the requested family is rejected rather
//! than returned partially. The registry can grow at runtime (extension
//! registration), so the first successful resolution for a session is
//! treated as authoritative; entries are never removed or replaced.

use std::collections::{BTreeSet, HashMap};
use std::sync::RwLock;

use crate::ledger::Family;

/// Fully-qualified name of the built-in fungible REC token schema.
pub const FUNGIBLE_REC_TOKEN: &str = "rec.states.FungibleRECToken";

/// Fully-qualified name of the built-in energy production schema (linked).
pub const ENERGY_PRODUCTION: &str = "rec.states.EnergyProduction";

/// A resolved record schema: its name plus the families it belongs to.
///
/// Every schema is implicitly a member of the generic family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDescriptor {
    pub name: String,
    families: BTreeSet<Family>,
}

impl SchemaDescriptor {
    pub fn new(name: impl Into<String>, families: impl IntoIterator<Item = Family>) -> Self {
        Self {
            name: name.into(),
            families: families.into_iter().collect(),
        }
    }

    /// Whether this schema is a member of `family`.
    pub fn is(&self, family: Family) -> bool {
        family == Family::Generic || self.families.contains(&family)
    }
}

/// Resolution failures, both mapped to client errors at the HTTP boundary.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("unknown record type `{0}`")]
    UnknownType(String),

    #[error("record type `{name}` is not a member of the {requested} family")]
    FamilyMismatch { name: String, requested: Family },
}

/// Runtime name-to-schema registry shared by all requests.
pub struct TypeRegistry {
    schemas: RwLock<HashMap<String, SchemaDescriptor>>,
}

impl TypeRegistry {
    /// An empty registry with no resolvable schemas.
    pub fn new() -> Self {
        Self {
            schemas: RwLock::new(HashMap::new()),
        }
    }

    /// A registry seeded with the schemas of the built-in REC extension.
    pub fn with_builtin() -> Self {
        let registry = Self::new();
        registry.register(SchemaDescriptor::new(
            FUNGIBLE_REC_TOKEN,
            [Family::Generic, Family::Fungible],
        ));
        registry.register(SchemaDescriptor::new(
            ENERGY_PRODUCTION,
            [Family::Generic, Family::Linked],
        ));
        registry
    }

    /// Register an extension schema. Registration is first-write-wins: a
    /// name already present keeps its original descriptor so resolutions
    /// stay stable for the session lifetime.
    pub fn register(&self, descriptor: SchemaDescriptor) {
        let mut schemas = self.schemas.write().expect("registry lock poisoned");
        schemas
            .entry(descriptor.name.clone())
            .or_insert(descriptor);
    }

    /// Resolve `name` as a member of `family`.
    pub fn resolve(&self, name: &str, family: Family) -> Result<SchemaDescriptor, ResolveError> {
        let schemas = self.schemas.read().expect("registry lock poisoned");
        let descriptor = schemas
            .get(name)
            .ok_or_else(|| ResolveError::UnknownType(name.to_string()))?;
        if !descriptor.is(family) {
            return Err(ResolveError::FamilyMismatch {
                name: name.to_string(),
                requested: family,
            });
        }
        Ok(descriptor.clone())
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

/// Parse extension schema declarations from configuration.
///
/// Format: comma-separated `name=family[+family]` entries, e.g.
/// `com.acme.Invoice=linked,com.acme.Voucher=fungible`. Malformed entries
/// are skipped with a warning rather than failing startup.
pub fn parse_extra_schemas(raw: &str) -> Vec<SchemaDescriptor> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            let (name, families) = entry.split_once('=')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            let mut parsed = vec![Family::Generic];
            for family in families.split('+') {
                match family.parse::<Family>() {
                    Ok(family) => parsed.push(family),
                    Err(reason) => {
                        tracing::warn!(entry, %reason, "Skipping malformed schema declaration");
                        return None;
                    }
                }
            }
            Some(SchemaDescriptor::new(name, parsed))
        })
        .collect()
}
