//! The identity & interning service.
//!
//! One instance lives for the whole indexer run, injected into every TU
//! pipeline. It owns the id counter and one map per key space; the maps are
//! disjoint, so sharded concurrent maps stand in for a single service-wide
//! mutex. All methods are idempotent per key: re-interning returns the id
//! assigned to the first caller.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::ids::{NodeId, TuIndex};
use crate::keys::MacroKey;

#[derive(Debug, Default)]
pub struct IdentityService {
    counter: AtomicU64,
    ast_nodes: DashMap<(TuIndex, u64), NodeId>,
    decls: DashMap<String, NodeId>,
    types: DashMap<String, NodeId>,
    macros: DashMap<MacroKey, NodeId>,
    /// Declaration keys whose definition body some TU has already indexed.
    definitions: DashMap<String, ()>,
}

impl IdentityService {
    pub fn new() -> Self {
        Self::default()
    }

    fn next(&self) -> NodeId {
        // fetch_add starts at 0; ids are 1-based.
        NodeId(self.counter.fetch_add(1, Ordering::Relaxed) + 1)
    }

    /// Id for a front-end AST object, keyed by `(tu, address)`. Addresses
    /// are only meaningful within one TU.
    pub fn intern_ast(&self, tu: TuIndex, address: u64) -> NodeId {
        *self
            .ast_nodes
            .entry((tu, address))
            .or_insert_with(|| self.next())
    }

    /// Id for a declaration canonical key. `fresh` tells the caller whether
    /// it is the first writer and therefore responsible for emitting rows.
    pub fn intern_decl(&self, key: &str) -> (NodeId, bool) {
        self.intern_str(&self.decls, key)
    }

    /// Id for a type canonical spelling, deduplicated across TUs.
    pub fn intern_type(&self, canonical: &str) -> (NodeId, bool) {
        self.intern_str(&self.types, canonical)
    }

    pub fn intern_macro(&self, key: &MacroKey) -> (NodeId, bool) {
        match self.macros.entry(key.clone()) {
            dashmap::mapref::entry::Entry::Occupied(e) => (*e.get(), false),
            dashmap::mapref::entry::Entry::Vacant(v) => {
                let id = self.next();
                v.insert(id);
                (id, true)
            }
        }
    }

    /// A brand-new id for an entity that never deduplicates (statements,
    /// expressions, constants, CFG blocks, preprocessor directives).
    pub fn fresh(&self) -> NodeId {
        self.next()
    }

    /// Claim the definition body of a declaration key. Returns true for the
    /// first caller only; a definition subtree is walked exactly once per
    /// run no matter how many TUs carry it.
    pub fn claim_definition(&self, key: &str) -> bool {
        match self.definitions.entry(key.to_owned()) {
            dashmap::mapref::entry::Entry::Occupied(_) => false,
            dashmap::mapref::entry::Entry::Vacant(v) => {
                v.insert(());
                true
            }
        }
    }

    /// Stitcher-side lookup: the id a canonical key was interned under, if
    /// any TU ever saw it.
    pub fn lookup_decl(&self, key: &str) -> Option<NodeId> {
        self.decls.get(key).map(|r| *r)
    }

    pub fn lookup_macro(&self, key: &MacroKey) -> Option<NodeId> {
        self.macros.get(key).map(|r| *r)
    }

    /// Total ids issued so far; flushed into the manifest.
    pub fn issued(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }

    fn intern_str(&self, map: &DashMap<String, NodeId>, key: &str) -> (NodeId, bool) {
        if let Some(existing) = map.get(key) {
            return (*existing, false);
        }
        match map.entry(key.to_owned()) {
            dashmap::mapref::entry::Entry::Occupied(e) => (*e.get(), false),
            dashmap::mapref::entry::Entry::Vacant(v) => {
                let id = self.next();
                v.insert(id);
                (id, true)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ast_interning_is_idempotent_per_tu_and_pointer() {
        let ids = IdentityService::new();
        let a = ids.intern_ast(0, 0xdead);
        let b = ids.intern_ast(0, 0xdead);
        let c = ids.intern_ast(1, 0xdead);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn decl_interning_reports_first_writer() {
        let ids = IdentityService::new();
        let (a, fresh_a) = ids.intern_decl("Animal::speak()");
        let (b, fresh_b) = ids.intern_decl("Animal::speak()");
        assert!(fresh_a);
        assert!(!fresh_b);
        assert_eq!(a, b);
        assert_eq!(ids.lookup_decl("Animal::speak()"), Some(a));
        assert_eq!(ids.lookup_decl("Animal::eat()"), None);
    }

    #[test]
    fn key_spaces_do_not_collide() {
        let ids = IdentityService::new();
        let (d, _) = ids.intern_decl("int");
        let (t, _) = ids.intern_type("int");
        assert_ne!(d, t);
    }

    #[test]
    fn counter_counts_every_issued_id() {
        let ids = IdentityService::new();
        ids.fresh();
        ids.intern_type("int");
        ids.intern_type("int");
        ids.intern_macro(&MacroKey::new("SQUARE", "m.h", 3));
        assert_eq!(ids.issued(), 3);
    }

    #[test]
    fn interning_is_race_free() {
        use std::sync::Arc;
        let ids = Arc::new(IdentityService::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let ids = Arc::clone(&ids);
            handles.push(std::thread::spawn(move || {
                (0..100)
                    .map(|i| ids.intern_type(&format!("T{}", i % 10)).0)
                    .collect::<Vec<_>>()
            }));
        }
        let results: Vec<Vec<NodeId>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for w in &results[1..] {
            assert_eq!(&results[0], w);
        }
        assert_eq!(ids.issued(), 10);
    }
}
