use serde::{Deserialize, Serialize};

/// Identifier for one node in the output graph. Globally unique within a
/// single database; assigned from a monotonically increasing counter by the
/// [`IdentityService`](crate::identity::IdentityService).
///
/// Statements, expressions, and CFG blocks get throwaway ids (`fresh`);
/// declarations, types, and macros get deduplicated ids keyed on their
/// canonical identity so the same entity seen from two translation units
/// maps to one row.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl NodeId {
    pub fn as_u64(self) -> u64 {
        self.0
    }

    /// Cozo stores ids as `Int`; the counter never reaches `i64::MAX`.
    pub fn as_i64(self) -> i64 {
        self.0 as i64
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Index of a translation unit within one indexer run. Only used to scope
/// front-end object addresses, which are unique per TU but recycled across
/// TUs.
pub type TuIndex = u32;
