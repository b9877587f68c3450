//! Core data types for the cppgraph indexer: graph node identifiers, the
//! kind vocabulary shared by front-end model and store schema, canonical
//! keys for cross-TU deduplication, and the identity & interning service.
//!
//! Everything here is dependency-light on purpose; the ingest, transform,
//! and driver crates all sit on top of these types.

pub mod identity;
pub mod ids;
pub mod keys;
pub mod kinds;
pub mod span;

pub use identity::IdentityService;
pub use ids::{NodeId, TuIndex};
pub use keys::MacroKey;
pub use kinds::{
    AccessSpecifier, CfgEdgeKind, ConditionalDirectiveKind, ControlFlowType, NodeCategory,
    NodeKind, ScopeKind, SpecializationKind, StorageClass, TemplateParameterKind, TypeRole,
    UsingKind, ValueCategory,
};
pub use span::SourceRange;
