//! Schema and store adapter for the cppgraph indexer.
//!
//! Owns the relation definitions (schema), the embedded-store lifecycle
//! ([`GraphStore`]), and batched transactional writes ([`Batch`]). The
//! extract layer produces [`TuGraph`](cppgraph_extract::TuGraph)s; this
//! crate is the only code that talks to the store mutably.

pub mod batch;
pub mod error;
pub mod schema;
pub mod store;
pub mod transform;

pub use batch::Batch;
pub use error::TransformError;
pub use store::{GraphStore, STORE_FILE};
pub use transform::{append_edge, append_tu_graph};
