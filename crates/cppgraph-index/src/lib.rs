//! The cppgraph indexer driver.
//!
//! Wires the layers together: compilation database → front-end → extractor
//! passes → batched store commits, then the single-threaded cross-TU
//! stitcher and the manifest. The `indexer` binary in this crate is a thin
//! argument-parsing shell over [`run_indexer`].

pub mod config;
pub mod driver;
pub mod manifest;
pub mod pipeline;
pub mod stitch;

pub use config::IndexerConfig;
pub use driver::{exit_code, run_indexer, RunSummary};
pub use manifest::{Manifest, MANIFEST_FILE};
