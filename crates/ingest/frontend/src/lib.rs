//! The boundary between the indexing engine and the C++ front-end.
//!
//! The front-end itself is external; this crate owns everything the engine
//! assumes about it: the JSON compilation database, the data model of a
//! parsed translation unit (AST with decl/stmt/expr payloads, preprocessor
//! record, per-function CFGs), and the [`FrontEnd`] trait that produces
//! one. The only backend shipped here is the snapshot backend, which reads
//! a serialized `ParsedTranslationUnit` from disk — the form test harnesses
//! and out-of-process front-end drivers hand to the engine.

pub mod compile_commands;
pub mod model;
pub mod snapshot;

pub use compile_commands::{load_compile_db, CompileCommand};
pub use model::{AstNode, ParsedTranslationUnit};
pub use snapshot::SnapshotFrontEnd;

use cppgraph_error::FrontEndError;
use std::sync::Arc;

/// One front-end instance, owned by a single worker for the lifetime of a
/// translation unit. Implementations need not be thread-safe; the pipeline
/// never shares an instance across workers.
pub trait FrontEnd {
    /// Parse one translation unit. Diagnostics for a rejected TU come back
    /// inside the error; the engine never retries a front-end failure.
    fn parse(&mut self, command: &CompileCommand) -> Result<ParsedTranslationUnit, FrontEndError>;
}

/// Creates fresh [`FrontEnd`] instances, one per worker.
pub type FrontEndFactory = Arc<dyn Fn() -> Box<dyn FrontEnd + Send> + Send + Sync>;

/// Resolve a front-end backend by name. `None` means the requested
/// toolchain is not available in this build.
pub fn frontend_factory(name: &str) -> Option<FrontEndFactory> {
    match name {
        "snapshot" => Some(Arc::new(|| {
            Box::new(SnapshotFrontEnd::new()) as Box<dyn FrontEnd + Send>
        })),
        _ => None,
    }
}
