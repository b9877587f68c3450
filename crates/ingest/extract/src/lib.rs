//! Extractors turning one parsed translation unit into a [`TuGraph`]: the
//! buffered rows, edges, deferred edges, and reconciliation records that
//! the transform layer commits as a single batch.
//!
//! Pass order matters and is fixed: preprocessor → types → AST → expansion
//! linkage → CFG. Running them in this order guarantees that whenever an
//! edge is buffered, the row it points at is either earlier in the same
//! batch or was interned by a previous TU. The driver invokes the passes
//! one by one so it can check cancellation and the TU deadline in between;
//! [`extract_translation_unit`] runs them all for callers that don't need
//! that.

pub mod ast;
pub mod cfg;
pub mod decl;
pub mod graph;
pub mod preproc;
pub mod state;
pub mod stmt_expr;
pub mod types;

pub use graph::{DeclSighting, DeferredEdge, DeferredEdgeKind, Edge, TuGraph};
pub use state::ExtractorState;

use cppgraph_core::{IdentityService, TuIndex};
use cppgraph_frontend::model::ParsedTranslationUnit;

/// Run every extractor pass over one TU.
pub fn extract_translation_unit(
    ids: &IdentityService,
    tu_index: TuIndex,
    tu: &ParsedTranslationUnit,
) -> TuGraph {
    let mut state = ExtractorState::new(ids, tu_index, tu.file.to_string_lossy());
    preproc::extract_preprocessor(&mut state, tu);
    types::extract_types(&mut state, tu);
    ast::extract_ast(&mut state, tu);
    preproc::link_expansions(&mut state, &tu.preprocessor);
    cfg::extract_cfgs(&mut state, tu);
    state.into_graph()
}
