//! The type extractor.
//!
//! Types are deduplicated across the whole run by canonical spelling. The
//! dedicated pass walks the TU up front so that every `Type` row a later
//! `HAS_TYPE` edge will point at is already buffered in the same batch;
//! [`type_id`] is the single interning point and also serves the AST pass,
//! so closure holds even for a type the sweep did not see.

use cppgraph_core::NodeId;
use cppgraph_frontend::model::{ParsedTranslationUnit, TypeRef};

use crate::graph::TypeRow;
use crate::state::ExtractorState;

/// Intern one type reference, emitting its row if this is the first time
/// the canonical spelling is seen anywhere in the run.
pub(crate) fn type_id(state: &mut ExtractorState, t: &TypeRef) -> NodeId {
    let (id, fresh) = state.ids.intern_type(t.canonical_spelling());
    if fresh {
        state.graph.types.push(TypeRow {
            id,
            type_name: t.spelling.clone(),
            canonical_type: t.canonical_spelling().to_owned(),
            is_builtin: t.is_builtin,
            is_const: t.is_const,
            is_volatile: t.is_volatile,
            size_bytes: t.size_bytes,
        });
    }
    id
}

/// Pre-pass: sweep the AST for every type reference and intern them all.
pub fn extract_types(state: &mut ExtractorState, tu: &ParsedTranslationUnit) {
    let mut refs: Vec<TypeRef> = Vec::new();
    tu.ast.walk(&mut |node| {
        if let Some(d) = &node.decl {
            refs.extend(d.declared_type.iter().cloned());
            refs.extend(d.return_type.iter().cloned());
            refs.extend(d.parameter_types.iter().cloned());
        }
        if let Some(e) = &node.expr {
            refs.extend(e.ty.iter().cloned());
        }
    });
    for t in &refs {
        type_id(state, t);
    }
}
