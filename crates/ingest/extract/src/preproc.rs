//! The preprocessor extractor.
//!
//! Runs first so that macro definitions are interned before the AST walk
//! needs them. Includes, conditionals, pragmas, and comments are TU-local
//! (one row per textual occurrence); macro definitions dedup across TUs by
//! `(name, file, line)` — the same header defining the same macro seen
//! from two TUs is one entity.
//!
//! Expansion linkage runs *after* the AST walk ([`link_expansions`]): each
//! recorded macro use is attached to the smallest AST node whose range
//! covers the use site. Uses whose tokens never reached the tree are
//! counted and dropped.

use tracing::{debug, warn};

use cppgraph_core::NodeId;
use cppgraph_frontend::model::{ParsedTranslationUnit, PreprocessorRecord};

use crate::graph::{
    CommentRow, ConditionalDirectiveRow, Edge, IncludeRow, MacroRow, PragmaRow,
};
use crate::state::ExtractorState;

pub fn extract_preprocessor(state: &mut ExtractorState, tu: &ParsedTranslationUnit) {
    // The TU root stands in for the file in INCLUDES/DEFINES edges; intern
    // it now, the AST pass will get the same id back.
    let root = state.ids.intern_ast(state.tu, tu.ast.address);

    extract_macros(state, &tu.preprocessor, root);
    extract_includes(state, &tu.preprocessor, root);
    extract_directives(state, &tu.preprocessor);
    extract_comments(state, &tu.preprocessor);
}

fn extract_macros(state: &mut ExtractorState, record: &PreprocessorRecord, root: NodeId) {
    for m in &record.macros {
        let (id, fresh) = state.ids.intern_macro(&m.key());
        if fresh {
            state.graph.macros.push(MacroRow {
                id,
                macro_name: m.name.clone(),
                is_function_like: m.is_function_like,
                parameter_count: m.parameters.len() as u32,
                parameter_names: m.parameters.clone(),
                replacement_text: m.replacement.clone(),
                is_builtin: m.is_builtin,
                is_conditional: m.is_conditional,
            });
        }
        state.graph.edges.push(Edge::Defines {
            root,
            definition: id,
        });
    }
}

fn extract_includes(state: &mut ExtractorState, record: &PreprocessorRecord, root: NodeId) {
    for inc in &record.includes {
        let id = state.ids.fresh();
        state.graph.includes.push(IncludeRow {
            id,
            include_path: inc.path.clone(),
            is_system_include: inc.is_system,
            is_angled: inc.is_angled,
            include_depth: inc.depth,
            including_file: inc.including_file.clone(),
            line: inc.line,
        });
        state.graph.edges.push(Edge::Includes { root, include: id });
    }
}

fn extract_directives(state: &mut ExtractorState, record: &PreprocessorRecord) {
    for c in &record.conditionals {
        let id = state.ids.fresh();
        state.graph.conditionals.push(ConditionalDirectiveRow {
            id,
            directive_kind: c.kind,
            condition_text: c.condition.clone(),
            branch_taken: c.branch_taken,
            source_file: c.file.clone(),
            line: c.line,
        });
    }
    for p in &record.pragmas {
        let id = state.ids.fresh();
        state.graph.pragmas.push(PragmaRow {
            id,
            pragma_kind: pragma_kind(&p.text).to_owned(),
            pragma_text: p.text.clone(),
            source_file: p.file.clone(),
            line: p.line,
        });
    }
}

fn pragma_kind(text: &str) -> &'static str {
    let first = text.split_whitespace().next().unwrap_or("");
    match first {
        "once" => "once",
        "pack" => "pack",
        "GCC" | "clang" => "diagnostic",
        _ => "other",
    }
}

fn extract_comments(state: &mut ExtractorState, record: &PreprocessorRecord) {
    for c in &record.comments {
        let id = state.ids.fresh();
        state.graph.comments.push(CommentRow {
            id,
            comment_text: c.text.clone(),
            is_documentation: c.is_documentation,
            attached_node_id: None,
            source_file: c.range.file.clone(),
            start_line: c.range.start_line,
            end_line: c.range.end_line,
        });
    }
}

/// Post-AST pass: turn recorded macro uses into `MACRO_EXPANSION` edges and
/// attach documentation comments to the declaration starting right below
/// them.
pub fn link_expansions(state: &mut ExtractorState, record: &PreprocessorRecord) {
    for exp in &record.expansions {
        let Some(def_id) = state.ids.lookup_macro(&exp.macro_key()) else {
            warn!(target: "extract", macro_name = %exp.macro_name,
                "expansion of a macro the preprocessor never defined");
            state.graph.dropped_expansions += 1;
            continue;
        };
        match state.smallest_enclosing(&exp.file, exp.line, exp.col) {
            Some(node) => {
                if state.expansion_pairs.insert((node, def_id)) {
                    state.graph.edges.push(Edge::MacroExpansion {
                        node,
                        definition: def_id,
                        context: exp.context.clone(),
                    });
                }
            }
            None => {
                debug!(target: "extract",
                    macro_name = %exp.macro_name, file = %exp.file, line = exp.line,
                    "macro use outside any AST node, dropped");
                state.graph.dropped_expansions += 1;
            }
        }
    }

    attach_doc_comments(state);
}

fn attach_doc_comments(state: &mut ExtractorState) {
    // Borrow dance: collect decl start positions first, then mutate rows.
    let decl_starts: Vec<(String, u32, NodeId)> = state
        .graph
        .ast_nodes
        .iter()
        .filter(|n| n.node_type.is_declaration())
        .map(|n| (n.range.file.clone(), n.range.start_line, n.id))
        .collect();

    for comment in state.graph.comments.iter_mut() {
        if !comment.is_documentation {
            continue;
        }
        comment.attached_node_id = decl_starts
            .iter()
            .find(|(file, start, _)| *file == comment.source_file && *start == comment.end_line + 1)
            .map(|(_, _, id)| *id);
    }
}
