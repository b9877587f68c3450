//! The AST extractor: a depth-first pre-order walk over the front-end's
//! syntax tree, emitting `ASTNode` rows, `PARENT_OF`/`IN_SCOPE` edges, and
//! dispatching into the declaration and statement/expression extractors.
//!
//! Identity rules during the walk:
//! - Declaration nodes with a usable canonical key intern through the
//!   declaration key space, so the same entity seen from several TUs maps
//!   to one id. Only the first writer emits rows and edges; later sightings
//!   are recorded for the stitcher and their subtrees skipped — except that
//!   the first *definition* of an already-interned key still walks its body
//!   (the body exists nowhere else).
//! - Every other node interns through the per-TU `(tu, address)` space.

use tracing::{trace, warn};

use cppgraph_core::{NodeId, NodeKind, ScopeKind};
use cppgraph_frontend::model::{AstNode, ParsedTranslationUnit};

use crate::decl;
use crate::graph::{AstNodeRow, DeclSighting, Edge};
use crate::state::ExtractorState;
use crate::stmt_expr;

pub fn extract_ast(state: &mut ExtractorState, tu: &ParsedTranslationUnit) {
    visit(state, &tu.ast, None, 0);
    trace!(target: "extract",
        nodes = state.graph.ast_nodes.len(),
        edges = state.graph.edges.len(),
        "AST pass done"
    );
}

fn visit(state: &mut ExtractorState, node: &AstNode, parent: Option<NodeId>, child_index: u32) {
    let (id, emit_rows, walk_children) = assign_identity(state, node);
    state.record_node(node.address, id, &node.range);

    if emit_rows {
        if !node.range.is_sane() {
            warn!(target: "extract",
                file = %node.range.file, line = node.range.start_line,
                kind = %node.kind, "front-end reported an inverted source range");
        }
        state.graph.ast_nodes.push(AstNodeRow {
            id,
            node_type: node.kind.clone(),
            range: node.range.clone(),
            memory_address: node.address,
            raw_text: node.raw_text.clone(),
        });

        if let Some(p) = parent {
            state.graph.edges.push(Edge::ParentOf {
                parent: p,
                child: id,
                child_index,
            });
        }

        if let Some((scope, kind)) = state.current_scope() {
            state.graph.edges.push(Edge::InScope {
                node: id,
                scope,
                kind,
            });
        }

        if let Some(mref) = &node.expanded_from {
            if let Some(def_id) = state.ids.lookup_macro(&mref.key()) {
                if state.expansion_pairs.insert((id, def_id)) {
                    state.graph.edges.push(Edge::MacroExpansion {
                        node: id,
                        definition: def_id,
                        context: None,
                    });
                }
            } else {
                state.graph.dropped_expansions += 1;
            }
        }

        match node.kind.category() {
            cppgraph_core::NodeCategory::Declaration => decl::process_decl(state, node, id),
            cppgraph_core::NodeCategory::Statement => stmt_expr::process_stmt(state, node, id),
            cppgraph_core::NodeCategory::Expression => stmt_expr::process_expr(state, node, id),
            cppgraph_core::NodeCategory::Other => {}
        }
    }

    if node.kind.is_function_like() && walk_children {
        let defines_body = node
            .decl
            .as_ref()
            .map(|d| d.is_definition)
            .unwrap_or(false);
        if defines_body {
            state.owned_bodies.insert(id);
        }
    }

    if walk_children {
        let pushed_scope = node.kind.forms_scope();
        if pushed_scope {
            state.scope_stack.push((id, scope_kind_of(&node.kind)));
        }
        for (i, child) in node.children.iter().enumerate() {
            visit(state, child, Some(id), i as u32);
        }
        if pushed_scope {
            state.scope_stack.pop();
        }
    }
}

/// Pick the id for a node and decide whether this TU emits its rows and
/// walks its subtree.
fn assign_identity(state: &mut ExtractorState, node: &AstNode) -> (NodeId, bool, bool) {
    let decl_data = match &node.decl {
        Some(d) if dedups_across_tus(&node.kind) && !d.qualified_name.is_empty() => d,
        _ => {
            let id = state.ids.intern_ast(state.tu, node.address);
            return (id, true, true);
        }
    };

    let key = decl_data.canonical_key(&node.kind);
    let (id, fresh) = state.ids.intern_decl(&key);
    let first_definition = decl_data.is_definition && state.ids.claim_definition(&key);

    state.graph.sightings.push(DeclSighting {
        key,
        id,
        range: node.range.clone(),
        is_definition: decl_data.is_definition,
        emitted: fresh,
    });

    if !fresh && first_definition {
        // Out-of-line definition of a declaration already interned: the row
        // may still sit in this TU's buffer, in which case it is upgraded.
        state.graph.upgrade_declaration_definition(id);
    }

    // Namespaces are open: every TU's block for `ns` contributes different
    // members to the same merged node, so the subtree is always walked.
    let reopenable = matches!(node.kind, NodeKind::NamespaceDecl);

    (id, fresh, fresh || first_definition || reopenable)
}

/// Declarations that are one entity however many TUs see them. Using
/// declarations, directives, and friends are one row per source occurrence
/// instead and take per-TU identity.
fn dedups_across_tus(kind: &NodeKind) -> bool {
    !matches!(
        kind,
        NodeKind::TranslationUnitDecl
            | NodeKind::UsingDecl
            | NodeKind::UsingDirectiveDecl
            | NodeKind::NamespaceAliasDecl
            | NodeKind::FriendDecl
            | NodeKind::StaticAssertDecl
            | NodeKind::AccessSpecDecl
            | NodeKind::LinkageSpecDecl
    ) && kind.is_declaration()
}

fn scope_kind_of(kind: &NodeKind) -> ScopeKind {
    if matches!(kind, NodeKind::NamespaceDecl) {
        ScopeKind::Namespace
    } else if kind.is_record() {
        ScopeKind::Record
    } else if kind.is_function_like() {
        ScopeKind::Function
    } else {
        ScopeKind::Block
    }
}
