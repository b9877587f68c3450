//! Declaration normalization: `Declaration` rows plus the inheritance,
//! override, and template edges hanging off them.
//!
//! Edge targets that name entities (base classes, overridden methods,
//! primary templates) resolve through the identity service when the target
//! has been interned already; otherwise the edge is deferred with the
//! target's canonical key and the stitcher finishes the job.

use cppgraph_core::{NodeId, NodeKind, SpecializationKind, TypeRole, UsingKind};
use cppgraph_frontend::model::{AstNode, DeclData, TypeRef};

use crate::graph::{
    DeclarationRow, DeferredEdge, DeferredEdgeKind, Edge, TemplateParameterRow, UsingRow,
};
use crate::state::ExtractorState;
use crate::types::type_id;

pub(crate) fn process_decl(state: &mut ExtractorState, node: &AstNode, id: NodeId) {
    let Some(decl) = &node.decl else {
        return;
    };

    state.graph.declarations.push(DeclarationRow {
        id,
        name: decl.name.clone(),
        qualified_name: decl.qualified_name.clone(),
        namespace_context: decl.namespace_context.clone(),
        access: decl.access,
        storage_class: decl.storage_class,
        is_definition: decl.is_definition,
    });

    emit_type_edges(state, decl, id);
    emit_bases(state, node, decl, id);
    emit_overrides(state, node, decl, id);
    emit_template(state, node, decl, id);
    emit_using(state, node, decl, id);
}

fn emit_type_edges(state: &mut ExtractorState, decl: &DeclData, id: NodeId) {
    if let Some(t) = &decl.declared_type {
        let ty = type_id(state, t);
        state.graph.edges.push(Edge::HasType {
            node: id,
            ty,
            role: TypeRole::Declared,
        });
    }
    if let Some(t) = &decl.return_type {
        let ty = type_id(state, t);
        state.graph.edges.push(Edge::HasType {
            node: id,
            ty,
            role: TypeRole::Return,
        });
    }
    for t in &decl.parameter_types {
        let ty = type_id(state, t);
        state.graph.edges.push(Edge::HasType {
            node: id,
            ty,
            role: TypeRole::Parameter,
        });
    }
}

fn emit_bases(state: &mut ExtractorState, node: &AstNode, decl: &DeclData, id: NodeId) {
    for base in &decl.bases {
        let key = base.base.key();
        match state.ids.lookup_decl(&key) {
            Some(base_id) => state.graph.edges.push(Edge::InheritsFrom {
                derived: id,
                base: base_id,
                access: base.access,
                is_virtual: base.is_virtual,
            }),
            None => state.graph.deferred.push(DeferredEdge {
                kind: DeferredEdgeKind::InheritsFrom {
                    access: base.access,
                    is_virtual: base.is_virtual,
                },
                from: id,
                target_key: key.clone(),
                origin: node.range.clone(),
            }),
        }
        // The record also references the base as a type.
        let ty = type_id(state, &TypeRef::named(base.base.qualified_name.clone()));
        state.graph.edges.push(Edge::HasType {
            node: id,
            ty,
            role: TypeRole::Base,
        });
    }
}

fn emit_overrides(state: &mut ExtractorState, node: &AstNode, decl: &DeclData, id: NodeId) {
    for target in &decl.overrides {
        let key = target.key();
        match state.ids.lookup_decl(&key) {
            Some(overridden) => state.graph.edges.push(Edge::Overrides {
                method: id,
                overridden,
            }),
            None => state.graph.deferred.push(DeferredEdge {
                kind: DeferredEdgeKind::Overrides,
                from: id,
                target_key: key,
                origin: node.range.clone(),
            }),
        }
    }
}

fn emit_template(state: &mut ExtractorState, node: &AstNode, decl: &DeclData, id: NodeId) {
    let Some(template) = &decl.template else {
        return;
    };

    for (i, param) in template.parameters.iter().enumerate() {
        let param_id = state.ids.fresh();
        state.graph.template_parameters.push(TemplateParameterRow {
            id: param_id,
            parameter_kind: param.kind,
            parameter_name: param.name.clone(),
            parameter_index: i as u32,
            is_parameter_pack: param.is_parameter_pack,
            has_default_argument: param.default_argument.is_some(),
            default_argument_text: param.default_argument.clone(),
        });
        state.graph.edges.push(Edge::ParentOf {
            parent: id,
            child: param_id,
            child_index: (node.children.len() + i) as u32,
        });
    }

    let Some(spec_kind) = template.specialization_kind else {
        return;
    };
    let args = template.template_arguments.clone().unwrap_or_default();
    let primary_key = match &template.primary {
        Some(p) => p.key(),
        None => return,
    };

    match state.ids.lookup_decl(&primary_key) {
        Some(primary) => {
            state.graph.edges.push(Edge::Specializes {
                specialization: id,
                primary,
                template_arguments: args,
                kind: spec_kind,
            });
            if spec_kind == SpecializationKind::Implicit {
                state.graph.edges.push(Edge::TemplateRelation {
                    source: id,
                    target: primary,
                    relation_kind: "instantiates",
                });
            }
        }
        None => {
            state.graph.deferred.push(DeferredEdge {
                kind: DeferredEdgeKind::Specializes {
                    template_arguments: args,
                    kind: spec_kind,
                },
                from: id,
                target_key: primary_key.clone(),
                origin: node.range.clone(),
            });
            if spec_kind == SpecializationKind::Implicit {
                state.graph.deferred.push(DeferredEdge {
                    kind: DeferredEdgeKind::TemplateInstantiation,
                    from: id,
                    target_key: primary_key,
                    origin: node.range.clone(),
                });
            }
        }
    }
}

fn emit_using(state: &mut ExtractorState, node: &AstNode, decl: &DeclData, id: NodeId) {
    let kind = decl.using_kind.or(match node.kind {
        NodeKind::UsingDecl => Some(UsingKind::UsingDecl),
        NodeKind::UsingDirectiveDecl => Some(UsingKind::UsingDirective),
        NodeKind::NamespaceAliasDecl => Some(UsingKind::NamespaceAlias),
        NodeKind::TypeAliasDecl | NodeKind::TypedefDecl => Some(UsingKind::TypeAlias),
        _ => None,
    });
    if let Some(using_kind) = kind {
        state.graph.usings.push(UsingRow {
            id,
            using_kind,
            name: decl.name.clone(),
            target_name: decl.using_target.clone(),
        });
    }
}
