//! Extractor-level coverage of the end-to-end scenarios, asserted against
//! the buffered `TuGraph` before anything touches a store.

use cppgraph_core::{
    AccessSpecifier, CfgEdgeKind, IdentityService, NodeKind, SpecializationKind, TypeRole,
};
use cppgraph_extract::graph::Edge;
use cppgraph_extract::{extract_translation_unit, TuGraph};
use cppgraph_frontend::model::{FunctionCfg, TemplateData};
use cppgraph_test_utils::*;

const FILE: &str = "/src/main.cpp";

fn hierarchy_tu() -> cppgraph_frontend::model::ParsedTranslationUnit {
    let animal_speak = node(11, NodeKind::CXXMethodDecl, line_range(FILE, 2))
        .decl({
            let mut d = method_decl("Animal", "speak", &[]);
            d.is_virtual = true;
            d
        })
        .build();
    let animal = node(10, NodeKind::CXXRecordDecl, line_range(FILE, 1))
        .decl(class_decl("Animal"))
        .child(animal_speak)
        .build();

    let dog_speak = node(21, NodeKind::CXXMethodDecl, line_range(FILE, 5))
        .decl(method_decl("Dog", "speak", &[("Animal::speak", "()")]))
        .build();
    let dog = node(20, NodeKind::CXXRecordDecl, line_range(FILE, 4))
        .decl({
            let mut d = class_decl("Dog");
            d.bases = vec![base("Animal", AccessSpecifier::Public, false)];
            d
        })
        .child(dog_speak)
        .build();

    tu(FILE).child(animal).child(dog).build()
}

fn record_rows(graph: &TuGraph) -> Vec<&str> {
    graph
        .ast_nodes
        .iter()
        .filter(|n| n.node_type == NodeKind::CXXRecordDecl)
        .filter_map(|n| {
            graph
                .declarations
                .iter()
                .find(|d| d.id == n.id)
                .map(|d| d.name.as_str())
        })
        .collect()
}

#[test]
fn class_hierarchy_yields_inheritance_and_override_edges() {
    let ids = IdentityService::new();
    let graph = extract_translation_unit(&ids, 0, &hierarchy_tu());

    let mut names = record_rows(&graph);
    names.sort_unstable();
    assert_eq!(names, vec!["Animal", "Dog"]);

    let animal = ids.lookup_decl("Animal").unwrap();
    let dog = ids.lookup_decl("Dog").unwrap();
    assert!(graph.edges.iter().any(|e| matches!(e,
        Edge::InheritsFrom { derived, base, access: AccessSpecifier::Public, is_virtual: false }
            if *derived == dog && *base == animal
    )));

    let base_speak = ids.lookup_decl("Animal::speak()").unwrap();
    let dog_speak = ids.lookup_decl("Dog::speak()").unwrap();
    assert!(graph.edges.iter().any(|e| matches!(e,
        Edge::Overrides { method, overridden }
            if *method == dog_speak && *overridden == base_speak
    )));
    assert!(graph.deferred.is_empty());
}

#[test]
fn parent_edges_carry_source_order_indices() {
    let ids = IdentityService::new();
    let graph = extract_translation_unit(&ids, 0, &hierarchy_tu());

    let animal = ids.lookup_decl("Animal").unwrap();
    let dog = ids.lookup_decl("Dog").unwrap();
    let root_children: Vec<(u64, u32)> = graph
        .edges
        .iter()
        .filter_map(|e| match e {
            Edge::ParentOf {
                parent,
                child,
                child_index,
            } if child == &animal || child == &dog => Some((child.as_u64(), *child_index)),
            _ => None,
        })
        .collect();
    assert_eq!(root_children.len(), 2);
    assert!(root_children.contains(&(animal.as_u64(), 0)));
    assert!(root_children.contains(&(dog.as_u64(), 1)));

    // Methods sit in their record's scope.
    let dog_speak = ids.lookup_decl("Dog::speak()").unwrap();
    assert!(graph.edges.iter().any(|e| matches!(e,
        Edge::InScope { node, scope, .. } if *node == dog_speak && *scope == dog
    )));
}

#[test]
fn implicit_instantiation_links_to_primary_template() {
    let primary = node(30, NodeKind::FunctionTemplateDecl, line_range(FILE, 1))
        .decl({
            let mut d = decl("max", "max");
            d.template = Some(TemplateData {
                parameters: vec![cppgraph_frontend::model::TemplateParameterData {
                    kind: cppgraph_core::TemplateParameterKind::Type,
                    name: "T".into(),
                    is_parameter_pack: false,
                    default_argument: None,
                }],
                primary: None,
                specialization_kind: None,
                template_arguments: None,
            });
            d
        })
        .build();
    let instance = node(31, NodeKind::FunctionDecl, line_range(FILE, 3))
        .decl(instantiation_of(
            function_decl("max", int_type(), vec![int_type(), int_type()]),
            "max",
            "int",
        ))
        .build();
    let unit = tu(FILE).child(primary).child(instance).build();

    let ids = IdentityService::new();
    let graph = extract_translation_unit(&ids, 0, &unit);

    let primary_id = ids.lookup_decl("max").unwrap();
    let instance_id = ids.lookup_decl("max<int>").unwrap();

    assert_eq!(graph.template_parameters.len(), 1);
    assert_eq!(graph.template_parameters[0].parameter_name, "T");

    assert!(graph.edges.iter().any(|e| matches!(e,
        Edge::Specializes { specialization, primary, template_arguments, kind: SpecializationKind::Implicit }
            if *specialization == instance_id && *primary == primary_id && template_arguments == "int"
    )));
    assert!(graph.edges.iter().any(|e| matches!(e,
        Edge::TemplateRelation { source, target, relation_kind: "instantiates" }
            if *source == instance_id && *target == primary_id
    )));
}

#[test]
fn macro_and_include_rows_with_expansion_edge() {
    let square = function_macro("SQUARE", FILE, 2, &["x"], "((x)*(x))");
    let init = node(41, NodeKind::BinaryOperator, line_range(FILE, 3))
        .expr(prvalue_expr())
        .expanded_from("SQUARE", FILE, 2)
        .build();
    let y = node(40, NodeKind::VarDecl, line_range(FILE, 3))
        .decl({
            let mut d = decl("y", "y");
            d.declared_type = Some(int_type());
            d
        })
        .child(init)
        .build();

    let unit = tu(FILE)
        .include(system_include("stddef.h", FILE, 1))
        .define_macro(square.clone())
        .expansion(expansion_at(&square, FILE, 3, 8))
        .child(y)
        .build();

    let ids = IdentityService::new();
    let graph = extract_translation_unit(&ids, 0, &unit);

    assert_eq!(graph.includes.len(), 1);
    let inc = &graph.includes[0];
    assert!(inc.is_system_include && inc.is_angled);
    assert_eq!(inc.include_path, "stddef.h");
    assert_eq!(inc.include_depth, 0);

    assert_eq!(graph.macros.len(), 1);
    let m = &graph.macros[0];
    assert_eq!(m.macro_name, "SQUARE");
    assert!(m.is_function_like);
    assert_eq!(m.parameter_count, 1);

    let expansion_edges: Vec<_> = graph
        .edges
        .iter()
        .filter(|e| matches!(e, Edge::MacroExpansion { .. }))
        .collect();
    assert_eq!(expansion_edges.len(), 1, "node flag and preprocessor record must dedup");

    assert!(graph
        .edges
        .iter()
        .any(|e| matches!(e, Edge::Includes { .. })));
    assert!(graph.edges.iter().any(|e| matches!(e, Edge::Defines { .. })));
}

#[test]
fn folded_initializer_gets_a_constant_row() {
    let init = node(51, NodeKind::BinaryOperator, line_range(FILE, 1))
        .expr(folded_expr("5", "int"))
        .build();
    let n = node(50, NodeKind::VarDecl, line_range(FILE, 1))
        .decl({
            let mut d = decl("N", "N");
            d.declared_type = Some(int_type());
            d
        })
        .child(init)
        .build();
    let unit = tu(FILE).child(n).build();

    let ids = IdentityService::new();
    let graph = extract_translation_unit(&ids, 0, &unit);

    assert_eq!(graph.constants.len(), 1);
    let c = &graph.constants[0];
    assert_eq!(c.constant_value, "5");
    assert!(c.is_compile_time_constant);

    let expr = graph
        .expressions
        .iter()
        .find(|e| e.expression_kind == NodeKind::BinaryOperator)
        .unwrap();
    assert!(expr.is_constexpr);
    assert_eq!(expr.evaluation_result.as_deref(), Some("5"));
    assert!(graph.edges.iter().any(|e| matches!(e,
        Edge::HasConstantValue { expr: from, constant } if *from == expr.id && *constant == c.id
    )));
}

#[test]
fn expression_types_close_over_the_type_table() {
    let init = node(61, NodeKind::IntegerLiteral, line_range(FILE, 1))
        .expr({
            let mut e = prvalue_expr();
            e.ty = Some(int_type());
            e.literal_value = Some("7".into());
            e
        })
        .build();
    let v = node(60, NodeKind::VarDecl, line_range(FILE, 1))
        .decl({
            let mut d = decl("v", "v");
            d.declared_type = Some(int_type());
            d
        })
        .child(init)
        .build();
    let unit = tu(FILE).child(v).build();

    let ids = IdentityService::new();
    let graph = extract_translation_unit(&ids, 0, &unit);

    // One canonical `int` row, referenced from both the decl and the literal.
    assert_eq!(graph.types.len(), 1);
    let ty = graph.types[0].id;
    let has_type_targets: Vec<_> = graph
        .edges
        .iter()
        .filter_map(|e| match e {
            Edge::HasType { ty: t, role, .. } => Some((*t, *role)),
            _ => None,
        })
        .collect();
    assert!(has_type_targets.contains(&(ty, TypeRole::Declared)));
    assert_eq!(has_type_targets.iter().filter(|(t, _)| *t == ty).count(), 2);
}

#[test]
fn cfg_blocks_get_reachability_and_containment() {
    let then_ret = node(72, NodeKind::ReturnStmt, line_range(FILE, 2)).build();
    let else_ret = node(73, NodeKind::ReturnStmt, line_range(FILE, 3)).build();
    let cond = node(71, NodeKind::IfStmt, line_range(FILE, 1))
        .stmt(cppgraph_frontend::model::StmtData {
            is_constexpr: false,
            has_side_effects: false,
            condition_text: Some("x > 0".into()),
        })
        .child(then_ret)
        .child(else_ret)
        .build();
    let body = node(74, NodeKind::CompoundStmt, line_range(FILE, 1))
        .child(cond)
        .build();
    let f = node(70, NodeKind::FunctionDecl, line_range(FILE, 1))
        .decl(function_decl("f", int_type(), vec![int_type()]))
        .child(body)
        .build();

    let cfg = FunctionCfg {
        function_address: 70,
        blocks: vec![
            cfg_block(0, true, false, vec![71]),
            cfg_block(1, false, false, vec![72]),
            cfg_block(2, false, false, vec![73]),
            cfg_block(3, false, true, vec![]),
        ],
        edges: vec![
            cfg_edge(0, 1, CfgEdgeKind::TrueBranch),
            cfg_edge(0, 2, CfgEdgeKind::FalseBranch),
            cfg_edge(1, 3, CfgEdgeKind::Fallthrough),
            cfg_edge(2, 3, CfgEdgeKind::Fallthrough),
        ],
    };
    let unit = tu(FILE).child(f).cfg(cfg).build();

    let ids = IdentityService::new();
    let graph = extract_translation_unit(&ids, 0, &unit);

    assert_eq!(graph.cfg_blocks.len(), 4);
    assert!(graph.cfg_blocks.iter().all(|b| b.reachable));
    let f_id = ids.lookup_decl("f(int)").unwrap();
    assert!(graph.cfg_blocks.iter().all(|b| b.function_id == f_id));
    assert_eq!(
        graph
            .edges
            .iter()
            .filter(|e| matches!(e, Edge::ContainsCfg { function, .. } if *function == f_id))
            .count(),
        4
    );
    assert!(graph.edges.iter().any(
        |e| matches!(e, Edge::CfgEdge { kind: CfgEdgeKind::TrueBranch, .. })
    ));
    assert!(graph.edges.iter().any(
        |e| matches!(e, Edge::CfgEdge { kind: CfgEdgeKind::FalseBranch, .. })
    ));
    assert_eq!(
        graph
            .edges
            .iter()
            .filter(|e| matches!(e, Edge::CfgContainsStmt { .. }))
            .count(),
        3
    );
}

#[test]
fn second_tu_with_same_declarations_emits_nothing_new() {
    let ids = IdentityService::new();
    let first = extract_translation_unit(&ids, 0, &hierarchy_tu());
    let second = extract_translation_unit(&ids, 1, &hierarchy_tu());

    assert_eq!(record_rows(&first).len(), 2);
    assert_eq!(record_rows(&second).len(), 0);
    assert!(second.declarations.is_empty());
    // The duplicate records are sighted for the stitcher; their subtrees
    // (the methods) are skipped outright.
    assert_eq!(second.sightings.iter().filter(|s| !s.emitted).count(), 2);
}

#[test]
fn directives_and_doc_comments_are_recorded() {
    use cppgraph_core::{ConditionalDirectiveKind, SourceRange};
    use cppgraph_frontend::model::{
        CommentRecord, ConditionalRecord, PragmaRecord, PreprocessorRecord,
    };

    let file = "/src/d.cpp";
    let record = PreprocessorRecord {
        conditionals: vec![ConditionalRecord {
            kind: ConditionalDirectiveKind::Ifdef,
            file: file.into(),
            line: 1,
            condition: Some("DEBUG".into()),
            branch_taken: Some(false),
        }],
        pragmas: vec![PragmaRecord {
            text: "once".into(),
            file: file.into(),
            line: 1,
        }],
        comments: vec![CommentRecord {
            range: SourceRange::new(file, 3, 0, 3, 20),
            text: "/// counts cats".into(),
            is_documentation: true,
        }],
        ..Default::default()
    };
    let cats = node(30, NodeKind::VarDecl, line_range(file, 4))
        .decl({
            let mut d = decl("cats", "cats");
            d.declared_type = Some(int_type());
            d
        })
        .build();
    let unit = tu(file).preprocessor(record).child(cats).build();

    let ids = IdentityService::new();
    let graph = extract_translation_unit(&ids, 0, &unit);

    assert_eq!(graph.conditionals.len(), 1);
    let cond = &graph.conditionals[0];
    assert_eq!(cond.directive_kind, ConditionalDirectiveKind::Ifdef);
    assert_eq!(cond.condition_text.as_deref(), Some("DEBUG"));
    assert_eq!(cond.branch_taken, Some(false));

    assert_eq!(graph.pragmas.len(), 1);
    assert_eq!(graph.pragmas[0].pragma_kind, "once");

    // The doc comment ends on the line above `cats`, so it attaches.
    let cats_id = ids.lookup_decl("cats").unwrap();
    assert_eq!(graph.comments.len(), 1);
    assert_eq!(graph.comments[0].attached_node_id, Some(cats_id));
}

#[test]
fn reopened_namespace_merges_but_keeps_contributing_members() {
    let file_a = "/src/a.cpp";
    let file_b = "/src/b.cpp";

    let ns_a = node(80, NodeKind::NamespaceDecl, line_range(file_a, 1))
        .decl(decl("zoo", "zoo"))
        .child(
            node(81, NodeKind::VarDecl, line_range(file_a, 2))
                .decl({
                    let mut d = decl("cats", "zoo::cats");
                    d.declared_type = Some(int_type());
                    d
                })
                .build(),
        )
        .build();
    let ns_b = node(80, NodeKind::NamespaceDecl, line_range(file_b, 1))
        .decl(decl("zoo", "zoo"))
        .child(
            node(81, NodeKind::VarDecl, line_range(file_b, 2))
                .decl({
                    let mut d = decl("dogs", "zoo::dogs");
                    d.declared_type = Some(int_type());
                    d
                })
                .build(),
        )
        .build();

    let ids = IdentityService::new();
    let first = extract_translation_unit(&ids, 0, &tu(file_a).child(ns_a).build());
    let second = extract_translation_unit(&ids, 1, &tu(file_b).child(ns_b).build());

    // One namespace row, emitted by the first TU only.
    assert_eq!(
        first
            .ast_nodes
            .iter()
            .filter(|n| n.node_type == NodeKind::NamespaceDecl)
            .count(),
        1
    );
    assert!(!second
        .ast_nodes
        .iter()
        .any(|n| n.node_type == NodeKind::NamespaceDecl));

    // But the reopened block still contributes its member, scoped to the
    // merged namespace node.
    let ns = ids.lookup_decl("zoo").unwrap();
    let dogs = ids.lookup_decl("zoo::dogs").unwrap();
    assert!(second.declarations.iter().any(|d| d.id == dogs));
    assert!(second.edges.iter().any(|e| matches!(e,
        Edge::InScope { node, scope, kind: cppgraph_core::ScopeKind::Namespace }
            if *node == dogs && *scope == ns
    )));
    assert!(second.edges.iter().any(|e| matches!(e,
        Edge::ParentOf { parent, child, .. } if *parent == ns && *child == dogs
    )));
}

#[test]
fn using_directives_are_one_row_per_occurrence() {
    let make_tu = |file: &str| {
        let using = node(90, NodeKind::UsingDirectiveDecl, line_range(file, 1))
            .decl({
                let mut d = decl("std", "std");
                d.is_definition = false;
                d.using_target = Some("std".into());
                d
            })
            .build();
        tu(file).child(using).build()
    };

    let ids = IdentityService::new();
    let first = extract_translation_unit(&ids, 0, &make_tu("/src/a.cpp"));
    let second = extract_translation_unit(&ids, 1, &make_tu("/src/b.cpp"));

    // Unlike ordinary declarations, `using namespace std;` in two TUs is
    // two occurrences.
    assert_eq!(first.usings.len(), 1);
    assert_eq!(second.usings.len(), 1);
    assert_eq!(
        first.usings[0].using_kind,
        cppgraph_core::UsingKind::UsingDirective
    );
    assert_eq!(first.usings[0].target_name.as_deref(), Some("std"));
    assert_ne!(first.usings[0].id, second.usings[0].id);
}

#[test]
fn override_into_unseen_tu_is_deferred() {
    // Only Dog, no Animal anywhere yet: both the base and the override
    // target must queue for the stitcher.
    let dog_speak = node(21, NodeKind::CXXMethodDecl, line_range(FILE, 5))
        .decl(method_decl("Dog", "speak", &[("Animal::speak", "()")]))
        .build();
    let dog = node(20, NodeKind::CXXRecordDecl, line_range(FILE, 4))
        .decl({
            let mut d = class_decl("Dog");
            d.bases = vec![base("Animal", AccessSpecifier::Public, false)];
            d
        })
        .child(dog_speak)
        .build();
    let unit = tu(FILE).child(dog).build();

    let ids = IdentityService::new();
    let graph = extract_translation_unit(&ids, 0, &unit);

    assert!(!graph
        .edges
        .iter()
        .any(|e| matches!(e, Edge::Overrides { .. } | Edge::InheritsFrom { .. })));
    let kinds: Vec<&str> = graph.deferred.iter().map(|d| d.kind.name()).collect();
    assert!(kinds.contains(&"OVERRIDES"));
    assert!(kinds.contains(&"INHERITS_FROM"));
    assert!(graph
        .deferred
        .iter()
        .any(|d| d.target_key == "Animal::speak()"));
}
