//! Store-level tests: schema lifecycle, batched commits, and reading the
//! committed graph back through the query surface.

use cppgraph_core::{AccessSpecifier, IdentityService, NodeKind};
use cppgraph_extract::extract_translation_unit;
use cppgraph_frontend::model::ParsedTranslationUnit;
use cppgraph_test_utils::*;
use cppgraph_transform::{append_tu_graph, GraphStore};

const FILE: &str = "/src/zoo.cpp";

fn zoo_tu(file: &str) -> ParsedTranslationUnit {
    let speak = node(11, NodeKind::CXXMethodDecl, line_range(file, 2))
        .decl(method_decl("Animal", "speak", &[]))
        .build();
    let animal = node(10, NodeKind::CXXRecordDecl, line_range(file, 1))
        .decl(class_decl("Animal"))
        .child(speak)
        .build();
    let dog = node(20, NodeKind::CXXRecordDecl, line_range(file, 4))
        .decl({
            let mut d = class_decl("Dog");
            d.bases = vec![base("Animal", AccessSpecifier::Public, false)];
            d
        })
        .child(
            node(21, NodeKind::CXXMethodDecl, line_range(file, 5))
                .decl(method_decl("Dog", "speak", &[("Animal::speak", "()")]))
                .build(),
        )
        .build();
    tu(file).child(animal).child(dog).build()
}

fn commit_tu(store: &GraphStore, ids: &IdentityService, tu_index: u32, unit: &ParsedTranslationUnit) {
    let graph = extract_translation_unit(ids, tu_index, unit);
    let mut batch = store.begin_batch();
    append_tu_graph(&mut batch, &graph);
    batch.commit().expect("commit failed");
}

#[test]
fn schema_creation_is_idempotent() {
    let store = GraphStore::in_memory().unwrap();
    store.ensure_schema().unwrap();
    store.ensure_schema().unwrap();

    let relations = store.query("::relations").unwrap();
    assert!(relations.rows.len() >= 28);
}

#[test]
fn committed_tu_is_visible_to_queries() {
    let store = GraphStore::in_memory().unwrap();
    let ids = IdentityService::new();
    commit_tu(&store, &ids, 0, &zoo_tu(FILE));

    let records = store
        .query(
            r#"?[name] := *ASTNode{node_id, node_type}, *Declaration{node_id, name},
                         node_type = "CXXRecordDecl""#,
        )
        .unwrap();
    let mut names: Vec<String> = records
        .rows
        .iter()
        .map(|r| r[0].get_str().unwrap().to_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["Animal", "Dog"]);

    let inherits = store
        .query(
            r#"?[d, b, kind] := *INHERITS_FROM{derived_id: d, base_id: b, inheritance_type: kind}"#,
        )
        .unwrap();
    assert_eq!(inherits.rows.len(), 1);
    assert_eq!(inherits.rows[0][2].get_str(), Some("public"));

    let overrides = store.query("?[m, o] := *OVERRIDES{method_id: m, overridden_id: o}").unwrap();
    assert_eq!(overrides.rows.len(), 1);
}

#[test]
fn canonical_types_stay_unique_across_tus() {
    let store = GraphStore::in_memory().unwrap();
    let ids = IdentityService::new();

    let tu_a = tu("/src/a.cpp")
        .child(
            node(30, NodeKind::VarDecl, line_range("/src/a.cpp", 1))
                .decl({
                    let mut d = decl("x", "x");
                    d.declared_type = Some(int_type());
                    d
                })
                .build(),
        )
        .build();
    let tu_b = tu("/src/b.cpp")
        .child(
            node(30, NodeKind::VarDecl, line_range("/src/b.cpp", 1))
                .decl({
                    let mut d = decl("y", "y");
                    d.declared_type = Some(int_type());
                    d
                })
                .build(),
        )
        .build();

    commit_tu(&store, &ids, 0, &tu_a);
    commit_tu(&store, &ids, 1, &tu_b);

    let ints = store
        .query(r#"?[id] := *Type{node_id: id, canonical_type}, canonical_type = "int""#)
        .unwrap();
    assert_eq!(ints.rows.len(), 1);
}

#[test]
fn on_disk_database_reopens_with_matching_schema() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("graph-db");

    {
        let store = GraphStore::create(&db_path, false).unwrap();
        let ids = IdentityService::new();
        commit_tu(&store, &ids, 0, &zoo_tu(FILE));
    }

    let reopened = GraphStore::open_existing(&db_path).unwrap();
    let decls = reopened.query("?[n] := *Declaration{name: n}").unwrap();
    assert!(decls.rows.len() >= 4);
}

#[test]
fn create_refuses_to_clobber_without_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("graph-db");
    GraphStore::create(&db_path, false).unwrap();

    let err = GraphStore::create(&db_path, false).unwrap_err();
    assert!(matches!(
        err,
        cppgraph_error::Error::Argument(cppgraph_error::ArgumentError::OutputExists { .. })
    ));

    // With overwrite the old contents are gone.
    let store = GraphStore::create(&db_path, true).unwrap();
    let rows = store.query("?[id] := *ASTNode{node_id: id}").unwrap();
    assert!(rows.rows.is_empty());
}
