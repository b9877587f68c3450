//! The analyzer-facing query path: commit a small graph, read it back
//! through `Database`, and make sure mutation is off the table.

use cppgraph_core::{IdentityService, NodeKind};
use cppgraph_db::{Database, DbError};
use cppgraph_extract::extract_translation_unit;
use cppgraph_test_utils::*;
use cppgraph_transform::{append_tu_graph, GraphStore};

fn small_db() -> Database {
    let store = GraphStore::in_memory().unwrap();
    let ids = IdentityService::new();

    let file = "/src/lib.cpp";
    let unit = tu(file)
        .child(
            node(10, NodeKind::FunctionDecl, line_range(file, 1))
                .decl(function_decl("square", int_type(), vec![int_type()]))
                .build(),
        )
        .build();
    let graph = extract_translation_unit(&ids, 0, &unit);
    let mut batch = store.begin_batch();
    append_tu_graph(&mut batch, &graph);
    batch.commit().unwrap();

    Database::new(store)
}

#[test]
fn raw_query_returns_tabular_results() {
    let db = small_db();
    let result = db
        .raw_query(r#"?[name, qn] := *Declaration{name, qualified_name: qn}"#)
        .unwrap();
    assert_eq!(result.headers, vec!["name", "qn"]);
    assert_eq!(result.string_column("name").unwrap(), vec!["square"]);
}

#[test]
fn count_helper_unwraps_single_cells() {
    let db = small_db();
    let n = db
        .count(r#"?[count(role)] := *HAS_TYPE{type_role: role}"#)
        .unwrap();
    // One `return` role and one `parameter` role.
    assert_eq!(n, 2);
}

#[test]
fn writes_are_rejected_on_the_read_surface() {
    let db = small_db();
    let err = db
        .raw_query(r#"?[method_id, overridden_id] <- [[900, 901]] :put OVERRIDES"#)
        .unwrap_err();
    assert!(matches!(err, DbError::Cozo(_)));
}
