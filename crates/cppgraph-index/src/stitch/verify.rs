//! Global invariant verification, run against the committed store.
//!
//! Node identity, type closure, and canonical-type uniqueness end the
//! run when violated; the remaining checks log and count.

use serde::{Deserialize, Serialize};

use cppgraph_error::{InvariantViolation, Result};
use cppgraph_transform::GraphStore;

/// Tables whose rows are primary (own their `node_id`). Secondary tables —
/// `Declaration`, `Statement`, `Expression`, `UsingDeclaration` — share
/// ids with `ASTNode` and are checked separately.
const PRIMARY_TABLES: &[&str] = &[
    "ASTNode",
    "Type",
    "ConstantExpression",
    "TemplateParameter",
    "MacroDefinition",
    "IncludeDirective",
    "ConditionalDirective",
    "PragmaDirective",
    "Comment",
    "CFGBlock",
];

const SECONDARY_TABLES: &[&str] = &["Declaration", "Statement", "Expression", "UsingDeclaration"];

const METHOD_KINDS: &[&str] = &[
    "CXXMethodDecl",
    "CXXConstructorDecl",
    "CXXDestructorDecl",
    "CXXConversionDecl",
];

const SCOPE_KINDS: &[&str] = &[
    "NamespaceDecl",
    "CXXRecordDecl",
    "ClassTemplateSpecializationDecl",
    "ClassTemplatePartialSpecializationDecl",
    "FunctionDecl",
    "CXXMethodDecl",
    "CXXConstructorDecl",
    "CXXDestructorDecl",
    "CXXConversionDecl",
    "CompoundStmt",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvariantCheck {
    pub name: String,
    pub description: String,
    pub violations: usize,
    pub fatal: bool,
}

impl InvariantCheck {
    pub fn to_violation(&self) -> InvariantViolation {
        InvariantViolation {
            name: self.name.clone(),
            count: self.violations,
            detail: self.description.clone(),
            fatal: self.fatal,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvariantReport {
    pub checks: Vec<InvariantCheck>,
}

impl InvariantReport {
    pub fn failed(&self) -> impl Iterator<Item = &InvariantCheck> {
        self.checks.iter().filter(|c| c.violations > 0)
    }
}

fn count(store: &GraphStore, script: &str) -> Result<usize> {
    let rows = store.query(script)?;
    Ok(rows.rows.len())
}

fn kind_rules(rule: &str, kinds: &[&str]) -> String {
    kinds
        .iter()
        .map(|k| format!("{rule}[id] := *ASTNode{{node_id: id, node_type}}, node_type == \"{k}\"\n"))
        .collect()
}

pub fn verify_invariants(store: &GraphStore) -> Result<InvariantReport> {
    let mut checks = Vec::new();

    checks.push(check_identity(store)?);
    checks.push(InvariantCheck {
        name: "parent-forest".into(),
        description: "PARENT_OF child has more than one parent".into(),
        violations: count(
            store,
            r#"?[c] := *PARENT_OF{parent_id: p1, child_id: c}, *PARENT_OF{parent_id: p2, child_id: c}, p1 != p2"#,
        )?,
        fatal: false,
    });
    checks.push(check_scope_integrity(store)?);
    checks.push(InvariantCheck {
        name: "type-closure".into(),
        description: "HAS_TYPE target missing from Type".into(),
        violations: count(
            store,
            r#"?[t] := *HAS_TYPE{type_id: t}, not *Type{node_id: t}"#,
        )?,
        fatal: true,
    });
    checks.push(check_cfg_locality(store)?);
    checks.push(InvariantCheck {
        name: "position-sanity".into(),
        description: "AST node with insane source positions".into(),
        violations: count(
            store,
            r#"
            bad[id] := *ASTNode{node_id: id, start_line}, start_line < 1
            bad[id] := *ASTNode{node_id: id, start_line, end_line}, end_line < start_line
            bad[id] := *ASTNode{node_id: id, start_line, end_line, start_column, end_column},
                       start_line == end_line, end_column < start_column
            ?[id] := bad[id]
            "#,
        )?,
        fatal: false,
    });
    checks.push(InvariantCheck {
        name: "canonical-types".into(),
        description: "two Type rows share a canonical spelling".into(),
        violations: count(
            store,
            r#"?[c] := *Type{node_id: a, canonical_type: c}, *Type{node_id: b, canonical_type: c}, a != b"#,
        )?,
        fatal: true,
    });
    checks.push(check_overrides(store)?);

    Ok(InvariantReport { checks })
}

/// Every id lives in exactly one primary table, and secondary rows
/// shadow an `ASTNode` row.
fn check_identity(store: &GraphStore) -> Result<InvariantCheck> {
    let mut violations = 0usize;

    for (i, a) in PRIMARY_TABLES.iter().enumerate() {
        for b in &PRIMARY_TABLES[i + 1..] {
            violations += count(
                store,
                &format!(r#"?[id] := *{a}{{node_id: id}}, *{b}{{node_id: id}}"#),
            )?;
        }
    }
    for secondary in SECONDARY_TABLES {
        violations += count(
            store,
            &format!(r#"?[id] := *{secondary}{{node_id: id}}, not *ASTNode{{node_id: id}}"#),
        )?;
    }

    Ok(InvariantCheck {
        name: "node-identity".into(),
        description: "node id outside exactly one primary table".into(),
        violations,
        fatal: true,
    })
}

/// `IN_SCOPE` targets are namespaces, records, functions, or blocks.
fn check_scope_integrity(store: &GraphStore) -> Result<InvariantCheck> {
    let script = format!(
        "{}?[s] := *IN_SCOPE{{scope_id: s}}, not scopeable[s]",
        kind_rules("scopeable", SCOPE_KINDS)
    );
    Ok(InvariantCheck {
        name: "scope-integrity".into(),
        description: "IN_SCOPE target is not a scope-forming node".into(),
        violations: count(store, &script)?,
        fatal: false,
    })
}

/// CFG blocks belong to the function that contains them, and CFG edges
/// never cross functions.
fn check_cfg_locality(store: &GraphStore) -> Result<InvariantCheck> {
    let foreign_block = count(
        store,
        r#"?[b] := *CONTAINS_CFG{function_id: f, block_id: b}, *CFGBlock{node_id: b, function_id: owner}, owner != f"#,
    )?;
    let crossing_edge = count(
        store,
        r#"?[b1] := *CFG_EDGE{from_block: b1, to_block: b2},
                   *CFGBlock{node_id: b1, function_id: f1},
                   *CFGBlock{node_id: b2, function_id: f2}, f1 != f2"#,
    )?;
    Ok(InvariantCheck {
        name: "cfg-locality".into(),
        description: "CFG block or edge escapes its function".into(),
        violations: foreign_block + crossing_edge,
        fatal: false,
    })
}

/// `OVERRIDES` endpoints are methods and the derived record reaches the
/// base record through `INHERITS_FROM+`.
fn check_overrides(store: &GraphStore) -> Result<InvariantCheck> {
    let method_rules = kind_rules("method", METHOD_KINDS);
    let non_method = count(
        store,
        &format!(
            r#"
            {method_rules}
            bad[m] := *OVERRIDES{{method_id: m}}, not method[m]
            bad[o] := *OVERRIDES{{overridden_id: o}}, not method[o]
            ?[x] := bad[x]
            "#
        ),
    )?;

    let record_rules = kind_rules(
        "record",
        &[
            "CXXRecordDecl",
            "ClassTemplateSpecializationDecl",
            "ClassTemplatePartialSpecializationDecl",
        ],
    );
    let unreachable = count(
        store,
        &format!(
            r#"
            {record_rules}
            owner[m, r] := *PARENT_OF{{parent_id: r, child_id: m}}, record[r]
            anc[a, b] := *INHERITS_FROM{{derived_id: a, base_id: b}}
            anc[a, c] := anc[a, b], *INHERITS_FROM{{derived_id: b, base_id: c}}
            ?[m] := *OVERRIDES{{method_id: m, overridden_id: o}},
                    owner[m, rm], owner[o, ro], not anc[rm, ro]
            "#
        ),
    )?;

    Ok(InvariantCheck {
        name: "override-shape".into(),
        description: "OVERRIDES endpoints are not methods of related records".into(),
        violations: non_method + unreachable,
        fatal: false,
    })
}

impl std::fmt::Display for InvariantCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} ({} violations)",
            self.name, self.description, self.violations
        )
    }
}
