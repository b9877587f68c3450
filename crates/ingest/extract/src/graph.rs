//! The per-TU graph fragment.
//!
//! Extractors append rows and typed edges here; the transform layer turns
//! the whole fragment into one batched store write. Edges carry plain id
//! pairs — no back-pointers — so the parent forest stays acyclic by
//! construction and macro linkage rides on its own edge kind.

use cppgraph_core::{
    AccessSpecifier, CfgEdgeKind, ConditionalDirectiveKind, ControlFlowType, NodeId, NodeKind,
    ScopeKind, SourceRange, SpecializationKind, StorageClass, TemplateParameterKind, TypeRole,
    UsingKind, ValueCategory,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AstNodeRow {
    pub id: NodeId,
    pub node_type: NodeKind,
    pub range: SourceRange,
    pub memory_address: u64,
    pub raw_text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeclarationRow {
    pub id: NodeId,
    pub name: String,
    pub qualified_name: String,
    pub namespace_context: String,
    pub access: AccessSpecifier,
    pub storage_class: StorageClass,
    pub is_definition: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeRow {
    pub id: NodeId,
    pub type_name: String,
    pub canonical_type: String,
    pub is_builtin: bool,
    pub is_const: bool,
    pub is_volatile: bool,
    pub size_bytes: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementRow {
    pub id: NodeId,
    pub statement_kind: NodeKind,
    pub is_compound: bool,
    pub is_constexpr: bool,
    pub has_side_effects: bool,
    pub condition_text: Option<String>,
    pub control_flow_type: Option<ControlFlowType>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpressionRow {
    pub id: NodeId,
    pub expression_kind: NodeKind,
    pub value_category: ValueCategory,
    pub operator_kind: Option<String>,
    pub literal_value: Option<String>,
    pub implicit_cast_kind: Option<String>,
    pub is_constexpr: bool,
    pub evaluation_result: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstantRow {
    pub id: NodeId,
    pub constant_value: String,
    pub constant_type: String,
    pub is_compile_time_constant: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateParameterRow {
    pub id: NodeId,
    pub parameter_kind: TemplateParameterKind,
    pub parameter_name: String,
    pub parameter_index: u32,
    pub is_parameter_pack: bool,
    pub has_default_argument: bool,
    pub default_argument_text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsingRow {
    pub id: NodeId,
    pub using_kind: UsingKind,
    pub name: String,
    pub target_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MacroRow {
    pub id: NodeId,
    pub macro_name: String,
    pub is_function_like: bool,
    pub parameter_count: u32,
    pub parameter_names: Vec<String>,
    pub replacement_text: String,
    pub is_builtin: bool,
    pub is_conditional: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncludeRow {
    pub id: NodeId,
    pub include_path: String,
    pub is_system_include: bool,
    pub is_angled: bool,
    pub include_depth: u32,
    pub including_file: String,
    pub line: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionalDirectiveRow {
    pub id: NodeId,
    pub directive_kind: ConditionalDirectiveKind,
    pub condition_text: Option<String>,
    pub branch_taken: Option<bool>,
    pub source_file: String,
    pub line: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PragmaRow {
    pub id: NodeId,
    pub pragma_text: String,
    pub pragma_kind: String,
    pub source_file: String,
    pub line: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRow {
    pub id: NodeId,
    pub comment_text: String,
    pub is_documentation: bool,
    pub attached_node_id: Option<NodeId>,
    pub source_file: String,
    pub start_line: u32,
    pub end_line: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CfgBlockRow {
    pub id: NodeId,
    pub function_id: NodeId,
    pub block_index: u32,
    pub is_entry_block: bool,
    pub is_exit_block: bool,
    pub terminator_kind: Option<String>,
    pub reachable: bool,
}

/// Every relationship the extractors emit, as `(from, to)` id pairs plus
/// edge properties.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Edge {
    ParentOf {
        parent: NodeId,
        child: NodeId,
        child_index: u32,
    },
    HasType {
        node: NodeId,
        ty: NodeId,
        role: TypeRole,
    },
    InheritsFrom {
        derived: NodeId,
        base: NodeId,
        access: AccessSpecifier,
        is_virtual: bool,
    },
    Overrides {
        method: NodeId,
        overridden: NodeId,
    },
    Specializes {
        specialization: NodeId,
        primary: NodeId,
        template_arguments: String,
        kind: SpecializationKind,
    },
    TemplateRelation {
        source: NodeId,
        target: NodeId,
        relation_kind: &'static str,
    },
    InScope {
        node: NodeId,
        scope: NodeId,
        kind: ScopeKind,
    },
    MacroExpansion {
        node: NodeId,
        definition: NodeId,
        context: Option<String>,
    },
    Includes {
        root: NodeId,
        include: NodeId,
    },
    Defines {
        root: NodeId,
        definition: NodeId,
    },
    HasConstantValue {
        expr: NodeId,
        constant: NodeId,
    },
    ContainsCfg {
        function: NodeId,
        block: NodeId,
    },
    CfgEdge {
        from: NodeId,
        to: NodeId,
        kind: CfgEdgeKind,
    },
    CfgContainsStmt {
        block: NodeId,
        stmt: NodeId,
        stmt_index: u32,
    },
}

/// An edge whose target entity was not interned yet when the extractor ran.
/// The stitcher resolves `target_key` after every TU has been ingested.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeferredEdge {
    pub kind: DeferredEdgeKind,
    pub from: NodeId,
    pub target_key: String,
    /// Where the referencing construct sits; drives deterministic
    /// resolution order.
    pub origin: SourceRange,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DeferredEdgeKind {
    Overrides,
    InheritsFrom {
        access: AccessSpecifier,
        is_virtual: bool,
    },
    Specializes {
        template_arguments: String,
        kind: SpecializationKind,
    },
    TemplateInstantiation,
}

impl DeferredEdgeKind {
    pub fn name(&self) -> &'static str {
        match self {
            DeferredEdgeKind::Overrides => "OVERRIDES",
            DeferredEdgeKind::InheritsFrom { .. } => "INHERITS_FROM",
            DeferredEdgeKind::Specializes { .. } => "SPECIALIZES",
            DeferredEdgeKind::TemplateInstantiation => "TEMPLATE_RELATION",
        }
    }
}

/// One observation of a declaration canonical key in some TU. The first
/// writer emits the rows; every sighting (including the first) is recorded
/// so the stitcher can validate agreement across TUs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeclSighting {
    pub key: String,
    pub id: NodeId,
    pub range: SourceRange,
    pub is_definition: bool,
    pub emitted: bool,
}

/// Everything one TU contributes to the graph, buffered until commit.
#[derive(Debug, Default)]
pub struct TuGraph {
    pub ast_nodes: Vec<AstNodeRow>,
    pub declarations: Vec<DeclarationRow>,
    pub types: Vec<TypeRow>,
    pub statements: Vec<StatementRow>,
    pub expressions: Vec<ExpressionRow>,
    pub constants: Vec<ConstantRow>,
    pub template_parameters: Vec<TemplateParameterRow>,
    pub usings: Vec<UsingRow>,
    pub macros: Vec<MacroRow>,
    pub includes: Vec<IncludeRow>,
    pub conditionals: Vec<ConditionalDirectiveRow>,
    pub pragmas: Vec<PragmaRow>,
    pub comments: Vec<CommentRow>,
    pub cfg_blocks: Vec<CfgBlockRow>,
    pub edges: Vec<Edge>,
    pub deferred: Vec<DeferredEdge>,
    pub sightings: Vec<DeclSighting>,
    /// Macro expansions whose tokens reached no AST node; counted, not
    /// emitted.
    pub dropped_expansions: u32,
    /// Function bodies the front-end produced no CFG for.
    pub missing_cfgs: u32,
}

impl TuGraph {
    pub fn node_count(&self) -> usize {
        self.ast_nodes.len()
            + self.types.len()
            + self.constants.len()
            + self.template_parameters.len()
            + self.macros.len()
            + self.includes.len()
            + self.conditionals.len()
            + self.pragmas.len()
            + self.comments.len()
            + self.cfg_blocks.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Flip a buffered declaration row to definition status. Only works
    /// within the TU that owns the row, which is exactly the intent: a
    /// later TU must not rewrite committed rows.
    pub fn upgrade_declaration_definition(&mut self, id: NodeId) {
        if let Some(row) = self.declarations.iter_mut().find(|d| d.id == id) {
            row.is_definition = true;
        }
    }
}
