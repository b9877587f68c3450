//! Turns a [`TuGraph`] into batched store rows.
//!
//! Row-to-column conversion lives here in one place so the schema files
//! stay declarative. Column order in each conversion matches the schema's
//! `columns()` order exactly; the tests in `tests/schema_test.rs` pin that
//! correspondence through the store itself.

use cozo::DataValue;

use cppgraph_core::NodeId;
use cppgraph_extract::graph::{
    AstNodeRow, CfgBlockRow, CommentRow, ConditionalDirectiveRow, DeclarationRow, Edge,
    ExpressionRow, IncludeRow, MacroRow, PragmaRow, StatementRow, TemplateParameterRow, TypeRow,
    UsingRow,
};
use cppgraph_extract::TuGraph;

use crate::batch::Batch;
use crate::schema::{edges, nodes};

fn id(n: NodeId) -> DataValue {
    DataValue::from(n.as_i64())
}

fn opt_str(s: &Option<String>) -> DataValue {
    s.as_deref().map(DataValue::from).unwrap_or(DataValue::Null)
}

fn opt_int(v: Option<u64>) -> DataValue {
    v.map(|x| DataValue::from(x as i64)).unwrap_or(DataValue::Null)
}

/// Buffer every row and edge of one TU fragment into the batch.
pub fn append_tu_graph(batch: &mut Batch, graph: &TuGraph) {
    for r in &graph.ast_nodes {
        append_ast_node(batch, r);
    }
    for r in &graph.declarations {
        append_declaration(batch, r);
    }
    for r in &graph.types {
        append_type(batch, r);
    }
    for r in &graph.statements {
        append_statement(batch, r);
    }
    for r in &graph.expressions {
        append_expression(batch, r);
    }
    for r in &graph.constants {
        batch.append(
            nodes::ConstantExpressionSchema::SCHEMA.relation,
            |p| nodes::ConstantExpressionSchema::SCHEMA.script_put(p),
            vec![
                id(r.id),
                DataValue::from(r.constant_value.as_str()),
                DataValue::from(r.constant_type.as_str()),
                DataValue::from(r.is_compile_time_constant),
            ],
        );
    }
    for r in &graph.template_parameters {
        append_template_parameter(batch, r);
    }
    for r in &graph.usings {
        append_using(batch, r);
    }
    for r in &graph.macros {
        append_macro(batch, r);
    }
    for r in &graph.includes {
        append_include(batch, r);
    }
    for r in &graph.conditionals {
        append_conditional(batch, r);
    }
    for r in &graph.pragmas {
        append_pragma(batch, r);
    }
    for r in &graph.comments {
        append_comment(batch, r);
    }
    for r in &graph.cfg_blocks {
        append_cfg_block(batch, r);
    }
    for e in &graph.edges {
        append_edge(batch, e);
    }
}

fn append_ast_node(batch: &mut Batch, r: &AstNodeRow) {
    batch.append(
        nodes::AstNodeSchema::SCHEMA.relation,
        |p| nodes::AstNodeSchema::SCHEMA.script_put(p),
        vec![
            id(r.id),
            DataValue::from(r.node_type.as_str()),
            DataValue::from(r.range.file.as_str()),
            DataValue::from(r.range.start_line as i64),
            DataValue::from(r.range.start_col as i64),
            DataValue::from(r.range.end_line as i64),
            DataValue::from(r.range.end_col as i64),
            DataValue::from(r.memory_address as i64),
            opt_str(&r.raw_text),
        ],
    );
}

fn append_declaration(batch: &mut Batch, r: &DeclarationRow) {
    batch.append(
        nodes::DeclarationSchema::SCHEMA.relation,
        |p| nodes::DeclarationSchema::SCHEMA.script_put(p),
        vec![
            id(r.id),
            DataValue::from(r.name.as_str()),
            DataValue::from(r.qualified_name.as_str()),
            DataValue::from(r.namespace_context.as_str()),
            DataValue::from(r.access.as_str()),
            DataValue::from(r.storage_class.as_str()),
            DataValue::from(r.is_definition),
        ],
    );
}

fn append_type(batch: &mut Batch, r: &TypeRow) {
    batch.append(
        nodes::TypeSchema::SCHEMA.relation,
        |p| nodes::TypeSchema::SCHEMA.script_put(p),
        vec![
            id(r.id),
            DataValue::from(r.type_name.as_str()),
            DataValue::from(r.canonical_type.as_str()),
            DataValue::from(r.is_builtin),
            DataValue::from(r.is_const),
            DataValue::from(r.is_volatile),
            opt_int(r.size_bytes),
        ],
    );
}

fn append_statement(batch: &mut Batch, r: &StatementRow) {
    batch.append(
        nodes::StatementSchema::SCHEMA.relation,
        |p| nodes::StatementSchema::SCHEMA.script_put(p),
        vec![
            id(r.id),
            DataValue::from(r.statement_kind.as_str()),
            DataValue::from(r.is_compound),
            DataValue::from(r.is_constexpr),
            DataValue::from(r.has_side_effects),
            opt_str(&r.condition_text),
            r.control_flow_type
                .map(|c| DataValue::from(c.as_str()))
                .unwrap_or(DataValue::Null),
        ],
    );
}

fn append_expression(batch: &mut Batch, r: &ExpressionRow) {
    batch.append(
        nodes::ExpressionSchema::SCHEMA.relation,
        |p| nodes::ExpressionSchema::SCHEMA.script_put(p),
        vec![
            id(r.id),
            DataValue::from(r.expression_kind.as_str()),
            DataValue::from(r.value_category.as_str()),
            opt_str(&r.operator_kind),
            opt_str(&r.literal_value),
            opt_str(&r.implicit_cast_kind),
            DataValue::from(r.is_constexpr),
            opt_str(&r.evaluation_result),
        ],
    );
}

fn append_template_parameter(batch: &mut Batch, r: &TemplateParameterRow) {
    batch.append(
        nodes::TemplateParameterSchema::SCHEMA.relation,
        |p| nodes::TemplateParameterSchema::SCHEMA.script_put(p),
        vec![
            id(r.id),
            DataValue::from(r.parameter_kind.as_str()),
            DataValue::from(r.parameter_name.as_str()),
            DataValue::from(r.parameter_index as i64),
            DataValue::from(r.is_parameter_pack),
            DataValue::from(r.has_default_argument),
            opt_str(&r.default_argument_text),
        ],
    );
}

fn append_using(batch: &mut Batch, r: &UsingRow) {
    batch.append(
        nodes::UsingDeclarationSchema::SCHEMA.relation,
        |p| nodes::UsingDeclarationSchema::SCHEMA.script_put(p),
        vec![
            id(r.id),
            DataValue::from(r.using_kind.as_str()),
            DataValue::from(r.name.as_str()),
            opt_str(&r.target_name),
        ],
    );
}

fn append_macro(batch: &mut Batch, r: &MacroRow) {
    batch.append(
        nodes::MacroDefinitionSchema::SCHEMA.relation,
        |p| nodes::MacroDefinitionSchema::SCHEMA.script_put(p),
        vec![
            id(r.id),
            DataValue::from(r.macro_name.as_str()),
            DataValue::from(r.is_function_like),
            DataValue::from(r.parameter_count as i64),
            DataValue::List(
                r.parameter_names
                    .iter()
                    .map(|s| DataValue::from(s.as_str()))
                    .collect(),
            ),
            DataValue::from(r.replacement_text.as_str()),
            DataValue::from(r.is_builtin),
            DataValue::from(r.is_conditional),
        ],
    );
}

fn append_include(batch: &mut Batch, r: &IncludeRow) {
    batch.append(
        nodes::IncludeDirectiveSchema::SCHEMA.relation,
        |p| nodes::IncludeDirectiveSchema::SCHEMA.script_put(p),
        vec![
            id(r.id),
            DataValue::from(r.include_path.as_str()),
            DataValue::from(r.is_system_include),
            DataValue::from(r.is_angled),
            DataValue::from(r.include_depth as i64),
            DataValue::from(r.including_file.as_str()),
            DataValue::from(r.line as i64),
        ],
    );
}

fn append_conditional(batch: &mut Batch, r: &ConditionalDirectiveRow) {
    batch.append(
        nodes::ConditionalDirectiveSchema::SCHEMA.relation,
        |p| nodes::ConditionalDirectiveSchema::SCHEMA.script_put(p),
        vec![
            id(r.id),
            DataValue::from(r.directive_kind.as_str()),
            opt_str(&r.condition_text),
            r.branch_taken.map(DataValue::from).unwrap_or(DataValue::Null),
            DataValue::from(r.source_file.as_str()),
            DataValue::from(r.line as i64),
        ],
    );
}

fn append_pragma(batch: &mut Batch, r: &PragmaRow) {
    batch.append(
        nodes::PragmaDirectiveSchema::SCHEMA.relation,
        |p| nodes::PragmaDirectiveSchema::SCHEMA.script_put(p),
        vec![
            id(r.id),
            DataValue::from(r.pragma_text.as_str()),
            DataValue::from(r.pragma_kind.as_str()),
            DataValue::from(r.source_file.as_str()),
            DataValue::from(r.line as i64),
        ],
    );
}

fn append_comment(batch: &mut Batch, r: &CommentRow) {
    batch.append(
        nodes::CommentSchema::SCHEMA.relation,
        |p| nodes::CommentSchema::SCHEMA.script_put(p),
        vec![
            id(r.id),
            DataValue::from(r.comment_text.as_str()),
            DataValue::from(r.is_documentation),
            r.attached_node_id.map(id).unwrap_or(DataValue::Null),
            DataValue::from(r.source_file.as_str()),
            DataValue::from(r.start_line as i64),
            DataValue::from(r.end_line as i64),
        ],
    );
}

fn append_cfg_block(batch: &mut Batch, r: &CfgBlockRow) {
    batch.append(
        nodes::CfgBlockSchema::SCHEMA.relation,
        |p| nodes::CfgBlockSchema::SCHEMA.script_put(p),
        vec![
            id(r.id),
            id(r.function_id),
            DataValue::from(r.block_index as i64),
            DataValue::from(r.is_entry_block),
            DataValue::from(r.is_exit_block),
            opt_str(&r.terminator_kind),
            DataValue::from(r.reachable),
        ],
    );
}

/// Buffer one relationship row. Also used by the stitcher for resolved
/// deferred edges.
pub fn append_edge(batch: &mut Batch, e: &Edge) {
    match e {
        Edge::ParentOf {
            parent,
            child,
            child_index,
        } => batch.append(
            edges::ParentOfSchema::SCHEMA.relation,
            |p| edges::ParentOfSchema::SCHEMA.script_put(p),
            vec![id(*parent), id(*child), DataValue::from(*child_index as i64)],
        ),
        Edge::HasType { node, ty, role } => batch.append(
            edges::HasTypeSchema::SCHEMA.relation,
            |p| edges::HasTypeSchema::SCHEMA.script_put(p),
            vec![id(*node), id(*ty), DataValue::from(role.as_str())],
        ),
        Edge::InheritsFrom {
            derived,
            base,
            access,
            is_virtual,
        } => batch.append(
            edges::InheritsFromSchema::SCHEMA.relation,
            |p| edges::InheritsFromSchema::SCHEMA.script_put(p),
            vec![
                id(*derived),
                id(*base),
                DataValue::from(access.as_str()),
                DataValue::from(*is_virtual),
            ],
        ),
        Edge::Overrides { method, overridden } => batch.append(
            edges::OverridesSchema::SCHEMA.relation,
            |p| edges::OverridesSchema::SCHEMA.script_put(p),
            vec![id(*method), id(*overridden)],
        ),
        Edge::Specializes {
            specialization,
            primary,
            template_arguments,
            kind,
        } => batch.append(
            edges::SpecializesSchema::SCHEMA.relation,
            |p| edges::SpecializesSchema::SCHEMA.script_put(p),
            vec![
                id(*specialization),
                id(*primary),
                DataValue::from(template_arguments.as_str()),
                DataValue::from(kind.as_str()),
            ],
        ),
        Edge::TemplateRelation {
            source,
            target,
            relation_kind,
        } => batch.append(
            edges::TemplateRelationSchema::SCHEMA.relation,
            |p| edges::TemplateRelationSchema::SCHEMA.script_put(p),
            vec![id(*source), id(*target), DataValue::from(*relation_kind)],
        ),
        Edge::InScope { node, scope, kind } => batch.append(
            edges::InScopeSchema::SCHEMA.relation,
            |p| edges::InScopeSchema::SCHEMA.script_put(p),
            vec![id(*node), id(*scope), DataValue::from(kind.as_str())],
        ),
        Edge::MacroExpansion {
            node,
            definition,
            context,
        } => batch.append(
            edges::MacroExpansionSchema::SCHEMA.relation,
            |p| edges::MacroExpansionSchema::SCHEMA.script_put(p),
            vec![id(*node), id(*definition), opt_str(context)],
        ),
        Edge::Includes { root, include } => batch.append(
            edges::IncludesSchema::SCHEMA.relation,
            |p| edges::IncludesSchema::SCHEMA.script_put(p),
            vec![id(*root), id(*include)],
        ),
        Edge::Defines { root, definition } => batch.append(
            edges::DefinesSchema::SCHEMA.relation,
            |p| edges::DefinesSchema::SCHEMA.script_put(p),
            vec![id(*root), id(*definition)],
        ),
        Edge::HasConstantValue { expr, constant } => batch.append(
            edges::HasConstantValueSchema::SCHEMA.relation,
            |p| edges::HasConstantValueSchema::SCHEMA.script_put(p),
            vec![id(*expr), id(*constant)],
        ),
        Edge::ContainsCfg { function, block } => batch.append(
            edges::ContainsCfgSchema::SCHEMA.relation,
            |p| edges::ContainsCfgSchema::SCHEMA.script_put(p),
            vec![id(*function), id(*block)],
        ),
        Edge::CfgEdge { from, to, kind } => batch.append(
            edges::CfgEdgeSchema::SCHEMA.relation,
            |p| edges::CfgEdgeSchema::SCHEMA.script_put(p),
            vec![id(*from), id(*to), DataValue::from(kind.as_str())],
        ),
        Edge::CfgContainsStmt {
            block,
            stmt,
            stmt_index,
        } => batch.append(
            edges::CfgContainsStmtSchema::SCHEMA.relation,
            |p| edges::CfgContainsStmtSchema::SCHEMA.script_put(p),
            vec![id(*block), id(*stmt), DataValue::from(*stmt_index as i64)],
        ),
    }
}
