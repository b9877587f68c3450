//! Statement and expression rows, including constant-fold results.

use cppgraph_core::{NodeId, NodeKind, TypeRole, ValueCategory};
use cppgraph_frontend::model::AstNode;

use crate::graph::{ConstantRow, Edge, ExpressionRow, StatementRow};
use crate::state::ExtractorState;
use crate::types::type_id;

pub(crate) fn process_stmt(state: &mut ExtractorState, node: &AstNode, id: NodeId) {
    let data = node.stmt.clone().unwrap_or_default();
    state.graph.statements.push(StatementRow {
        id,
        statement_kind: node.kind.clone(),
        is_compound: node.kind == NodeKind::CompoundStmt,
        is_constexpr: data.is_constexpr,
        has_side_effects: data.has_side_effects,
        condition_text: data.condition_text,
        control_flow_type: node.kind.control_flow_type(),
    });
}

pub(crate) fn process_expr(state: &mut ExtractorState, node: &AstNode, id: NodeId) {
    let (value_category, operator, literal, cast, is_constexpr, folded, ty) = match &node.expr {
        Some(e) => (
            e.value_category,
            e.operator.clone(),
            e.literal_value.clone(),
            e.implicit_cast_kind.clone(),
            e.is_constexpr,
            e.folded.clone(),
            e.ty.clone(),
        ),
        None => (ValueCategory::PRValue, None, None, None, false, None, None),
    };

    state.graph.expressions.push(ExpressionRow {
        id,
        expression_kind: node.kind.clone(),
        value_category,
        operator_kind: operator,
        literal_value: literal,
        implicit_cast_kind: cast,
        is_constexpr,
        evaluation_result: folded.as_ref().map(|f| f.value.clone()),
    });

    if let Some(t) = ty {
        let type_node = type_id(state, &t);
        state.graph.edges.push(Edge::HasType {
            node: id,
            ty: type_node,
            role: TypeRole::Declared,
        });
    }

    // Only expressions the front-end actually folded get a constant row.
    if let Some(f) = folded {
        let constant = state.ids.fresh();
        state.graph.constants.push(ConstantRow {
            id: constant,
            constant_value: f.value,
            constant_type: f.type_name,
            is_compile_time_constant: true,
        });
        state
            .graph
            .edges
            .push(Edge::HasConstantValue { expr: id, constant });
    }
}
