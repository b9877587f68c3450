use serde::{Deserialize, Serialize};

use cppgraph_core::{MacroKey, NodeKind, SourceRange, ValueCategory};

use super::decl::DeclData;
use super::types::TypeRef;

/// One node of the front-end's syntax tree. Children are stored in source
/// order (the order the front-end lists them, which breaks position ties
/// for macro-expanded siblings).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AstNode {
    /// The front-end object's address. Unique within one TU; kept in the
    /// graph for debugging.
    pub address: u64,
    pub kind: NodeKind,
    pub range: SourceRange,
    #[serde(default)]
    pub raw_text: Option<String>,
    #[serde(default)]
    pub decl: Option<DeclData>,
    #[serde(default)]
    pub stmt: Option<StmtData>,
    #[serde(default)]
    pub expr: Option<ExprData>,
    /// Set when the node's tokens came out of a macro expansion.
    #[serde(default)]
    pub expanded_from: Option<MacroRef>,
    #[serde(default)]
    pub children: Vec<AstNode>,
}

impl AstNode {
    /// Pre-order walk over this node and all descendants.
    pub fn walk(&self, f: &mut impl FnMut(&AstNode)) {
        f(self);
        for child in &self.children {
            child.walk(f);
        }
    }
}

/// Statement payload. The statement's kind lives on the node itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StmtData {
    /// `if constexpr`, constexpr-for proposals, etc.
    #[serde(default)]
    pub is_constexpr: bool,
    #[serde(default)]
    pub has_side_effects: bool,
    /// Raw spelling of the condition for control-flow statements.
    #[serde(default)]
    pub condition_text: Option<String>,
}

/// Expression payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExprData {
    pub value_category: ValueCategory,
    #[serde(default)]
    pub ty: Option<TypeRef>,
    /// Operator spelling for unary/binary/compound-assign nodes.
    #[serde(default)]
    pub operator: Option<String>,
    #[serde(default)]
    pub literal_value: Option<String>,
    #[serde(default)]
    pub implicit_cast_kind: Option<String>,
    #[serde(default)]
    pub is_constexpr: bool,
    /// Present when the front-end folded the expression to a constant.
    #[serde(default)]
    pub folded: Option<FoldedValue>,
}

/// A front-end-evaluated constant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoldedValue {
    pub value: String,
    pub type_name: String,
}

/// Reference to a macro definition by its identity key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MacroRef {
    pub name: String,
    pub file: String,
    pub line: u32,
}

impl MacroRef {
    pub fn key(&self) -> MacroKey {
        MacroKey::new(self.name.clone(), self.file.clone(), self.line)
    }
}
