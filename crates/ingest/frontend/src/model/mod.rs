//! The parsed-translation-unit data model.
//!
//! These types are the whole of what the engine assumes the front-end can
//! produce: a syntax tree whose nodes carry kind, position, and optional
//! declaration/statement/expression payloads, a preprocessor record, and a
//! control-flow graph per function body. Everything is serde-serializable
//! so a TU can round-trip through the snapshot backend.

mod ast;
mod cfg;
mod decl;
mod preproc;
mod types;

pub use ast::{AstNode, ExprData, FoldedValue, MacroRef, StmtData};
pub use cfg::{CfgBlockRecord, CfgEdgeRecord, FunctionCfg};
pub use decl::{BaseSpecifier, DeclData, DeclRef, TemplateData, TemplateParameterData};
pub use preproc::{
    CommentRecord, ConditionalRecord, ExpansionRecord, IncludeRecord, MacroDefinitionRecord,
    PragmaRecord, PreprocessorRecord,
};
pub use types::TypeRef;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One translation unit as handed over by the front-end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedTranslationUnit {
    /// Absolute path of the TU's main file.
    pub file: PathBuf,
    /// Working directory of the invocation that produced it.
    pub directory: PathBuf,
    /// Root of the syntax tree; kind is `TranslationUnitDecl`.
    pub ast: AstNode,
    #[serde(default)]
    pub preprocessor: PreprocessorRecord,
    #[serde(default)]
    pub cfgs: Vec<FunctionCfg>,
}
