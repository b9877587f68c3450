//! Builders for hand-rolled translation units.
//!
//! Tests across the workspace assemble front-end output directly instead of
//! shelling out to a real C++ toolchain; these helpers keep that assembly
//! readable. Addresses are explicit so tests can refer back to nodes when
//! wiring CFGs.

use std::path::PathBuf;

use cppgraph_core::{
    AccessSpecifier, CfgEdgeKind, NodeKind, SourceRange, SpecializationKind, StorageClass,
    ValueCategory,
};
use cppgraph_frontend::model::{
    AstNode, BaseSpecifier, CfgBlockRecord, CfgEdgeRecord, DeclData, DeclRef, ExpansionRecord,
    ExprData, FoldedValue, FunctionCfg, IncludeRecord, MacroDefinitionRecord, MacroRef,
    ParsedTranslationUnit, PreprocessorRecord, StmtData, TemplateData, TypeRef,
};

/// One-line range in `file` starting at `line`.
pub fn line_range(file: &str, line: u32) -> SourceRange {
    SourceRange::new(file, line, 0, line, 79)
}

pub struct TuBuilder {
    file: PathBuf,
    children: Vec<AstNode>,
    preprocessor: PreprocessorRecord,
    cfgs: Vec<FunctionCfg>,
}

pub fn tu(file: &str) -> TuBuilder {
    TuBuilder {
        file: PathBuf::from(file),
        children: Vec::new(),
        preprocessor: PreprocessorRecord::default(),
        cfgs: Vec::new(),
    }
}

impl TuBuilder {
    pub fn child(mut self, node: AstNode) -> Self {
        self.children.push(node);
        self
    }

    pub fn define_macro(mut self, m: MacroDefinitionRecord) -> Self {
        self.preprocessor.macros.push(m);
        self
    }

    pub fn include(mut self, inc: IncludeRecord) -> Self {
        self.preprocessor.includes.push(inc);
        self
    }

    pub fn expansion(mut self, e: ExpansionRecord) -> Self {
        self.preprocessor.expansions.push(e);
        self
    }

    pub fn cfg(mut self, cfg: FunctionCfg) -> Self {
        self.cfgs.push(cfg);
        self
    }

    pub fn preprocessor(mut self, record: PreprocessorRecord) -> Self {
        self.preprocessor = record;
        self
    }

    pub fn build(self) -> ParsedTranslationUnit {
        let file_str = self.file.to_string_lossy().into_owned();
        let end_line = self
            .children
            .iter()
            .map(|c| c.range.end_line)
            .max()
            .unwrap_or(1);
        ParsedTranslationUnit {
            directory: self
                .file
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from("/")),
            ast: AstNode {
                address: 1,
                kind: NodeKind::TranslationUnitDecl,
                range: SourceRange::new(file_str, 1, 0, end_line, 0),
                raw_text: None,
                decl: None,
                stmt: None,
                expr: None,
                expanded_from: None,
                children: self.children,
            },
            preprocessor: self.preprocessor,
            cfgs: self.cfgs,
            file: self.file,
        }
    }
}

pub struct NodeBuilder {
    node: AstNode,
}

pub fn node(address: u64, kind: NodeKind, range: SourceRange) -> NodeBuilder {
    NodeBuilder {
        node: AstNode {
            address,
            kind,
            range,
            raw_text: None,
            decl: None,
            stmt: None,
            expr: None,
            expanded_from: None,
            children: Vec::new(),
        },
    }
}

impl NodeBuilder {
    pub fn decl(mut self, d: DeclData) -> Self {
        self.node.decl = Some(d);
        self
    }

    pub fn stmt(mut self, s: StmtData) -> Self {
        self.node.stmt = Some(s);
        self
    }

    pub fn expr(mut self, e: ExprData) -> Self {
        self.node.expr = Some(e);
        self
    }

    pub fn raw_text(mut self, text: &str) -> Self {
        self.node.raw_text = Some(text.to_owned());
        self
    }

    pub fn expanded_from(mut self, name: &str, file: &str, line: u32) -> Self {
        self.node.expanded_from = Some(MacroRef {
            name: name.to_owned(),
            file: file.to_owned(),
            line,
        });
        self
    }

    pub fn child(mut self, n: AstNode) -> Self {
        self.node.children.push(n);
        self
    }

    pub fn build(self) -> AstNode {
        self.node
    }
}

/// Declaration payload with everything defaulted; tests override fields.
pub fn decl(name: &str, qualified: &str) -> DeclData {
    DeclData {
        name: name.to_owned(),
        qualified_name: qualified.to_owned(),
        namespace_context: String::new(),
        access: AccessSpecifier::None,
        storage_class: StorageClass::None,
        is_definition: true,
        declared_type: None,
        return_type: None,
        parameter_types: Vec::new(),
        is_const: false,
        is_volatile: false,
        ref_qualifier: None,
        is_virtual: false,
        bases: Vec::new(),
        overrides: Vec::new(),
        template: None,
        using_kind: None,
        using_target: None,
    }
}

pub fn class_decl(name: &str) -> DeclData {
    decl(name, name)
}

pub fn base(qualified_name: &str, access: AccessSpecifier, is_virtual: bool) -> BaseSpecifier {
    BaseSpecifier {
        base: DeclRef::new(qualified_name),
        access,
        is_virtual,
    }
}

/// Method payload; `overrides` lists `(qualified_name, signature)` pairs.
pub fn method_decl(class: &str, name: &str, overrides: &[(&str, &str)]) -> DeclData {
    let mut d = decl(name, &format!("{class}::{name}"));
    d.access = AccessSpecifier::Public;
    d.return_type = Some(TypeRef::builtin("void", 0));
    d.overrides = overrides
        .iter()
        .map(|(q, s)| DeclRef::with_signature(*q, *s))
        .collect();
    d
}

pub fn function_decl(name: &str, return_type: TypeRef, params: Vec<TypeRef>) -> DeclData {
    let mut d = decl(name, name);
    d.return_type = Some(return_type);
    d.parameter_types = params;
    d
}

/// Implicit-instantiation payload pointing at `primary` with `args`.
pub fn instantiation_of(mut d: DeclData, primary: &str, args: &str) -> DeclData {
    d.template = Some(TemplateData {
        parameters: Vec::new(),
        primary: Some(DeclRef::new(primary)),
        specialization_kind: Some(SpecializationKind::Implicit),
        template_arguments: Some(args.to_owned()),
    });
    d
}

pub fn int_type() -> TypeRef {
    TypeRef::builtin("int", 4)
}

pub fn prvalue_expr() -> ExprData {
    ExprData {
        value_category: ValueCategory::PRValue,
        ty: None,
        operator: None,
        literal_value: None,
        implicit_cast_kind: None,
        is_constexpr: false,
        folded: None,
    }
}

pub fn folded_expr(value: &str, type_name: &str) -> ExprData {
    ExprData {
        value_category: ValueCategory::PRValue,
        ty: Some(int_type()),
        operator: None,
        literal_value: None,
        implicit_cast_kind: None,
        is_constexpr: true,
        folded: Some(FoldedValue {
            value: value.to_owned(),
            type_name: type_name.to_owned(),
        }),
    }
}

pub fn object_macro(name: &str, file: &str, line: u32, replacement: &str) -> MacroDefinitionRecord {
    MacroDefinitionRecord {
        name: name.to_owned(),
        file: file.to_owned(),
        line,
        is_function_like: false,
        parameters: Vec::new(),
        replacement: replacement.to_owned(),
        is_builtin: false,
        is_conditional: false,
    }
}

pub fn function_macro(
    name: &str,
    file: &str,
    line: u32,
    params: &[&str],
    replacement: &str,
) -> MacroDefinitionRecord {
    MacroDefinitionRecord {
        name: name.to_owned(),
        file: file.to_owned(),
        line,
        is_function_like: true,
        parameters: params.iter().map(|p| (*p).to_owned()).collect(),
        replacement: replacement.to_owned(),
        is_builtin: false,
        is_conditional: false,
    }
}

pub fn system_include(path: &str, including_file: &str, line: u32) -> IncludeRecord {
    IncludeRecord {
        path: path.to_owned(),
        including_file: including_file.to_owned(),
        line,
        is_system: true,
        is_angled: true,
        depth: 0,
    }
}

pub fn expansion_at(m: &MacroDefinitionRecord, file: &str, line: u32, col: u32) -> ExpansionRecord {
    ExpansionRecord {
        macro_name: m.name.clone(),
        definition_file: m.file.clone(),
        definition_line: m.line,
        file: file.to_owned(),
        line,
        col,
        context: None,
    }
}

pub fn cfg_block(index: u32, entry: bool, exit: bool, statements: Vec<u64>) -> CfgBlockRecord {
    CfgBlockRecord {
        index,
        is_entry: entry,
        is_exit: exit,
        terminator_kind: None,
        statements,
    }
}

pub fn cfg_edge(from: u32, to: u32, kind: CfgEdgeKind) -> CfgEdgeRecord {
    CfgEdgeRecord { from, to, kind }
}
