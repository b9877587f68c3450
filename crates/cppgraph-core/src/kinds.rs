//! Kind vocabulary shared by the front-end model, the extractors, and the
//! store schema. The AST node discriminator is a tagged enum rather than a
//! free-form string; front-ends may still report kinds outside the known
//! set, which land in `NodeKind::Other` and flow through untouched.

use serde::{Deserialize, Serialize};

/// Coarse grouping of [`NodeKind`]s, used to decide which secondary table
/// (if any) a node row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeCategory {
    Declaration,
    Statement,
    Expression,
    Other,
}

macro_rules! node_kinds {
    (
        decls { $($d:ident),+ $(,)? }
        stmts { $($s:ident),+ $(,)? }
        exprs { $($e:ident),+ $(,)? }
    ) => {
        /// Discriminator for every syntactic node the front-end reports.
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum NodeKind {
            $($d,)+
            $($s,)+
            $($e,)+
            /// A kind outside the known vocabulary; kept verbatim.
            Other(String),
        }

        impl NodeKind {
            pub fn as_str(&self) -> &str {
                match self {
                    $(NodeKind::$d => stringify!($d),)+
                    $(NodeKind::$s => stringify!($s),)+
                    $(NodeKind::$e => stringify!($e),)+
                    NodeKind::Other(s) => s.as_str(),
                }
            }

            pub fn category(&self) -> NodeCategory {
                match self {
                    $(NodeKind::$d => NodeCategory::Declaration,)+
                    $(NodeKind::$s => NodeCategory::Statement,)+
                    $(NodeKind::$e => NodeCategory::Expression,)+
                    NodeKind::Other(_) => NodeCategory::Other,
                }
            }
        }

        impl NodeKind {
            fn from_known(s: &str) -> Option<NodeKind> {
                match s {
                    $(stringify!($d) => Some(NodeKind::$d),)+
                    $(stringify!($s) => Some(NodeKind::$s),)+
                    $(stringify!($e) => Some(NodeKind::$e),)+
                    _ => None,
                }
            }
        }

        impl From<String> for NodeKind {
            fn from(s: String) -> Self {
                NodeKind::from_known(&s).unwrap_or(NodeKind::Other(s))
            }
        }

        impl From<NodeKind> for String {
            fn from(k: NodeKind) -> String {
                match k {
                    NodeKind::Other(s) => s,
                    other => other.as_str().to_owned(),
                }
            }
        }
    };
}

node_kinds! {
    decls {
        TranslationUnitDecl,
        NamespaceDecl,
        NamespaceAliasDecl,
        UsingDecl,
        UsingDirectiveDecl,
        TypedefDecl,
        TypeAliasDecl,
        TypeAliasTemplateDecl,
        CXXRecordDecl,
        CXXMethodDecl,
        CXXConstructorDecl,
        CXXDestructorDecl,
        CXXConversionDecl,
        FunctionDecl,
        FunctionTemplateDecl,
        ClassTemplateDecl,
        ClassTemplateSpecializationDecl,
        ClassTemplatePartialSpecializationDecl,
        TemplateTypeParmDecl,
        NonTypeTemplateParmDecl,
        TemplateTemplateParmDecl,
        VarDecl,
        FieldDecl,
        ParmVarDecl,
        EnumDecl,
        EnumConstantDecl,
        FriendDecl,
        StaticAssertDecl,
        AccessSpecDecl,
        LinkageSpecDecl,
    }
    stmts {
        CompoundStmt,
        DeclStmt,
        NullStmt,
        ExprStmt,
        IfStmt,
        ForStmt,
        WhileStmt,
        DoStmt,
        CXXForRangeStmt,
        SwitchStmt,
        CaseStmt,
        DefaultStmt,
        BreakStmt,
        ContinueStmt,
        ReturnStmt,
        GotoStmt,
        LabelStmt,
        CXXTryStmt,
        CXXCatchStmt,
    }
    exprs {
        BinaryOperator,
        UnaryOperator,
        CompoundAssignOperator,
        ConditionalOperator,
        CallExpr,
        CXXMemberCallExpr,
        CXXOperatorCallExpr,
        DeclRefExpr,
        MemberExpr,
        ArraySubscriptExpr,
        IntegerLiteral,
        FloatingLiteral,
        StringLiteral,
        CharacterLiteral,
        CXXBoolLiteralExpr,
        CXXNullPtrLiteralExpr,
        ImplicitCastExpr,
        CStyleCastExpr,
        CXXStaticCastExpr,
        CXXDynamicCastExpr,
        CXXReinterpretCastExpr,
        CXXConstCastExpr,
        CXXFunctionalCastExpr,
        CXXConstructExpr,
        CXXNewExpr,
        CXXDeleteExpr,
        CXXThisExpr,
        CXXThrowExpr,
        UnaryExprOrTypeTraitExpr,
        InitListExpr,
        LambdaExpr,
        ParenExpr,
        ConstantExpr,
    }
}

impl NodeKind {
    pub fn is_declaration(&self) -> bool {
        self.category() == NodeCategory::Declaration
    }

    pub fn is_statement(&self) -> bool {
        self.category() == NodeCategory::Statement
    }

    pub fn is_expression(&self) -> bool {
        self.category() == NodeCategory::Expression
    }

    /// Nodes that form a scope for `IN_SCOPE` purposes: namespaces, records,
    /// functions (and their special-member variants), and block statements.
    pub fn forms_scope(&self) -> bool {
        matches!(
            self,
            NodeKind::NamespaceDecl
                | NodeKind::CXXRecordDecl
                | NodeKind::ClassTemplateSpecializationDecl
                | NodeKind::ClassTemplatePartialSpecializationDecl
                | NodeKind::FunctionDecl
                | NodeKind::CXXMethodDecl
                | NodeKind::CXXConstructorDecl
                | NodeKind::CXXDestructorDecl
                | NodeKind::CXXConversionDecl
                | NodeKind::CompoundStmt
        )
    }

    pub fn is_function_like(&self) -> bool {
        matches!(
            self,
            NodeKind::FunctionDecl
                | NodeKind::CXXMethodDecl
                | NodeKind::CXXConstructorDecl
                | NodeKind::CXXDestructorDecl
                | NodeKind::CXXConversionDecl
        )
    }

    pub fn is_method(&self) -> bool {
        matches!(
            self,
            NodeKind::CXXMethodDecl
                | NodeKind::CXXConstructorDecl
                | NodeKind::CXXDestructorDecl
                | NodeKind::CXXConversionDecl
        )
    }

    pub fn is_record(&self) -> bool {
        matches!(
            self,
            NodeKind::CXXRecordDecl
                | NodeKind::ClassTemplateSpecializationDecl
                | NodeKind::ClassTemplatePartialSpecializationDecl
        )
    }

    pub fn is_template_decl(&self) -> bool {
        matches!(
            self,
            NodeKind::FunctionTemplateDecl
                | NodeKind::ClassTemplateDecl
                | NodeKind::TypeAliasTemplateDecl
        )
    }

    pub fn control_flow_type(&self) -> Option<ControlFlowType> {
        use NodeKind::*;
        let cf = match self {
            IfStmt | ConditionalOperator => ControlFlowType::Conditional,
            ForStmt | WhileStmt | DoStmt | CXXForRangeStmt => ControlFlowType::Loop,
            SwitchStmt | CaseStmt | DefaultStmt => ControlFlowType::Switch,
            BreakStmt | ContinueStmt | ReturnStmt | GotoStmt => ControlFlowType::Jump,
            CXXTryStmt | CXXCatchStmt | CXXThrowExpr => ControlFlowType::Exception,
            _ => return None,
        };
        Some(cf)
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! str_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(
    /// Member access, also used for inheritance access (`inheritance_type`).
    AccessSpecifier {
        Public => "public",
        Protected => "protected",
        Private => "private",
        None => "none",
    }
);

str_enum!(
    StorageClass {
        None => "none",
        Static => "static",
        Extern => "extern",
        ThreadLocal => "thread_local",
        Register => "register",
    }
);

str_enum!(
    ValueCategory {
        LValue => "lvalue",
        XValue => "xvalue",
        PRValue => "prvalue",
    }
);

str_enum!(
    UsingKind {
        UsingDecl => "using_decl",
        UsingDirective => "using_directive",
        NamespaceAlias => "namespace_alias",
        TypeAlias => "type_alias",
    }
);

str_enum!(
    TemplateParameterKind {
        Type => "type",
        NonType => "non-type",
        Template => "template",
    }
);

str_enum!(
    SpecializationKind {
        Explicit => "explicit",
        Partial => "partial",
        Implicit => "implicit",
    }
);

str_enum!(
    /// Role a type plays relative to the node carrying a `HAS_TYPE` edge.
    TypeRole {
        Declared => "declared",
        Return => "return",
        Parameter => "parameter",
        Base => "base",
        Element => "element",
    }
);

str_enum!(
    ScopeKind {
        Namespace => "namespace",
        Record => "record",
        Function => "function",
        Block => "block",
    }
);

str_enum!(
    ControlFlowType {
        Conditional => "conditional",
        Loop => "loop",
        Switch => "switch",
        Jump => "jump",
        Exception => "exception",
    }
);

str_enum!(
    CfgEdgeKind {
        Fallthrough => "fallthrough",
        TrueBranch => "true_branch",
        FalseBranch => "false_branch",
        Case => "case",
        Default => "default",
        Exception => "exception",
        BackEdge => "back_edge",
    }
);

str_enum!(
    ConditionalDirectiveKind {
        If => "if",
        Ifdef => "ifdef",
        Ifndef => "ifndef",
        Elif => "elif",
        Else => "else",
        Endif => "endif",
    }
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_strings() {
        let k = NodeKind::from("CXXMethodDecl".to_string());
        assert_eq!(k, NodeKind::CXXMethodDecl);
        assert!(k.is_method());

        let unknown = NodeKind::from("CoroutineBodyStmt".to_string());
        assert_eq!(unknown.as_str(), "CoroutineBodyStmt");
        assert_eq!(unknown.category(), NodeCategory::Other);
    }

    #[test]
    fn control_flow_classification() {
        assert_eq!(
            NodeKind::WhileStmt.control_flow_type(),
            Some(ControlFlowType::Loop)
        );
        assert_eq!(
            NodeKind::GotoStmt.control_flow_type(),
            Some(ControlFlowType::Jump)
        );
        assert_eq!(NodeKind::CompoundStmt.control_flow_type(), None);
    }
}
