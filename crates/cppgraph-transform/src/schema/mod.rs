//! Store schema.
//!
//! One `define_schema!` invocation per relation, split into node tables
//! ([`nodes`]) and relationship tables ([`edges`]). Relation and column
//! names are the external query contract, so they match the table names
//! analyzers use (`ASTNode`, `INHERITS_FROM`, ...) rather than Rust
//! conventions. Key columns come before the `=>` in the create script;
//! everything else is a value column.

pub mod edges;
pub mod nodes;

pub struct CozoField {
    st: &'static str,
    dv: &'static str,
}

impl CozoField {
    pub fn st(&self) -> &str {
        self.st
    }

    pub fn dv(&self) -> &str {
        self.dv
    }
}

/// Example
/// define_schema!(AstNodeSchema {
///     "ASTNode",
///     keys { node_id: "Int" },
///     vals { node_type: "String", source_file: "String" }
/// });
#[macro_export]
macro_rules! define_schema {
    ($schema_name:ident {
        $relation:literal,
        keys { $($key_name:ident: $kdv:literal),+ $(,)? },
        vals { $($val_name:ident: $vdv:literal),* $(,)? }
        $(,)?
    }) => {
        pub struct $schema_name {
            pub relation: &'static str,
            $($key_name: $crate::schema::CozoField,)+
            $($val_name: $crate::schema::CozoField,)*
        }

        impl $schema_name {
            pub const SCHEMA: Self = Self {
                relation: $relation,
                $($key_name: $crate::schema::CozoField { st: stringify!($key_name), dv: $kdv },)+
                $($val_name: $crate::schema::CozoField { st: stringify!($val_name), dv: $vdv },)*
            };

            $(pub fn $key_name(&self) -> &str {
                self.$key_name.st()
            })+

            $(pub fn $val_name(&self) -> &str {
                self.$val_name.st()
            })*

            /// Column names, keys first, in create-script order.
            pub fn columns(&self) -> Vec<&'static str> {
                vec![
                    $(self.$key_name.st,)+
                    $(self.$val_name.st,)*
                ]
            }

            pub fn script_create(&self) -> String {
                let keys: Vec<String> =
                    vec![$(format!("{}: {}", self.$key_name.st(), self.$key_name.dv())),+];
                let vals: Vec<String> =
                    vec![$(format!("{}: {}", self.$val_name.st(), self.$val_name.dv())),*];
                if vals.is_empty() {
                    format!(":create {} {{ {} }}", $relation, keys.join(", "))
                } else {
                    format!(":create {} {{ {} => {} }}", $relation, keys.join(", "), vals.join(", "))
                }
            }

            /// Parameterized multi-row put; `param` names a `$`-parameter
            /// holding a list of rows in [`Self::columns`] order.
            pub fn script_put(&self, param: &str) -> String {
                let entry_names = self.columns().join(", ");
                format!("?[{}] <- ${} :put {}", entry_names, param, $relation)
            }
        }
    };
}

/// Flat registry of every relation, for idempotent creation and schema
/// verification.
pub struct SchemaDef {
    pub relation: &'static str,
    pub create: fn() -> String,
    pub columns: fn() -> Vec<&'static str>,
}

macro_rules! registry_entry {
    ($ty:ty) => {
        SchemaDef {
            relation: <$ty>::SCHEMA.relation,
            create: || <$ty>::SCHEMA.script_create(),
            columns: || <$ty>::SCHEMA.columns(),
        }
    };
}

lazy_static::lazy_static! {
    pub static ref ALL_SCHEMAS: Vec<SchemaDef> = vec![
        // Node tables.
        registry_entry!(nodes::AstNodeSchema),
        registry_entry!(nodes::DeclarationSchema),
        registry_entry!(nodes::TypeSchema),
        registry_entry!(nodes::StatementSchema),
        registry_entry!(nodes::ExpressionSchema),
        registry_entry!(nodes::ConstantExpressionSchema),
        registry_entry!(nodes::TemplateParameterSchema),
        registry_entry!(nodes::UsingDeclarationSchema),
        registry_entry!(nodes::MacroDefinitionSchema),
        registry_entry!(nodes::IncludeDirectiveSchema),
        registry_entry!(nodes::ConditionalDirectiveSchema),
        registry_entry!(nodes::PragmaDirectiveSchema),
        registry_entry!(nodes::CommentSchema),
        registry_entry!(nodes::CfgBlockSchema),
        // Relationship tables.
        registry_entry!(edges::ParentOfSchema),
        registry_entry!(edges::HasTypeSchema),
        registry_entry!(edges::InheritsFromSchema),
        registry_entry!(edges::OverridesSchema),
        registry_entry!(edges::SpecializesSchema),
        registry_entry!(edges::TemplateRelationSchema),
        registry_entry!(edges::InScopeSchema),
        registry_entry!(edges::MacroExpansionSchema),
        registry_entry!(edges::IncludesSchema),
        registry_entry!(edges::DefinesSchema),
        registry_entry!(edges::HasConstantValueSchema),
        registry_entry!(edges::ContainsCfgSchema),
        registry_entry!(edges::CfgEdgeSchema),
        registry_entry!(edges::CfgContainsStmtSchema),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_scripts_have_key_separator() {
        let script = nodes::AstNodeSchema::SCHEMA.script_create();
        assert!(script.starts_with(":create ASTNode { node_id: Int =>"));
    }

    #[test]
    fn keys_only_relation_has_no_separator() {
        let script = edges::OverridesSchema::SCHEMA.script_create();
        assert_eq!(
            script,
            ":create OVERRIDES { method_id: Int, overridden_id: Int }"
        );
    }

    #[test]
    fn registry_covers_every_spec_relation() {
        let names: Vec<&str> = ALL_SCHEMAS.iter().map(|s| s.relation).collect();
        for required in [
            "ASTNode",
            "Declaration",
            "Type",
            "Statement",
            "Expression",
            "ConstantExpression",
            "TemplateParameter",
            "UsingDeclaration",
            "MacroDefinition",
            "IncludeDirective",
            "ConditionalDirective",
            "PragmaDirective",
            "Comment",
            "CFGBlock",
            "PARENT_OF",
            "HAS_TYPE",
            "INHERITS_FROM",
            "OVERRIDES",
            "SPECIALIZES",
            "TEMPLATE_RELATION",
            "IN_SCOPE",
            "MACRO_EXPANSION",
            "INCLUDES",
            "DEFINES",
            "HAS_CONSTANT_VALUE",
            "CONTAINS_CFG",
            "CFG_EDGE",
            "CFG_CONTAINS_STMT",
        ] {
            assert!(names.contains(&required), "missing relation {required}");
        }
    }
}
