//! Node-table schemas. Every row is keyed by `node_id`; secondary tables
//! (`Declaration`, `Statement`, `Expression`, `UsingDeclaration`) share
//! their id with the `ASTNode` row they annotate.

use crate::define_schema;

define_schema!(AstNodeSchema {
    "ASTNode",
    keys { node_id: "Int" },
    vals {
        node_type: "String",
        source_file: "String",
        start_line: "Int",
        start_column: "Int",
        end_line: "Int",
        end_column: "Int",
        memory_address: "Int",
        raw_text: "String?",
    }
});

define_schema!(DeclarationSchema {
    "Declaration",
    keys { node_id: "Int" },
    vals {
        name: "String",
        qualified_name: "String",
        namespace_context: "String",
        access_specifier: "String",
        storage_class: "String",
        is_definition: "Bool",
    }
});

define_schema!(TypeSchema {
    "Type",
    keys { node_id: "Int" },
    vals {
        type_name: "String",
        canonical_type: "String",
        is_builtin: "Bool",
        is_const: "Bool",
        is_volatile: "Bool",
        size_bytes: "Int?",
    }
});

define_schema!(StatementSchema {
    "Statement",
    keys { node_id: "Int" },
    vals {
        statement_kind: "String",
        is_compound: "Bool",
        is_constexpr: "Bool",
        has_side_effects: "Bool",
        condition_text: "String?",
        control_flow_type: "String?",
    }
});

define_schema!(ExpressionSchema {
    "Expression",
    keys { node_id: "Int" },
    vals {
        expression_kind: "String",
        value_category: "String",
        operator_kind: "String?",
        literal_value: "String?",
        implicit_cast_kind: "String?",
        is_constexpr: "Bool",
        evaluation_result: "String?",
    }
});

define_schema!(ConstantExpressionSchema {
    "ConstantExpression",
    keys { node_id: "Int" },
    vals {
        constant_value: "String",
        constant_type: "String",
        is_compile_time_constant: "Bool",
    }
});

define_schema!(TemplateParameterSchema {
    "TemplateParameter",
    keys { node_id: "Int" },
    vals {
        parameter_kind: "String",
        parameter_name: "String",
        parameter_index: "Int",
        is_parameter_pack: "Bool",
        has_default_argument: "Bool",
        default_argument_text: "String?",
    }
});

define_schema!(UsingDeclarationSchema {
    "UsingDeclaration",
    keys { node_id: "Int" },
    vals {
        using_kind: "String",
        name: "String",
        target_name: "String?",
    }
});

define_schema!(MacroDefinitionSchema {
    "MacroDefinition",
    keys { node_id: "Int" },
    vals {
        macro_name: "String",
        is_function_like: "Bool",
        parameter_count: "Int",
        parameter_names: "[String]",
        replacement_text: "String",
        is_builtin: "Bool",
        is_conditional: "Bool",
    }
});

define_schema!(IncludeDirectiveSchema {
    "IncludeDirective",
    keys { node_id: "Int" },
    vals {
        include_path: "String",
        is_system_include: "Bool",
        is_angled: "Bool",
        include_depth: "Int",
        including_file: "String",
        line: "Int",
    }
});

define_schema!(ConditionalDirectiveSchema {
    "ConditionalDirective",
    keys { node_id: "Int" },
    vals {
        directive_kind: "String",
        condition_text: "String?",
        branch_taken: "Bool?",
        source_file: "String",
        line: "Int",
    }
});

define_schema!(PragmaDirectiveSchema {
    "PragmaDirective",
    keys { node_id: "Int" },
    vals {
        pragma_text: "String",
        pragma_kind: "String",
        source_file: "String",
        line: "Int",
    }
});

define_schema!(CommentSchema {
    "Comment",
    keys { node_id: "Int" },
    vals {
        comment_text: "String",
        is_documentation: "Bool",
        attached_node_id: "Int?",
        source_file: "String",
        start_line: "Int",
        end_line: "Int",
    }
});

define_schema!(CfgBlockSchema {
    "CFGBlock",
    keys { node_id: "Int" },
    vals {
        function_id: "Int",
        block_index: "Int",
        is_entry_block: "Bool",
        is_exit_block: "Bool",
        terminator_kind: "String?",
        reachable: "Bool",
    }
});
