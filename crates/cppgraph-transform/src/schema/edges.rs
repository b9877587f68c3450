//! Relationship-table schemas. Edges are `(from, to)` pairs; where an edge
//! kind can legitimately connect the same pair more than once with a
//! different property (a method taking two `int` parameters, a node inside
//! two roles of a scope), the distinguishing property is part of the key.

use crate::define_schema;

define_schema!(ParentOfSchema {
    "PARENT_OF",
    keys { parent_id: "Int", child_id: "Int" },
    vals { child_index: "Int" }
});

define_schema!(HasTypeSchema {
    "HAS_TYPE",
    keys { node_id: "Int", type_id: "Int", type_role: "String" },
    vals {}
});

define_schema!(InheritsFromSchema {
    "INHERITS_FROM",
    keys { derived_id: "Int", base_id: "Int" },
    vals { inheritance_type: "String", is_virtual: "Bool" }
});

define_schema!(OverridesSchema {
    "OVERRIDES",
    keys { method_id: "Int", overridden_id: "Int" },
    vals {}
});

define_schema!(SpecializesSchema {
    "SPECIALIZES",
    keys { specialization_id: "Int", primary_id: "Int" },
    vals { template_arguments: "String", specialization_kind: "String" }
});

define_schema!(TemplateRelationSchema {
    "TEMPLATE_RELATION",
    keys { source_id: "Int", target_id: "Int", relation_kind: "String" },
    vals {}
});

define_schema!(InScopeSchema {
    "IN_SCOPE",
    keys { node_id: "Int", scope_id: "Int" },
    vals { scope_kind: "String" }
});

define_schema!(MacroExpansionSchema {
    "MACRO_EXPANSION",
    keys { node_id: "Int", macro_id: "Int" },
    vals { expansion_context: "String?" }
});

define_schema!(IncludesSchema {
    "INCLUDES",
    keys { source_id: "Int", include_id: "Int" },
    vals {}
});

define_schema!(DefinesSchema {
    "DEFINES",
    keys { source_id: "Int", macro_id: "Int" },
    vals {}
});

define_schema!(HasConstantValueSchema {
    "HAS_CONSTANT_VALUE",
    keys { expression_id: "Int", constant_id: "Int" },
    vals {}
});

define_schema!(ContainsCfgSchema {
    "CONTAINS_CFG",
    keys { function_id: "Int", block_id: "Int" },
    vals {}
});

define_schema!(CfgEdgeSchema {
    "CFG_EDGE",
    keys { from_block: "Int", to_block: "Int" },
    vals { edge_type: "String" }
});

define_schema!(CfgContainsStmtSchema {
    "CFG_CONTAINS_STMT",
    keys { block_id: "Int", statement_id: "Int" },
    vals { stmt_index: "Int" }
});
