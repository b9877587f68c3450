//! Canonical-key construction for cross-TU deduplication.
//!
//! A declaration seen from two translation units is the same entity iff its
//! canonical key matches. Keys are plain strings so they can travel inside
//! deferred edges and reconciliation records without extra lookup state.

use serde::{Deserialize, Serialize};

/// Key for a declaration: qualified name plus, for functions, the signature
/// (parameter canonical types and cv/ref qualifiers). Non-function
/// declarations use the bare qualified name.
pub fn decl_key(qualified_name: &str, signature: Option<&str>) -> String {
    match signature {
        Some(sig) => format!("{qualified_name}{sig}"),
        None => qualified_name.to_owned(),
    }
}

/// Signature fragment for a function: `(T1, T2) const &` style, built from
/// the canonical spellings the front-end reports for each parameter.
pub fn function_signature(
    param_canonical_types: &[String],
    is_const: bool,
    is_volatile: bool,
    ref_qualifier: Option<&str>,
) -> String {
    let mut sig = String::from("(");
    sig.push_str(&param_canonical_types.join(", "));
    sig.push(')');
    if is_const {
        sig.push_str(" const");
    }
    if is_volatile {
        sig.push_str(" volatile");
    }
    if let Some(r) = ref_qualifier {
        sig.push(' ');
        sig.push_str(r);
    }
    sig
}

/// Key for a template specialization: the primary template's key plus the
/// canonical spelling of the template arguments.
pub fn specialization_key(primary_key: &str, template_arguments: &str) -> String {
    format!("{primary_key}<{template_arguments}>")
}

/// Identity of a macro definition. Two `#define`s of the same name in
/// different places are different entities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MacroKey {
    pub name: String,
    pub file: String,
    pub line: u32,
}

impl MacroKey {
    pub fn new(name: impl Into<String>, file: impl Into<String>, line: u32) -> Self {
        Self {
            name: name.into(),
            file: file.into(),
            line,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_keys_distinguish_overloads() {
        let a = decl_key(
            "ns::f",
            Some(&function_signature(&["int".into()], false, false, None)),
        );
        let b = decl_key(
            "ns::f",
            Some(&function_signature(&["double".into()], false, false, None)),
        );
        assert_ne!(a, b);
        assert_eq!(a, "ns::f(int)");
    }

    #[test]
    fn const_qualifier_is_part_of_the_key() {
        let sig = function_signature(&[], true, false, Some("&"));
        assert_eq!(sig, "() const &");
    }

    #[test]
    fn specialization_extends_primary() {
        let primary = decl_key("max", None);
        assert_eq!(specialization_key(&primary, "int"), "max<int>");
    }
}
