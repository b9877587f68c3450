use serde::{Deserialize, Serialize};

use cppgraph_core::keys;
use cppgraph_core::{
    AccessSpecifier, NodeKind, SpecializationKind, StorageClass, TemplateParameterKind, UsingKind,
};

use super::types::TypeRef;

/// Declaration payload attached to decl-category AST nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeclData {
    pub name: String,
    /// Fully qualified name, without template arguments.
    pub qualified_name: String,
    /// Enclosing namespace path, `""` at global scope.
    #[serde(default)]
    pub namespace_context: String,
    #[serde(default = "access_none")]
    pub access: AccessSpecifier,
    #[serde(default = "storage_none")]
    pub storage_class: StorageClass,
    #[serde(default)]
    pub is_definition: bool,
    /// Type of the declared entity (variables, fields, aliases).
    #[serde(default)]
    pub declared_type: Option<TypeRef>,
    /// Function return type.
    #[serde(default)]
    pub return_type: Option<TypeRef>,
    /// Function parameter types, in order.
    #[serde(default)]
    pub parameter_types: Vec<TypeRef>,
    /// Method cv/ref qualifiers; part of the canonical key.
    #[serde(default)]
    pub is_const: bool,
    #[serde(default)]
    pub is_volatile: bool,
    #[serde(default)]
    pub ref_qualifier: Option<String>,
    #[serde(default)]
    pub is_virtual: bool,
    /// Base classes of a record.
    #[serde(default)]
    pub bases: Vec<BaseSpecifier>,
    /// Every method this method overrides, including through multiple
    /// inheritance, as reported by the front-end.
    #[serde(default)]
    pub overrides: Vec<DeclRef>,
    #[serde(default)]
    pub template: Option<TemplateData>,
    /// Set on using declarations / directives / aliases.
    #[serde(default)]
    pub using_kind: Option<UsingKind>,
    #[serde(default)]
    pub using_target: Option<String>,
}

fn access_none() -> AccessSpecifier {
    AccessSpecifier::None
}

fn storage_none() -> StorageClass {
    StorageClass::None
}

impl DeclData {
    /// Signature fragment for function-like declarations.
    pub fn signature(&self) -> String {
        let params: Vec<String> = self
            .parameter_types
            .iter()
            .map(|t| t.canonical_spelling().to_owned())
            .collect();
        keys::function_signature(
            &params,
            self.is_const,
            self.is_volatile,
            self.ref_qualifier.as_deref(),
        )
    }

    /// The canonical identity key deduplicating this declaration across
    /// translation units. Template specializations key off their primary.
    pub fn canonical_key(&self, kind: &NodeKind) -> String {
        let base = if kind.is_function_like() {
            keys::decl_key(&self.qualified_name, Some(&self.signature()))
        } else {
            keys::decl_key(&self.qualified_name, None)
        };
        match &self.template {
            Some(t) if t.specialization_kind.is_some() => {
                let primary = t
                    .primary
                    .as_ref()
                    .map(DeclRef::key)
                    .unwrap_or_else(|| base.clone());
                let args = t.template_arguments.as_deref().unwrap_or("");
                keys::specialization_key(&primary, args)
            }
            _ => base,
        }
    }
}

/// Reference to another declaration by canonical-key parts. Used for base
/// classes, override targets, and primary templates — places where the
/// referent may live in a translation unit indexed later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclRef {
    pub qualified_name: String,
    #[serde(default)]
    pub signature: Option<String>,
}

impl DeclRef {
    pub fn new(qualified_name: impl Into<String>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            signature: None,
        }
    }

    pub fn with_signature(qualified_name: impl Into<String>, signature: impl Into<String>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            signature: Some(signature.into()),
        }
    }

    pub fn key(&self) -> String {
        keys::decl_key(&self.qualified_name, self.signature.as_deref())
    }
}

/// One base-class specifier of a record declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseSpecifier {
    pub base: DeclRef,
    pub access: AccessSpecifier,
    #[serde(default)]
    pub is_virtual: bool,
}

/// Template-related payload: parameters on a template declaration,
/// primary/arguments on specializations and instantiations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateData {
    #[serde(default)]
    pub parameters: Vec<TemplateParameterData>,
    /// The primary template, set on specializations.
    #[serde(default)]
    pub primary: Option<DeclRef>,
    #[serde(default)]
    pub specialization_kind: Option<SpecializationKind>,
    /// Canonical spelling of the template arguments, e.g. `"int"`.
    #[serde(default)]
    pub template_arguments: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateParameterData {
    pub kind: TemplateParameterKind,
    pub name: String,
    #[serde(default)]
    pub is_parameter_pack: bool,
    #[serde(default)]
    pub default_argument: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method(qname: &str, params: Vec<TypeRef>) -> DeclData {
        DeclData {
            name: qname.rsplit("::").next().unwrap().to_owned(),
            qualified_name: qname.to_owned(),
            namespace_context: String::new(),
            access: AccessSpecifier::Public,
            storage_class: StorageClass::None,
            is_definition: true,
            declared_type: None,
            return_type: None,
            parameter_types: params,
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

    #[test]
    fn method_key_includes_signature() {
        let d = method("Dog::speak", Vec::new());
        assert_eq!(d.canonical_key(&NodeKind::CXXMethodDecl), "Dog::speak()");
    }

    #[test]
    fn record_key_is_bare_qualified_name() {
        let d = method("Dog", Vec::new());
        assert_eq!(d.canonical_key(&NodeKind::CXXRecordDecl), "Dog");
    }

    #[test]
    fn implicit_instantiation_keys_off_primary() {
        let mut d = method("max", vec![TypeRef::named("T"), TypeRef::named("T")]);
        d.template = Some(TemplateData {
            parameters: Vec::new(),
            primary: Some(DeclRef::new("max")),
            specialization_kind: Some(SpecializationKind::Implicit),
            template_arguments: Some("int".into()),
        });
        assert_eq!(d.canonical_key(&NodeKind::FunctionDecl), "max<int>");
    }
}
