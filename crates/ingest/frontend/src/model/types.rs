use serde::{Deserialize, Serialize};

/// A type as the front-end reports it at some use site. `spelling` keeps
/// the sugar (`size_t`, `const String &`); `canonical` is the deduplication
/// key with typedefs resolved and sugar stripped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRef {
    pub spelling: String,
    /// Defaults to `spelling` when the front-end reports no distinct
    /// canonical form.
    #[serde(default)]
    pub canonical: Option<String>,
    #[serde(default)]
    pub is_builtin: bool,
    #[serde(default)]
    pub is_const: bool,
    #[serde(default)]
    pub is_volatile: bool,
    #[serde(default)]
    pub size_bytes: Option<u64>,
}

impl TypeRef {
    pub fn named(spelling: impl Into<String>) -> Self {
        Self {
            spelling: spelling.into(),
            canonical: None,
            is_builtin: false,
            is_const: false,
            is_volatile: false,
            size_bytes: None,
        }
    }

    pub fn builtin(spelling: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            spelling: spelling.into(),
            canonical: None,
            is_builtin: true,
            is_const: false,
            is_volatile: false,
            size_bytes: Some(size_bytes),
        }
    }

    pub fn canonical_spelling(&self) -> &str {
        self.canonical.as_deref().unwrap_or(&self.spelling)
    }
}
