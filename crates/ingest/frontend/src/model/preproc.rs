use serde::{Deserialize, Serialize};

use cppgraph_core::{ConditionalDirectiveKind, MacroKey, SourceRange};

/// Everything the preprocessor saw while building one TU.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreprocessorRecord {
    #[serde(default)]
    pub macros: Vec<MacroDefinitionRecord>,
    #[serde(default)]
    pub includes: Vec<IncludeRecord>,
    #[serde(default)]
    pub conditionals: Vec<ConditionalRecord>,
    #[serde(default)]
    pub pragmas: Vec<PragmaRecord>,
    #[serde(default)]
    pub comments: Vec<CommentRecord>,
    /// Every macro use whose tokens went into the TU.
    #[serde(default)]
    pub expansions: Vec<ExpansionRecord>,
}

/// One `#define`, object- or function-like, including predefined and
/// builtin macros when the front-end records them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MacroDefinitionRecord {
    pub name: String,
    pub file: String,
    pub line: u32,
    #[serde(default)]
    pub is_function_like: bool,
    #[serde(default)]
    pub parameters: Vec<String>,
    #[serde(default)]
    pub replacement: String,
    #[serde(default)]
    pub is_builtin: bool,
    /// Defined under a conditional-compilation branch.
    #[serde(default)]
    pub is_conditional: bool,
}

impl MacroDefinitionRecord {
    pub fn key(&self) -> MacroKey {
        MacroKey::new(self.name.clone(), self.file.clone(), self.line)
    }
}

/// One textual `#include` occurrence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncludeRecord {
    /// The path as written between the delimiters.
    pub path: String,
    pub including_file: String,
    pub line: u32,
    #[serde(default)]
    pub is_system: bool,
    #[serde(default)]
    pub is_angled: bool,
    /// 0 for includes written in the TU's main file.
    #[serde(default)]
    pub depth: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionalRecord {
    pub kind: ConditionalDirectiveKind,
    pub file: String,
    pub line: u32,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub branch_taken: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PragmaRecord {
    pub text: String,
    pub file: String,
    pub line: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRecord {
    pub range: SourceRange,
    pub text: String,
    #[serde(default)]
    pub is_documentation: bool,
}

/// One macro use. Position is where the use appears; the definition fields
/// identify which macro expanded there.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpansionRecord {
    pub macro_name: String,
    pub definition_file: String,
    pub definition_line: u32,
    pub file: String,
    pub line: u32,
    pub col: u32,
    #[serde(default)]
    pub context: Option<String>,
}

impl ExpansionRecord {
    pub fn macro_key(&self) -> MacroKey {
        MacroKey::new(
            self.macro_name.clone(),
            self.definition_file.clone(),
            self.definition_line,
        )
    }
}
