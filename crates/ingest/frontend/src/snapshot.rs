//! The snapshot front-end backend.
//!
//! A snapshot is a serde_json-serialized [`ParsedTranslationUnit`] sitting
//! next to the source file it was parsed from (`main.cpp` →
//! `main.cpp.tu.json`). Front-end drivers dump snapshots out of process;
//! test harnesses write them directly. Either way the engine consumes TUs
//! through the same [`FrontEnd`] trait as a live toolchain would use.

use std::fs;
use std::path::{Path, PathBuf};

use cppgraph_error::FrontEndError;
use tracing::debug;

use crate::compile_commands::CompileCommand;
use crate::model::ParsedTranslationUnit;
use crate::FrontEnd;

pub const SNAPSHOT_SUFFIX: &str = ".tu.json";

/// Path of the snapshot belonging to a source file.
pub fn snapshot_path(source: &Path) -> PathBuf {
    let mut os = source.as_os_str().to_owned();
    os.push(SNAPSHOT_SUFFIX);
    PathBuf::from(os)
}

/// Serialize a TU next to its source file. Used by harnesses and by
/// front-end drivers that run the parser out of process.
pub fn write_snapshot(tu: &ParsedTranslationUnit) -> std::io::Result<PathBuf> {
    let path = snapshot_path(&tu.file);
    let json = serde_json::to_vec_pretty(tu)?;
    fs::write(&path, json)?;
    Ok(path)
}

#[derive(Debug, Default)]
pub struct SnapshotFrontEnd {
    _private: (),
}

impl SnapshotFrontEnd {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrontEnd for SnapshotFrontEnd {
    fn parse(&mut self, command: &CompileCommand) -> Result<ParsedTranslationUnit, FrontEndError> {
        let path = snapshot_path(&command.file);
        debug!(target: "frontend", snapshot = %path.display(), "loading TU snapshot");
        let text = fs::read_to_string(&path).map_err(|e| FrontEndError {
            tu: command.file.clone(),
            diagnostics: format!("no snapshot at {}: {e}", path.display()),
        })?;
        serde_json::from_str(&text).map_err(|e| FrontEndError {
            tu: command.file.clone(),
            diagnostics: format!("malformed snapshot {}: {e}", path.display()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AstNode;
    use cppgraph_core::{NodeKind, SourceRange};

    fn tiny_tu(file: PathBuf) -> ParsedTranslationUnit {
        ParsedTranslationUnit {
            directory: file.parent().unwrap().to_path_buf(),
            ast: AstNode {
                address: 1,
                kind: NodeKind::TranslationUnitDecl,
                range: SourceRange::new(file.to_string_lossy(), 1, 0, 1, 0),
                raw_text: None,
                decl: None,
                stmt: None,
                expr: None,
                expanded_from: None,
                children: Vec::new(),
            },
            preprocessor: Default::default(),
            cfgs: Vec::new(),
            file,
        }
    }

    #[test]
    fn snapshot_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("main.cpp");
        std::fs::write(&source, "int main() {}\n").unwrap();

        let tu = tiny_tu(source.clone());
        write_snapshot(&tu).unwrap();

        let mut fe = SnapshotFrontEnd::new();
        let command = CompileCommand {
            directory: dir.path().to_path_buf(),
            file: source,
            arguments: vec!["clang++".into(), "main.cpp".into()],
        };
        let parsed = fe.parse(&command).unwrap();
        assert_eq!(parsed.ast.kind, NodeKind::TranslationUnitDecl);
        assert_eq!(parsed.ast.address, 1);
    }

    #[test]
    fn missing_snapshot_is_a_frontend_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut fe = SnapshotFrontEnd::new();
        let command = CompileCommand {
            directory: dir.path().to_path_buf(),
            file: dir.path().join("absent.cpp"),
            arguments: vec!["clang++".into()],
        };
        let err = fe.parse(&command).unwrap_err();
        assert!(err.diagnostics.contains("no snapshot"));
    }
}
