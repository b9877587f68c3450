//! JSON Compilation Database loading.
//!
//! Entries carry `directory`, `file`, and either `command` (one string) or
//! `arguments` (already split). Relative files resolve against the entry's
//! directory; a directory of `"."` resolves against the process CWD. All
//! paths handed to the rest of the engine are absolute.

use cppgraph_error::ArgumentError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// One fully resolved compilation-database entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileCommand {
    /// Absolute working directory of the compiler invocation.
    pub directory: PathBuf,
    /// Absolute path of the translation unit's main file.
    pub file: PathBuf,
    /// Compiler argv, including the compiler itself.
    pub arguments: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    directory: String,
    file: String,
    #[serde(default)]
    command: Option<String>,
    #[serde(default)]
    arguments: Option<Vec<String>>,
}

/// Load and resolve a compilation database.
pub fn load_compile_db(path: &Path) -> Result<Vec<CompileCommand>, ArgumentError> {
    let text = fs::read_to_string(path).map_err(|_| ArgumentError::CompileDbNotFound {
        path: path.to_path_buf(),
    })?;
    let raw: Vec<RawEntry> =
        serde_json::from_str(&text).map_err(|e| ArgumentError::CompileDbParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let cwd = std::env::current_dir().map_err(|e| ArgumentError::Invalid(e.to_string()))?;
    raw.into_iter().map(|e| resolve_entry(e, &cwd)).collect()
}

fn resolve_entry(entry: RawEntry, cwd: &Path) -> Result<CompileCommand, ArgumentError> {
    let directory = absolutize(Path::new(&entry.directory), cwd);
    let file = absolutize(Path::new(&entry.file), &directory);

    let arguments = match (entry.arguments, entry.command) {
        (Some(args), _) if !args.is_empty() => args,
        (_, Some(cmd)) => split_command_line(&cmd),
        _ => {
            return Err(ArgumentError::UnresolvablePath {
                file: entry.file,
                directory: entry.directory,
            })
        }
    };
    if arguments.is_empty() {
        return Err(ArgumentError::Invalid(format!(
            "entry for {} has an empty command line",
            file.display()
        )));
    }

    Ok(CompileCommand {
        directory,
        file,
        arguments,
    })
}

fn absolutize(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else if path == Path::new(".") {
        base.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Split a `command` string the way a POSIX shell tokenizes it: whitespace
/// separates, single and double quotes group, backslash escapes inside
/// double quotes and bare text.
fn split_command_line(cmd: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut chars = cmd.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {
                if in_token {
                    out.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            '\'' => {
                in_token = true;
                for q in chars.by_ref() {
                    if q == '\'' {
                        break;
                    }
                    current.push(q);
                }
            }
            '"' => {
                in_token = true;
                while let Some(q) = chars.next() {
                    match q {
                        '"' => break,
                        '\\' => {
                            if let Some(&next) = chars.peek() {
                                if next == '"' || next == '\\' {
                                    current.push(next);
                                    chars.next();
                                } else {
                                    current.push('\\');
                                }
                            }
                        }
                        other => current.push(other),
                    }
                }
            }
            '\\' => {
                in_token = true;
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            other => {
                in_token = true;
                current.push(other);
            }
        }
    }
    if in_token {
        out.push(current);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_splitting_respects_quotes() {
        let args = split_command_line(r#"g++ -DNAME="two words" -I'inc dir' main.cpp"#);
        assert_eq!(
            args,
            vec!["g++", "-DNAME=two words", "-Iinc dir", "main.cpp"]
        );
    }

    #[test]
    fn relative_file_resolves_against_directory() {
        let entry = RawEntry {
            directory: "/work/build".into(),
            file: "../src/main.cpp".into(),
            command: Some("g++ -c ../src/main.cpp".into()),
            arguments: None,
        };
        let cmd = resolve_entry(entry, Path::new("/elsewhere")).unwrap();
        assert_eq!(cmd.directory, PathBuf::from("/work/build"));
        assert_eq!(cmd.file, PathBuf::from("/work/build/../src/main.cpp"));
        assert!(cmd.file.is_absolute());
    }

    #[test]
    fn dot_directory_resolves_against_cwd() {
        let entry = RawEntry {
            directory: ".".into(),
            file: "main.cpp".into(),
            command: None,
            arguments: Some(vec!["clang++".into(), "main.cpp".into()]),
        };
        let cwd = PathBuf::from("/current");
        let cmd = resolve_entry(entry, &cwd).unwrap();
        assert_eq!(cmd.directory, cwd);
        assert_eq!(cmd.file, PathBuf::from("/current/main.cpp"));
    }

    #[test]
    fn arguments_take_precedence_over_command() {
        let entry = RawEntry {
            directory: "/w".into(),
            file: "a.cpp".into(),
            command: Some("ignored".into()),
            arguments: Some(vec!["g++".into(), "a.cpp".into()]),
        };
        let cmd = resolve_entry(entry, Path::new("/")).unwrap();
        assert_eq!(cmd.arguments[0], "g++");
    }

    #[test]
    fn entry_without_any_command_is_rejected() {
        let entry = RawEntry {
            directory: "/w".into(),
            file: "a.cpp".into(),
            command: None,
            arguments: None,
        };
        assert!(resolve_entry(entry, Path::new("/")).is_err());
    }
}
