//! Workspace-wide error types for the cppgraph indexer.
//!
//! One [`Error`] enum shared across crates, with a coarse [`Severity`]
//! classification so callers can decide programmatically whether a failure
//! ends the run, the translation unit, or is merely logged. Library code
//! returns [`Result`] and propagates with `?`; the binary maps the final
//! error to an exit code.

pub mod severity;

pub use severity::Severity;

use std::path::PathBuf;

/// Workspace-wide result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Top-level error for the indexer run.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Argument(#[from] ArgumentError),
    #[error(transparent)]
    FrontEnd(#[from] FrontEndError),
    #[error("front-end toolchain `{0}` is not available")]
    MissingFrontEnd(String),
    #[error(transparent)]
    Timeout(#[from] TimeoutError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
    #[error(transparent)]
    DeferredMiss(#[from] DeferredResolutionMiss),
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn severity(&self) -> Severity {
        match self {
            Error::Argument(_)
            | Error::MissingFrontEnd(_)
            | Error::SchemaMismatch(_)
            | Error::Internal(_) => Severity::Fatal,
            Error::Store(e) => e.severity(),
            Error::Invariant(v) if v.fatal => Severity::Fatal,
            Error::Invariant(_) => Severity::Warning,
            Error::DeferredMiss(_) => Severity::Warning,
            Error::FrontEnd(_) | Error::Timeout(_) => Severity::Error,
        }
    }

    pub fn is_warning(&self) -> bool {
        self.severity() == Severity::Warning
    }
}

/// Malformed CLI input, a missing compilation database, or a path that
/// cannot be made absolute.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ArgumentError {
    #[error("compilation database not found: {path}")]
    CompileDbNotFound { path: PathBuf },
    #[error("failed to parse compilation database {path}: {message}")]
    CompileDbParse { path: PathBuf, message: String },
    #[error("cannot resolve {file} against directory {directory}")]
    UnresolvablePath { file: String, directory: String },
    #[error("output database {path} already exists (pass --overwrite to replace it)")]
    OutputExists { path: PathBuf },
    #[error("{0}")]
    Invalid(String),
}

/// The front-end rejected a translation unit.
#[derive(Debug, Clone, thiserror::Error)]
#[error("front-end failed on {tu}: {diagnostics}")]
pub struct FrontEndError {
    pub tu: PathBuf,
    pub diagnostics: String,
}

/// A translation unit exceeded its wall-clock budget.
#[derive(Debug, Clone, thiserror::Error)]
#[error("translation unit {tu} exceeded its {budget_secs}s budget during {phase}")]
pub struct TimeoutError {
    pub tu: PathBuf,
    pub budget_secs: u64,
    pub phase: &'static str,
}

/// I/O or serialization failure from the store adapter. Transient errors
/// are retried once by the TU pipeline; fatal ones abort the batch.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    #[error("transient store error: {0}")]
    Transient(String),
    #[error("store error: {0}")]
    Fatal(String),
}

impl StoreError {
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Transient(_))
    }

    fn severity(&self) -> Severity {
        match self {
            StoreError::Transient(_) => Severity::Error,
            StoreError::Fatal(_) => Severity::Fatal,
        }
    }
}

/// A global invariant did not hold during stitching. Identity, type
/// closure, and canonical-type uniqueness end the run; the rest are
/// logged.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invariant `{name}` violated ({count} rows): {detail}")]
pub struct InvariantViolation {
    pub name: String,
    pub count: usize,
    pub detail: String,
    pub fatal: bool,
}

/// A deferred edge's target canonical key was never interned.
#[derive(Debug, Clone, thiserror::Error)]
#[error("deferred {edge_kind} edge from node {from} dropped: no entity for key `{target_key}`")]
pub struct DeferredResolutionMiss {
    pub edge_kind: &'static str,
    pub from: u64,
    pub target_key: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_split_matches_contract() {
        let fatal = Error::Invariant(InvariantViolation {
            name: "type-closure".into(),
            count: 1,
            detail: "dangling HAS_TYPE target".into(),
            fatal: true,
        });
        assert_eq!(fatal.severity(), Severity::Fatal);

        let warn = Error::DeferredMiss(DeferredResolutionMiss {
            edge_kind: "OVERRIDES",
            from: 42,
            target_key: "Base::speak()".into(),
        });
        assert!(warn.is_warning());

        let transient = Error::Store(StoreError::Transient("disk hiccup".into()));
        assert_eq!(transient.severity(), Severity::Error);
    }
}
