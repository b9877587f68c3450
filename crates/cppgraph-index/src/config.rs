use std::path::PathBuf;
use std::time::Duration;

/// Resolved run configuration. CLI flags and environment overrides are
/// folded in before this struct exists; the driver never reads the
/// environment itself.
#[derive(Debug, Clone)]
pub struct IndexerConfig {
    pub compile_db: PathBuf,
    pub output_db: PathBuf,
    pub overwrite: bool,
    /// Worker count; `None` means hardware threads minus one.
    pub threads: Option<usize>,
    /// Per-TU wall-clock budget.
    pub tu_timeout: Duration,
    pub fail_fast: bool,
    /// Front-end backend name; resolved through
    /// [`cppgraph_frontend::frontend_factory`].
    pub frontend: String,
}

impl IndexerConfig {
    pub fn new(compile_db: PathBuf, output_db: PathBuf) -> Self {
        Self {
            compile_db,
            output_db,
            overwrite: false,
            threads: None,
            tu_timeout: Duration::from_secs(300),
            fail_fast: false,
            frontend: "snapshot".to_owned(),
        }
    }

    pub fn worker_count(&self) -> usize {
        self.threads.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get().saturating_sub(1))
                .unwrap_or(1)
                .max(1)
        })
    }
}

/// Environment variable overriding the compilation-database path; used by
/// test harnesses that cannot change the command line.
pub const ENV_COMPILE_DB: &str = "INDEXER_COMPILE_DB";

/// Environment variable seeding the log filter (`error|warn|info|debug`).
pub const ENV_LOG_LEVEL: &str = "INDEXER_LOG_LEVEL";

/// Environment variable pinning `created_at` in the manifest, for
/// reproducible runs.
pub const ENV_SOURCE_DATE_EPOCH: &str = "SOURCE_DATE_EPOCH";
