//! The run driver: reads the compilation database, fans TUs out over a
//! rayon pool, then hands the collected deferred edges and sightings to
//! the stitcher and writes the manifest.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel::unbounded;
use tracing::{error, info, warn};

use cppgraph_core::IdentityService;
use cppgraph_error::{Error, Result};
use cppgraph_frontend::{frontend_factory, load_compile_db, CompileCommand};
use cppgraph_transform::GraphStore;

use crate::config::IndexerConfig;
use crate::manifest::{common_source_root, creation_timestamp, Manifest, TuFailure};
use crate::pipeline::{run_tu, TuOutcome};
use crate::stitch::run_stitcher;

/// What the CLI reports after a run.
#[derive(Debug)]
pub struct RunSummary {
    pub indexed: usize,
    pub failed: usize,
    pub warnings: usize,
    pub manifest_path: PathBuf,
}

impl RunSummary {
    pub fn line(&self) -> String {
        format!(
            "{} TUs indexed, {} failed, {} warnings",
            self.indexed, self.failed, self.warnings
        )
    }
}

pub fn run_indexer(config: &IndexerConfig) -> Result<RunSummary> {
    let commands = load_compile_db(&config.compile_db).map_err(Error::Argument)?;
    let commands = dedup_entries(commands);
    if commands.is_empty() {
        return Err(Error::Argument(cppgraph_error::ArgumentError::Invalid(
            "compilation database has no entries".into(),
        )));
    }

    let frontend = frontend_factory(&config.frontend)
        .ok_or_else(|| Error::MissingFrontEnd(config.frontend.clone()))?;

    let store = GraphStore::create(&config.output_db, config.overwrite)?;
    let ids = IdentityService::new();
    let cancel = AtomicBool::new(false);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.worker_count())
        .build()
        .map_err(|e| Error::Internal(e.to_string()))?;

    info!(target: "pipeline",
        tus = commands.len(), workers = config.worker_count(),
        "starting indexing run");

    let (tx, rx) = unbounded::<TuOutcome>();
    pool.scope(|scope| {
        for (index, command) in commands.iter().enumerate() {
            let tx = tx.clone();
            let (ids, store, frontend, cancel, config) =
                (&ids, &store, &frontend, &cancel, config);
            scope.spawn(move |_| {
                if cancel.load(Ordering::Relaxed) {
                    return;
                }
                let result = run_tu(
                    config,
                    ids,
                    store,
                    frontend,
                    cancel,
                    index as u32,
                    command,
                );
                if result.is_err() && config.fail_fast {
                    cancel.store(true, Ordering::Relaxed);
                }
                let _ = tx.send(TuOutcome {
                    index: index as u32,
                    file: command.file.clone(),
                    result,
                });
            });
        }
    });
    drop(tx);

    let mut outcomes: Vec<TuOutcome> = rx.into_iter().collect();
    outcomes.sort_by_key(|o| o.index);

    let mut deferred = Vec::new();
    let mut sightings = Vec::new();
    let mut failures: Vec<TuFailure> = Vec::new();
    let mut indexed = 0usize;
    let mut tu_warnings = 0usize;

    for outcome in &outcomes {
        match &outcome.result {
            Ok(stats) => {
                indexed += 1;
                deferred.extend(stats.deferred.iter().cloned());
                sightings.extend(stats.sightings.iter().cloned());
                tu_warnings += (stats.dropped_expansions + stats.missing_cfgs) as usize;
            }
            Err(e) => {
                error!(target: "pipeline", tu = %outcome.file.display(), error = %e,
                    "translation unit failed");
                failures.push(TuFailure {
                    file: outcome.file.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    if config.fail_fast {
        let mut errs: Vec<Error> = outcomes.into_iter().filter_map(|o| o.result.err()).collect();
        // TUs cancelled after the triggering failure also report errors;
        // surface the real one.
        let real = errs
            .iter()
            .position(|e| !matches!(e, Error::Internal(m) if m == "run cancelled"));
        if let Some(pos) = real {
            return Err(errs.swap_remove(pos));
        }
        if let Some(e) = errs.pop() {
            return Err(e);
        }
    }

    let stitch = run_stitcher(&store, &ids, deferred, sightings, failures.len())?;

    let warnings = tu_warnings + stitch.warnings.len();
    let files: Vec<PathBuf> = commands.iter().map(|c| c.file.clone()).collect();
    let manifest = Manifest {
        version: env!("CARGO_PKG_VERSION").to_owned(),
        created_at: creation_timestamp(),
        source_root: common_source_root(&files),
        tu_count: commands.len(),
        ids_issued: ids.issued(),
        invariant_report: stitch.report,
        failures,
        warnings,
    };
    let manifest_path = manifest.write(&config.output_db)?;

    Ok(RunSummary {
        indexed,
        failed: manifest.failures.len(),
        warnings,
        manifest_path,
    })
}

/// Drop duplicate entries for the same resolved file, keeping the first.
/// Indexing the same TU twice would only re-prove idempotence the interner
/// already guarantees, at full parse cost.
fn dedup_entries(commands: Vec<CompileCommand>) -> Vec<CompileCommand> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::with_capacity(commands.len());
    for c in commands {
        if seen.insert(c.file.clone()) {
            out.push(c);
        } else {
            warn!(target: "pipeline", file = %c.file.display(),
                "duplicate compilation-database entry skipped");
        }
    }
    out
}

/// Exit code for a run-level error, per the CLI contract.
pub fn exit_code(err: &Error) -> i32 {
    match err {
        Error::Argument(_) => 2,
        Error::MissingFrontEnd(_) => 3,
        Error::SchemaMismatch(_) => 4,
        _ => 1,
    }
}
