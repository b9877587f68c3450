//! The per-TU pipeline: front-end → extractor passes → one committed
//! batch.
//!
//! Each worker owns its front-end instance and its batch; the identity
//! service is the only shared state. Cancellation and the TU deadline are
//! checked between passes — an in-flight front-end call is never
//! interrupted, it completes or fails on its own.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use tracing::{debug, info_span};

use cppgraph_core::{IdentityService, TuIndex};
use cppgraph_error::{Error, Result, StoreError, TimeoutError};
use cppgraph_extract::graph::{DeclSighting, DeferredEdge};
use cppgraph_extract::{ast, cfg, preproc, types, ExtractorState};
use cppgraph_frontend::{CompileCommand, FrontEndFactory};
use cppgraph_transform::{append_tu_graph, GraphStore};

use crate::config::IndexerConfig;

/// What one successfully indexed TU hands back to the driver.
#[derive(Debug)]
pub struct TuStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub deferred: Vec<DeferredEdge>,
    pub sightings: Vec<DeclSighting>,
    pub dropped_expansions: u32,
    pub missing_cfgs: u32,
    pub duration_ms: u64,
}

pub struct TuOutcome {
    pub index: TuIndex,
    pub file: std::path::PathBuf,
    pub result: Result<TuStats>,
}

struct Deadline {
    started: Instant,
    budget_secs: u64,
}

impl Deadline {
    fn check(&self, command: &CompileCommand, phase: &'static str) -> Result<()> {
        if self.started.elapsed().as_secs() >= self.budget_secs {
            return Err(Error::Timeout(TimeoutError {
                tu: command.file.clone(),
                budget_secs: self.budget_secs,
                phase,
            }));
        }
        Ok(())
    }
}

fn cancelled(cancel: &AtomicBool) -> Result<()> {
    if cancel.load(Ordering::Relaxed) {
        return Err(Error::Internal("run cancelled".into()));
    }
    Ok(())
}

/// Index one translation unit. Partial results are discarded on failure;
/// a transient commit error is retried once.
pub fn run_tu(
    config: &IndexerConfig,
    ids: &IdentityService,
    store: &GraphStore,
    frontend: &FrontEndFactory,
    cancel: &AtomicBool,
    index: TuIndex,
    command: &CompileCommand,
) -> Result<TuStats> {
    let _span = info_span!("tu", file = %command.file.display()).entered();
    let deadline = Deadline {
        started: Instant::now(),
        budget_secs: config.tu_timeout.as_secs(),
    };

    cancelled(cancel)?;

    // One front-end instance per TU, dropped on every exit path.
    let mut fe = (frontend.as_ref())();
    let parsed = fe.parse(command)?;
    deadline.check(command, "parse")?;
    cancelled(cancel)?;

    let mut state = ExtractorState::new(ids, index, command.file.to_string_lossy());

    preproc::extract_preprocessor(&mut state, &parsed);
    deadline.check(command, "preprocessor")?;
    cancelled(cancel)?;

    types::extract_types(&mut state, &parsed);
    deadline.check(command, "types")?;
    cancelled(cancel)?;

    ast::extract_ast(&mut state, &parsed);
    preproc::link_expansions(&mut state, &parsed.preprocessor);
    deadline.check(command, "ast")?;
    cancelled(cancel)?;

    cfg::extract_cfgs(&mut state, &parsed);
    deadline.check(command, "cfg")?;

    let graph = state.into_graph();
    let stats = TuStats {
        node_count: graph.node_count(),
        edge_count: graph.edge_count(),
        deferred: graph.deferred.clone(),
        sightings: graph.sightings.clone(),
        dropped_expansions: graph.dropped_expansions,
        missing_cfgs: graph.missing_cfgs,
        duration_ms: 0,
    };

    commit_with_retry(store, &graph)?;

    debug!(target: "pipeline",
        nodes = stats.node_count, edges = stats.edge_count,
        "TU committed");

    Ok(TuStats {
        duration_ms: deadline.started.elapsed().as_millis() as u64,
        ..stats
    })
}

fn commit_with_retry(store: &GraphStore, graph: &cppgraph_extract::TuGraph) -> Result<()> {
    let mut batch = store.begin_batch();
    append_tu_graph(&mut batch, graph);
    match batch.commit() {
        Ok(()) => Ok(()),
        Err(e @ StoreError::Transient(_)) => {
            debug!(target: "pipeline", error = %e, "transient commit failure, retrying once");
            let mut retry = store.begin_batch();
            append_tu_graph(&mut retry, graph);
            retry.commit().map_err(Error::Store)
        }
        Err(e) => Err(Error::Store(e)),
    }
}
