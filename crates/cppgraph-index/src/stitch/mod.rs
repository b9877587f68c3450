//! The cross-TU stitcher. Runs single-threaded after the worker pool
//! drains: resolves deferred edges, validates duplicate-declaration
//! sightings, and verifies the global invariants.

pub mod verify;

use std::collections::BTreeMap;

use tracing::{info, warn};

use cppgraph_core::IdentityService;
use cppgraph_error::{DeferredResolutionMiss, Error, Result};
use cppgraph_extract::graph::{DeclSighting, DeferredEdge, DeferredEdgeKind, Edge};
use cppgraph_transform::{append_edge, GraphStore};

pub use verify::{verify_invariants, InvariantCheck, InvariantReport};

#[derive(Debug)]
pub struct StitchOutcome {
    pub resolved_edges: usize,
    pub dropped_edges: usize,
    pub duplicate_keys: usize,
    pub warnings: Vec<String>,
    pub report: InvariantReport,
}

pub fn run_stitcher(
    store: &GraphStore,
    ids: &IdentityService,
    mut deferred: Vec<DeferredEdge>,
    sightings: Vec<DeclSighting>,
    tu_failures: usize,
) -> Result<StitchOutcome> {
    let mut warnings = Vec::new();

    // Deterministic application order, whatever order the TUs finished in.
    deferred.sort_by(|a, b| {
        a.origin
            .sort_key()
            .cmp(&b.origin.sort_key())
            .then_with(|| a.kind.name().cmp(b.kind.name()))
            .then_with(|| a.target_key.cmp(&b.target_key))
    });

    let mut batch = store.begin_batch();
    let mut resolved = 0usize;
    let mut dropped = 0usize;

    for d in &deferred {
        match ids.lookup_decl(&d.target_key) {
            Some(target) => {
                let edge = materialize(d, target);
                append_edge(&mut batch, &edge);
                resolved += 1;
            }
            None => {
                let miss = DeferredResolutionMiss {
                    edge_kind: d.kind.name(),
                    from: d.from.as_u64(),
                    target_key: d.target_key.clone(),
                };
                warn!(target: "stitch", %miss, "dropping unresolvable deferred edge");
                warnings.push(miss.to_string());
                dropped += 1;
            }
        }
    }
    batch.commit().map_err(Error::Store)?;

    let duplicate_keys = validate_sightings(sightings, &mut warnings);

    let report = verify_invariants(store)?;
    for check in report.failed() {
        let violation = check.to_violation();
        // A failed TU can leave interned entities whose rows were rolled
        // back with its batch; closure invariants cannot be judged on such
        // a run, which is already marked failed.
        if violation.fatal && tu_failures == 0 {
            return Err(Error::Invariant(violation));
        }
        warn!(target: "stitch", %violation, "invariant violation");
        warnings.push(violation.to_string());
    }

    info!(target: "stitch", resolved, dropped, duplicate_keys, "stitching complete");
    Ok(StitchOutcome {
        resolved_edges: resolved,
        dropped_edges: dropped,
        duplicate_keys,
        warnings,
        report,
    })
}

fn materialize(d: &DeferredEdge, target: cppgraph_core::NodeId) -> Edge {
    match &d.kind {
        DeferredEdgeKind::Overrides => Edge::Overrides {
            method: d.from,
            overridden: target,
        },
        DeferredEdgeKind::InheritsFrom { access, is_virtual } => Edge::InheritsFrom {
            derived: d.from,
            base: target,
            access: *access,
            is_virtual: *is_virtual,
        },
        DeferredEdgeKind::Specializes {
            template_arguments,
            kind,
        } => Edge::Specializes {
            specialization: d.from,
            primary: target,
            template_arguments: template_arguments.clone(),
            kind: *kind,
        },
        DeferredEdgeKind::TemplateInstantiation => Edge::TemplateRelation {
            source: d.from,
            target,
            relation_kind: "instantiates",
        },
    }
}

/// Check agreement between duplicate sightings of one canonical key.
/// The rows themselves were folded at intern time (first writer wins);
/// what is left is to order the sightings deterministically and surface
/// disagreements.
fn validate_sightings(sightings: Vec<DeclSighting>, warnings: &mut Vec<String>) -> usize {
    let mut by_key: BTreeMap<String, Vec<DeclSighting>> = BTreeMap::new();
    for s in sightings {
        by_key.entry(s.key.clone()).or_default().push(s);
    }

    let mut duplicate_keys = 0usize;
    for (key, mut group) in by_key {
        if group.len() < 2 {
            continue;
        }
        duplicate_keys += 1;
        group.sort_by(|a, b| a.range.sort_key().cmp(&b.range.sort_key()));

        // The positionally-first sighting is the canonical one. A row that
        // was written from a later sighting still refers to the same
        // entity, but its recorded position is scheduling-dependent; make
        // that visible.
        let canonical = &group[0];
        if !canonical.emitted {
            let msg = format!(
                "declaration `{key}`: stored row does not come from the first sighting at {}:{}",
                canonical.range.file, canonical.range.start_line
            );
            warn!(target: "stitch", "{msg}");
            warnings.push(msg);
        }

        let definitions = group.iter().filter(|s| s.is_definition).count();
        if definitions > 1 {
            let msg = format!(
                "declaration `{key}` has {definitions} definitions across translation units"
            );
            warn!(target: "stitch", "{msg}");
            warnings.push(msg);
        }
    }
    duplicate_keys
}
