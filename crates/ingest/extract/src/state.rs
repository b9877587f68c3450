use fxhash::{FxHashMap, FxHashSet};
use std::collections::HashSet;

use cppgraph_core::{IdentityService, NodeId, ScopeKind, SourceRange, TuIndex};

use crate::graph::TuGraph;

/// Shared mutable state for one TU's extractor passes. Owns the growing
/// [`TuGraph`]; the identity service is the only thing shared with other
/// workers.
pub struct ExtractorState<'a> {
    pub ids: &'a IdentityService,
    pub tu: TuIndex,
    /// Absolute path of the TU's main file, as a string for row fields.
    pub tu_file: String,
    pub graph: TuGraph,
    /// Front-end address → interned id, for this TU only.
    pub(crate) addr_to_id: FxHashMap<u64, NodeId>,
    /// Ranges of every emitted AST node, for closest-enclosing-node lookup
    /// when linking macro expansions.
    pub(crate) node_ranges: Vec<(SourceRange, NodeId)>,
    /// Stack of enclosing scope-forming nodes during the AST walk.
    pub(crate) scope_stack: Vec<(NodeId, ScopeKind)>,
    /// Guards against emitting the same `MACRO_EXPANSION` pair twice when
    /// both the node flag and the preprocessor record report it.
    pub(crate) expansion_pairs: HashSet<(NodeId, NodeId)>,
    /// Function-like declarations whose body this TU walked. Only these get
    /// CFGs emitted here; duplicate definitions in later TUs are skipped.
    pub(crate) owned_bodies: FxHashSet<NodeId>,
}

impl<'a> ExtractorState<'a> {
    pub fn new(ids: &'a IdentityService, tu: TuIndex, tu_file: impl Into<String>) -> Self {
        Self {
            ids,
            tu,
            tu_file: tu_file.into(),
            graph: TuGraph::default(),
            addr_to_id: FxHashMap::default(),
            node_ranges: Vec::new(),
            scope_stack: Vec::new(),
            expansion_pairs: HashSet::new(),
            owned_bodies: FxHashSet::default(),
        }
    }

    pub fn id_for_address(&self, address: u64) -> Option<NodeId> {
        self.addr_to_id.get(&address).copied()
    }

    pub(crate) fn record_node(&mut self, address: u64, id: NodeId, range: &SourceRange) {
        self.addr_to_id.insert(address, id);
        self.node_ranges.push((range.clone(), id));
    }

    pub(crate) fn current_scope(&self) -> Option<(NodeId, ScopeKind)> {
        self.scope_stack.last().copied()
    }

    /// The id of the node whose range most tightly encloses `file:line:col`.
    /// Ranges tie for macro-expanded nodes that all collapse to one
    /// location; ties go to the latest-recorded (deepest) node.
    pub(crate) fn smallest_enclosing(&self, file: &str, line: u32, col: u32) -> Option<NodeId> {
        let mut best: Option<(&SourceRange, NodeId)> = None;
        for (r, id) in &self.node_ranges {
            if r.file != file || !r.contains_pos(line, col) {
                continue;
            }
            match best {
                Some((b, _)) if r.extent() > b.extent() => {}
                _ => best = Some((r, *id)),
            }
        }
        best.map(|(_, id)| id)
    }

    pub fn into_graph(self) -> TuGraph {
        self.graph
    }
}
