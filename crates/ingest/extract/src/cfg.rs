//! The CFG extractor.
//!
//! Emission is best-effort: a CFG whose owning function the AST pass never
//! saw is skipped with a warning, and a function body without a CFG is
//! counted against the TU. Reachability is recomputed from the entry block
//! rather than trusted, and any edge that closes a cycle is re-labeled
//! `back_edge` whatever the front-end called it.

use std::collections::{HashMap, HashSet};
use tracing::warn;

use cppgraph_core::{CfgEdgeKind, NodeId};
use cppgraph_frontend::model::{FunctionCfg, ParsedTranslationUnit};

use crate::graph::{CfgBlockRow, Edge};
use crate::state::ExtractorState;

pub fn extract_cfgs(state: &mut ExtractorState, tu: &ParsedTranslationUnit) {
    let mut covered: HashSet<NodeId> = HashSet::new();

    for cfg in &tu.cfgs {
        let Some(function_id) = state.id_for_address(cfg.function_address) else {
            warn!(target: "extract", address = cfg.function_address,
                "CFG for a function node the AST pass never visited, skipped");
            continue;
        };
        // A body walked by an earlier TU already has its CFG.
        if !state.owned_bodies.contains(&function_id) {
            continue;
        }
        covered.insert(function_id);
        emit_one(state, cfg, function_id);
    }

    let missing = state.owned_bodies.len() - covered.len();
    if missing > 0 {
        warn!(target: "extract", missing, tu = %state.tu_file,
            "function bodies without a front-end CFG");
        state.graph.missing_cfgs += missing as u32;
    }
}

fn emit_one(state: &mut ExtractorState, cfg: &FunctionCfg, function_id: NodeId) {
    let entry = cfg
        .blocks
        .iter()
        .find(|b| b.is_entry)
        .or_else(|| cfg.blocks.iter().min_by_key(|b| b.index))
        .map(|b| b.index);

    let mut successors: HashMap<u32, Vec<u32>> = HashMap::new();
    for e in &cfg.edges {
        successors.entry(e.from).or_default().push(e.to);
    }

    let reachable = reachable_from(entry, &successors);
    let back_edges = find_back_edges(cfg, entry, &successors);

    let mut block_ids: HashMap<u32, NodeId> = HashMap::new();
    let mut ordered: Vec<_> = cfg.blocks.iter().collect();
    ordered.sort_by_key(|b| b.index);

    for block in &ordered {
        let id = state.ids.fresh();
        block_ids.insert(block.index, id);
        state.graph.cfg_blocks.push(CfgBlockRow {
            id,
            function_id,
            block_index: block.index,
            is_entry_block: block.is_entry,
            is_exit_block: block.is_exit,
            terminator_kind: block.terminator_kind.clone(),
            reachable: reachable.contains(&block.index),
        });
        state.graph.edges.push(Edge::ContainsCfg {
            function: function_id,
            block: id,
        });

        for (i, stmt_addr) in block.statements.iter().enumerate() {
            match state.id_for_address(*stmt_addr) {
                Some(stmt) => state.graph.edges.push(Edge::CfgContainsStmt {
                    block: id,
                    stmt,
                    stmt_index: i as u32,
                }),
                None => warn!(target: "extract", address = stmt_addr,
                    "CFG element references an unknown statement, skipped"),
            }
        }
    }

    for e in &cfg.edges {
        let (Some(&from), Some(&to)) = (block_ids.get(&e.from), block_ids.get(&e.to)) else {
            warn!(target: "extract", from = e.from, to = e.to,
                "CFG edge references an unknown block, skipped");
            continue;
        };
        let kind = if back_edges.contains(&(e.from, e.to)) {
            CfgEdgeKind::BackEdge
        } else {
            e.kind
        };
        state.graph.edges.push(Edge::CfgEdge { from, to, kind });
    }
}

fn reachable_from(entry: Option<u32>, successors: &HashMap<u32, Vec<u32>>) -> HashSet<u32> {
    let mut seen = HashSet::new();
    let Some(entry) = entry else {
        return seen;
    };
    let mut stack = vec![entry];
    while let Some(b) = stack.pop() {
        if seen.insert(b) {
            if let Some(next) = successors.get(&b) {
                stack.extend(next.iter().copied());
            }
        }
    }
    seen
}

/// DFS three-color walk; an edge into a block still on the stack closes a
/// cycle.
fn find_back_edges(
    cfg: &FunctionCfg,
    entry: Option<u32>,
    successors: &HashMap<u32, Vec<u32>>,
) -> HashSet<(u32, u32)> {
    #[derive(Clone, Copy, PartialEq)]
    enum Color {
        White,
        Gray,
        Black,
    }

    let mut color: HashMap<u32, Color> = cfg.blocks.iter().map(|b| (b.index, Color::White)).collect();
    let mut back = HashSet::new();

    let mut roots: Vec<u32> = Vec::new();
    roots.extend(entry);
    let mut rest: Vec<u32> = cfg.blocks.iter().map(|b| b.index).collect();
    rest.sort_unstable();
    roots.extend(rest);

    for root in roots {
        if color.get(&root) != Some(&Color::White) {
            continue;
        }
        // (block, next successor position)
        let mut stack: Vec<(u32, usize)> = vec![(root, 0)];
        color.insert(root, Color::Gray);
        while let Some((block, pos)) = stack.last().copied() {
            let succ = successors.get(&block).map(Vec::as_slice).unwrap_or(&[]);
            if pos < succ.len() {
                if let Some(frame) = stack.last_mut() {
                    frame.1 += 1;
                }
                let next = succ[pos];
                match color.get(&next).copied() {
                    Some(Color::Gray) => {
                        back.insert((block, next));
                    }
                    Some(Color::White) => {
                        color.insert(next, Color::Gray);
                        stack.push((next, 0));
                    }
                    _ => {}
                }
            } else {
                color.insert(block, Color::Black);
                stack.pop();
            }
        }
    }
    back
}

#[cfg(test)]
mod tests {
    use super::*;
    use cppgraph_frontend::model::{CfgBlockRecord, CfgEdgeRecord};

    fn block(index: u32, entry: bool, exit: bool) -> CfgBlockRecord {
        CfgBlockRecord {
            index,
            is_entry: entry,
            is_exit: exit,
            terminator_kind: None,
            statements: Vec::new(),
        }
    }

    fn edge(from: u32, to: u32) -> CfgEdgeRecord {
        CfgEdgeRecord {
            from,
            to,
            kind: CfgEdgeKind::Fallthrough,
        }
    }

    #[test]
    fn loop_edge_is_detected_as_back_edge() {
        // entry -> header -> body -> header (cycle), header -> exit
        let cfg = FunctionCfg {
            function_address: 1,
            blocks: vec![
                block(0, true, false),
                block(1, false, false),
                block(2, false, false),
                block(3, false, true),
            ],
            edges: vec![edge(0, 1), edge(1, 2), edge(2, 1), edge(1, 3)],
        };
        let mut successors: HashMap<u32, Vec<u32>> = HashMap::new();
        for e in &cfg.edges {
            successors.entry(e.from).or_default().push(e.to);
        }
        let back = find_back_edges(&cfg, Some(0), &successors);
        assert_eq!(back, HashSet::from([(2, 1)]));
    }

    #[test]
    fn unreachable_block_is_not_reached() {
        let mut successors: HashMap<u32, Vec<u32>> = HashMap::new();
        successors.insert(0, vec![1]);
        let reachable = reachable_from(Some(0), &successors);
        assert!(reachable.contains(&1));
        assert!(!reachable.contains(&7));
    }
}
