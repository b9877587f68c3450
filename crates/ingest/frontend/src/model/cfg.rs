use serde::{Deserialize, Serialize};

use cppgraph_core::CfgEdgeKind;

/// The control-flow graph of one function body, when the front-end can
/// build it. Blocks reference statements by front-end address; the owning
/// function likewise by the address of its declaration node in this TU.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCfg {
    pub function_address: u64,
    pub blocks: Vec<CfgBlockRecord>,
    #[serde(default)]
    pub edges: Vec<CfgEdgeRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CfgBlockRecord {
    /// The front-end's block ordinal, unique within one CFG.
    pub index: u32,
    #[serde(default)]
    pub is_entry: bool,
    #[serde(default)]
    pub is_exit: bool,
    /// Kind of the block's terminating statement, if any.
    #[serde(default)]
    pub terminator_kind: Option<String>,
    /// Statement node addresses, in CFG element order.
    #[serde(default)]
    pub statements: Vec<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CfgEdgeRecord {
    pub from: u32,
    pub to: u32,
    #[serde(default = "fallthrough")]
    pub kind: CfgEdgeKind,
}

fn fallthrough() -> CfgEdgeKind {
    CfgEdgeKind::Fallthrough
}
