//! Batched writes.
//!
//! A batch buffers rows per relation and commits them as one chained
//! script, so a TU lands atomically: readers see all of it or none of it.
//! Edge endpoints are not validated at append time; closure is the
//! stitcher's concern.

use std::collections::BTreeMap;

use cozo::DataValue;
use itertools::Itertools;
use tracing::debug;

use cppgraph_error::StoreError;

use crate::store::GraphStore;

pub struct Batch {
    store: GraphStore,
    /// relation → (put script template param name deferred to commit, rows)
    puts: BTreeMap<&'static str, PendingPut>,
    row_count: usize,
}

struct PendingPut {
    /// `script_put` output with a placeholder parameter name patched in at
    /// commit time.
    script_for: fn(&str) -> String,
    rows: Vec<DataValue>,
}

impl Batch {
    pub(crate) fn new(store: GraphStore) -> Self {
        Self {
            store,
            puts: BTreeMap::new(),
            row_count: 0,
        }
    }

    /// Append one row (already in column order) for `relation`.
    pub fn append(&mut self, relation: &'static str, script_for: fn(&str) -> String, row: Vec<DataValue>) {
        let entry = self.puts.entry(relation).or_insert_with(|| PendingPut {
            script_for,
            rows: Vec::new(),
        });
        entry.rows.push(DataValue::List(row));
        self.row_count += 1;
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Commit everything buffered in one store transaction. On error the
    /// whole batch is gone; the caller decides whether to rebuild and
    /// retry.
    pub fn commit(self) -> Result<(), StoreError> {
        if self.row_count == 0 {
            return Ok(());
        }

        let mut params: BTreeMap<String, DataValue> = BTreeMap::new();
        let script = self
            .puts
            .into_iter()
            .enumerate()
            .map(|(i, (_, put))| {
                let param = format!("rows_{i}");
                let block = format!("{{ {} }}", (put.script_for)(&param));
                params.insert(param, DataValue::List(put.rows));
                block
            })
            .join("\n");

        debug!(target: "db", rows = self.row_count, "committing batch");
        let _guard = self.store.lock_commits();
        self.store
            .run_mutable_with(&script, params)
            .map_err(StoreError::from)?;
        Ok(())
    }
}
