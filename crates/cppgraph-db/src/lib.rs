//! Read-only query surface over the committed code graph.
//!
//! Analyzers talk to the store exclusively through [`Database`]: raw
//! scripts in the store's query language, always executed immutably. The
//! write path lives in `cppgraph-transform` and is not reachable from
//! here.

mod error;
mod result;

pub use error::DbError;
pub use result::QueryResult;

use cppgraph_transform::GraphStore;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Database {
    store: GraphStore,
}

impl Database {
    pub fn new(store: GraphStore) -> Self {
        Self { store }
    }

    /// Execute a raw read query.
    pub fn raw_query(&self, script: &str) -> Result<QueryResult, DbError> {
        debug!(target: "db", %script, "raw query");
        let named = self
            .store
            .query(script)
            .map_err(|e| DbError::Cozo(e.to_string()))?;
        Ok(QueryResult::from(named))
    }

    /// Run a query expected to produce exactly one integer (count-style).
    pub fn count(&self, script: &str) -> Result<i64, DbError> {
        self.raw_query(script)?.single_int()
    }
}
