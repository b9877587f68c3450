//! The store adapter: owns the embedded cozo instance, schema lifecycle,
//! and commit serialization.
//!
//! Engines: `"mem"` for tests, `"sqlite"` for the on-disk database the CLI
//! produces. The on-disk layout is a directory holding the store file (the
//! driver adds `manifest.json` next to it).

use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, Mutex};

use cozo::{DbInstance, NamedRows, ScriptMutability};
use tracing::{debug, info};

use cppgraph_error::{ArgumentError, Error, Result, StoreError};

use crate::batch::Batch;
use crate::error::TransformError;
use crate::schema::ALL_SCHEMAS;

/// Name of the store file inside the output-database directory.
pub const STORE_FILE: &str = "graph.sqlite";

#[derive(Clone)]
pub struct GraphStore {
    db: DbInstance,
    /// The store serializes mutations itself, but a whole batch must land
    /// as one unit relative to other batches.
    commit_lock: Arc<Mutex<()>>,
}

impl GraphStore {
    /// In-memory store with the full schema, for tests and dry runs.
    pub fn in_memory() -> Result<Self> {
        let db = DbInstance::new("mem", "", "")
            .map_err(|e| Error::Store(StoreError::Fatal(e.to_string())))?;
        let store = Self {
            db,
            commit_lock: Arc::new(Mutex::new(())),
        };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Create `<path>/` with a fresh store inside. Refuses to clobber an
    /// existing non-empty directory unless `overwrite`.
    pub fn create(path: &Path, overwrite: bool) -> Result<Self> {
        if path.exists() {
            let occupied = path
                .read_dir()
                .map(|mut d| d.next().is_some())
                .unwrap_or(true);
            if occupied && !overwrite {
                return Err(Error::Argument(ArgumentError::OutputExists {
                    path: path.to_path_buf(),
                }));
            }
            if occupied {
                std::fs::remove_dir_all(path)
                    .map_err(|e| Error::Store(StoreError::Fatal(e.to_string())))?;
            }
        }
        std::fs::create_dir_all(path).map_err(|e| Error::Store(StoreError::Fatal(e.to_string())))?;

        let store = Self::open_sqlite(path)?;
        store.ensure_schema()?;
        info!(target: "db", path = %path.display(), "created graph database");
        Ok(store)
    }

    /// Open an existing database and verify its schema matches this
    /// engine's exactly.
    pub fn open_existing(path: &Path) -> Result<Self> {
        if !path.join(STORE_FILE).exists() {
            return Err(Error::Argument(ArgumentError::Invalid(format!(
                "{} is not a graph database",
                path.display()
            ))));
        }
        let store = Self::open_sqlite(path)?;
        let existing = store.existing_relations()?;
        for schema in ALL_SCHEMAS.iter() {
            if !existing.contains(schema.relation) {
                return Err(Error::SchemaMismatch(format!(
                    "relation {} missing from existing database",
                    schema.relation
                )));
            }
            store.check_columns(schema.relation, (schema.columns)())?;
        }
        Ok(store)
    }

    fn open_sqlite(path: &Path) -> Result<Self> {
        let file = path.join(STORE_FILE);
        let db = DbInstance::new("sqlite", &file, "")
            .map_err(|e| Error::Store(StoreError::Fatal(e.to_string())))?;
        Ok(Self {
            db,
            commit_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Create every relation that does not exist yet; verify the ones that
    /// do. Idempotent.
    pub fn ensure_schema(&self) -> Result<()> {
        let existing = self.existing_relations()?;
        for schema in ALL_SCHEMAS.iter() {
            if existing.contains(schema.relation) {
                self.check_columns(schema.relation, (schema.columns)())?;
                continue;
            }
            let script = (schema.create)();
            debug!(target: "db", relation = schema.relation, %script, "creating relation");
            self.run_mutable(&script)
                .map_err(|e| Error::Store(StoreError::from(e)))?;
        }
        Ok(())
    }

    pub fn begin_batch(&self) -> Batch {
        Batch::new(self.clone())
    }

    /// Read-only query surface; mutation attempts are rejected by the
    /// store itself under `Immutable`.
    pub fn query(&self, script: &str) -> Result<NamedRows> {
        self.db
            .run_script(
                script,
                std::collections::BTreeMap::new(),
                ScriptMutability::Immutable,
            )
            .map_err(|e| Error::Store(StoreError::Fatal(e.to_string())))
    }

    pub(crate) fn run_mutable(&self, script: &str) -> std::result::Result<NamedRows, TransformError> {
        self.run_mutable_with(script, std::collections::BTreeMap::new())
    }

    pub(crate) fn run_mutable_with(
        &self,
        script: &str,
        params: std::collections::BTreeMap<String, cozo::DataValue>,
    ) -> std::result::Result<NamedRows, TransformError> {
        self.db
            .run_script(script, params, ScriptMutability::Mutable)
            .map_err(TransformError::from)
    }

    pub(crate) fn lock_commits(&self) -> std::sync::MutexGuard<'_, ()> {
        // A poisoned lock means another batch panicked mid-commit; that
        // batch never ran its script, so the store itself is consistent.
        match self.commit_lock.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn existing_relations(&self) -> Result<HashSet<String>> {
        let rows = self.query("::relations")?;
        Ok(rows
            .rows
            .iter()
            .filter_map(|r| r.first().and_then(|v| v.get_str().map(str::to_owned)))
            .collect())
    }

    fn check_columns(&self, relation: &str, expected: Vec<&'static str>) -> Result<()> {
        let rows = self.query(&format!("::columns {relation}"))?;
        let found: Vec<String> = rows
            .rows
            .iter()
            .filter_map(|r| r.first().and_then(|v| v.get_str().map(str::to_owned)))
            .collect();
        if found.iter().map(String::as_str).ne(expected.iter().copied()) {
            return Err(Error::SchemaMismatch(format!(
                "relation {relation}: expected columns {expected:?}, found {found:?}"
            )));
        }
        Ok(())
    }
}

impl std::fmt::Debug for GraphStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn divergent_relation_is_a_schema_mismatch() {
        let store = GraphStore::in_memory().unwrap();
        store.run_mutable("::remove ASTNode").unwrap();
        store
            .run_mutable(":create ASTNode { node_id: Int => wrong: String }")
            .unwrap();
        let err = store.ensure_schema().unwrap_err();
        assert!(matches!(err, Error::SchemaMismatch(_)));
    }

    #[test]
    fn immutable_query_rejects_writes() {
        let store = GraphStore::in_memory().unwrap();
        assert!(store
            .query(r#"?[method_id, overridden_id] <- [[1, 1]] :put OVERRIDES"#)
            .is_err());
    }
}
