//! The run manifest, written next to the store file.
//!
//! Everything in here is derived from sorted, aggregated data; with
//! `SOURCE_DATE_EPOCH` pinned, two runs over the same inputs produce
//! byte-identical manifests.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cppgraph_error::{Error, Result, StoreError};

use crate::config::ENV_SOURCE_DATE_EPOCH;
use crate::stitch::InvariantReport;

pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub version: String,
    pub created_at: String,
    pub source_root: String,
    pub tu_count: usize,
    pub ids_issued: u64,
    pub invariant_report: InvariantReport,
    pub failures: Vec<TuFailure>,
    pub warnings: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuFailure {
    pub file: PathBuf,
    pub error: String,
}

impl Manifest {
    pub fn write(&self, output_db: &Path) -> Result<PathBuf> {
        let path = output_db.join(MANIFEST_FILE);
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Internal(format!("manifest serialization: {e}")))?;
        std::fs::write(&path, json).map_err(|e| Error::Store(StoreError::Fatal(e.to_string())))?;
        Ok(path)
    }
}

/// RFC 3339 creation stamp, honoring `SOURCE_DATE_EPOCH` so reproducible
/// runs stay reproducible.
pub fn creation_timestamp() -> String {
    if let Ok(epoch) = std::env::var(ENV_SOURCE_DATE_EPOCH) {
        if let Some(dt) = epoch
            .parse::<i64>()
            .ok()
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        {
            return dt.to_rfc3339();
        }
    }
    Utc::now().to_rfc3339()
}

/// Deepest directory containing every indexed file; `""` when there is no
/// common prefix (or no files).
pub fn common_source_root(files: &[PathBuf]) -> String {
    let mut iter = files.iter();
    let Some(first) = iter.next() else {
        return String::new();
    };
    let mut root: Vec<std::path::Component> = first
        .parent()
        .map(|p| p.components().collect())
        .unwrap_or_default();
    for f in iter {
        let parent: Vec<std::path::Component> =
            f.parent().map(|p| p.components().collect()).unwrap_or_default();
        let common = root
            .iter()
            .zip(parent.iter())
            .take_while(|(a, b)| a == b)
            .count();
        root.truncate(common);
    }
    root.iter()
        .collect::<PathBuf>()
        .to_string_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_root_is_deepest_common_directory() {
        let files = vec![
            PathBuf::from("/work/src/a/main.cpp"),
            PathBuf::from("/work/src/b/util.cpp"),
        ];
        assert_eq!(common_source_root(&files), "/work/src");
        assert_eq!(common_source_root(&[]), "");
    }

    #[test]
    fn epoch_pins_the_timestamp() {
        std::env::set_var(ENV_SOURCE_DATE_EPOCH, "1700000000");
        let a = creation_timestamp();
        let b = creation_timestamp();
        std::env::remove_var(ENV_SOURCE_DATE_EPOCH);
        assert_eq!(a, b);
        assert!(a.starts_with("2023-11-14T"));
    }
}
