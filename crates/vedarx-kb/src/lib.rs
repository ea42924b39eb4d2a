//! # VedaRx Knowledge Base
//!
//! Loads the tabular case dataset into an immutable in-memory [`CaseStore`]
//! at process start. The store is read-only for the rest of the process
//! lifetime, so it is safe for unsynchronized concurrent reads — share it
//! via `Arc` and pass it explicitly to the ranker and orchestrator.
//!
//! At the reference scale (~450 rows) there is no index structure; ranking
//! scans the records linearly.

pub mod loader;

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::Serialize;
use vedarx_core::error::DataLoadError;
use vedarx_core::types::CaseRecord;

/// Immutable handle over the loaded case records.
///
/// Construction fails with [`DataLoadError::Empty`] when no usable records
/// survive the load — the system must not serve with an empty knowledge
/// base. Skipped rows are merely counted.
#[derive(Debug)]
pub struct CaseStore {
    records: Vec<CaseRecord>,
    skipped: usize,
}

/// Summary of a loaded store, for the `stats` surface.
#[derive(Debug, Serialize)]
pub struct StoreStats {
    pub total_records: usize,
    pub skipped_rows: usize,
    /// Record count per constitution tag.
    pub constitutions: BTreeMap<String, usize>,
}

impl CaseStore {
    /// Load the knowledge base from a CSV file.
    pub fn load(path: &Path) -> Result<Self, DataLoadError> {
        let file = std::fs::File::open(path)?;
        let store = Self::from_reader(file)?;
        tracing::info!(
            records = store.len(),
            skipped = store.skipped_rows(),
            "knowledge base loaded from {}",
            path.display()
        );
        Ok(store)
    }

    /// Load the knowledge base from any reader (used by tests with
    /// in-memory CSV).
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DataLoadError> {
        let (records, skipped) = loader::parse_csv(reader)?;
        if records.is_empty() {
            return Err(DataLoadError::Empty);
        }
        if skipped > 0 {
            tracing::warn!(skipped, "knowledge base rows skipped during load");
        }
        Ok(Self { records, skipped })
    }

    /// The loaded records, in original dataset order.
    pub fn records(&self) -> &[CaseRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows dropped during load because required cells were empty.
    pub fn skipped_rows(&self) -> usize {
        self.skipped
    }

    pub fn stats(&self) -> StoreStats {
        let mut constitutions: BTreeMap<String, usize> = BTreeMap::new();
        for record in &self.records {
            *constitutions.entry(record.constitution.clone()).or_default() += 1;
        }
        StoreStats {
            total_records: self.records.len(),
            skipped_rows: self.skipped,
            constitutions,
        }
    }
}
