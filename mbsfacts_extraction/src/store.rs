//! Persistence collaborator interface.
//!
//! The extraction engine never talks to a database itself; a run hands its
//! two fact batches and load metadata to whatever implements [`FactStore`].

use std::fs::File;
use std::io::Read;
use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mbsfacts_entities::{Constraint, Relation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Metadata describing one completed load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadMeta {
    /// Where the item records came from.
    pub source_path: String,

    /// SHA-256 hex digest of the source file, when it could be read.
    pub source_hash: Option<String>,

    /// Items scanned.
    pub item_count: usize,

    /// Relation facts produced.
    pub relation_count: usize,

    /// Constraint facts produced.
    pub constraint_count: usize,

    /// When the load completed.
    pub loaded_at: DateTime<Utc>,
}

impl LoadMeta {
    /// Build metadata for a completed run over `source`, stamped now.
    #[must_use]
    pub fn for_source(
        source: &str,
        item_count: usize,
        relation_count: usize,
        constraint_count: usize,
    ) -> Self {
        Self {
            source_path: source.to_string(),
            source_hash: file_hash(Path::new(source)),
            item_count,
            relation_count,
            constraint_count,
            loaded_at: Utc::now(),
        }
    }
}

/// Repository for storing extracted facts.
///
/// Inserts are bulk: a full run's facts arrive as one batch per fact type.
/// Partial-write behavior on failure is the implementation's concern.
#[async_trait]
pub trait FactStore: Send + Sync {
    /// Insert a batch of relation facts.
    async fn insert_relations(&self, relations: &[Relation]) -> anyhow::Result<()>;

    /// Insert a batch of constraint facts.
    async fn insert_constraints(&self, constraints: &[Constraint]) -> anyhow::Result<()>;

    /// Record metadata for a completed load.
    async fn insert_meta(&self, meta: &LoadMeta) -> anyhow::Result<()>;
}

/// SHA-256 hex digest of a file's contents.
///
/// Returns `None` when the file cannot be read; load metadata tolerates an
/// unhashable source rather than failing the run.
#[must_use]
pub fn file_hash(path: &Path) -> Option<String> {
    let mut file = File::open(path).ok()?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];
    loop {
        let read = file.read(&mut buffer).ok()?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }
    Some(format!("{:x}", hasher.finalize()))
}
