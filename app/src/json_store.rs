//! JSON-file implementation of the persistence collaborator.
//!
//! Writes each bulk batch as one pretty-printed JSON document in the output
//! directory. Stands in for a relational store so loads can run end to end
//! without one.

use std::path::PathBuf;

use async_trait::async_trait;
use mbsfacts_entities::{Constraint, Relation};
use mbsfacts_extraction::{FactStore, LoadMeta};
use tracing::info;

/// Fact store writing `relations.json`, `constraints.json` and `meta.json`.
pub struct JsonFileStore {
    out_dir: PathBuf,
}

impl JsonFileStore {
    /// Create a store rooted at `out_dir`; the directory is created on first
    /// insert.
    pub const fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }

    fn write_json<T: serde::Serialize>(&self, name: &str, value: &T) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.out_dir)?;
        let path = self.out_dir.join(name);
        std::fs::write(&path, serde_json::to_string_pretty(value)?)?;
        info!("Wrote {}", path.display());
        Ok(())
    }
}

#[async_trait]
impl FactStore for JsonFileStore {
    async fn insert_relations(&self, relations: &[Relation]) -> anyhow::Result<()> {
        self.write_json("relations.json", &relations)
    }

    async fn insert_constraints(&self, constraints: &[Constraint]) -> anyhow::Result<()> {
        self.write_json("constraints.json", &constraints)
    }

    async fn insert_meta(&self, meta: &LoadMeta) -> anyhow::Result<()> {
        self.write_json("meta.json", meta)
    }
}
