//! Extraction engine: configuration plus the two extraction entry points.
//!
//! The engine is stateless beyond its configuration; both extraction calls
//! are pure functions over the supplied text and are safe to run
//! concurrently across items.

use mbsfacts_entities::{Constraint, Item, ItemAggregate, Relation};
use serde::{Deserialize, Serialize};

use crate::{constraints, relations};

/// Default byte window scanned either side of a relation phrase match.
pub const DEFAULT_PROXIMITY_WINDOW: usize = 120;

/// Configuration for the extraction engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Window scanned around a relation phrase when resolving targets.
    #[serde(default = "default_proximity_window")]
    pub proximity_window: usize,

    /// Whether batch extraction fans items out over a worker pool.
    #[serde(default)]
    pub parallel: bool,
}

const fn default_proximity_window() -> usize {
    DEFAULT_PROXIMITY_WINDOW
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            proximity_window: DEFAULT_PROXIMITY_WINDOW,
            parallel: false,
        }
    }
}

/// Error type for engine construction.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The configured proximity window cannot resolve any target.
    #[error("proximity window must be at least 1, got {0}")]
    WindowTooSmall(usize),
}

/// Pattern-driven fact extractor for schedule item descriptions.
pub struct ExtractionEngine {
    config: ExtractionConfig,
}

impl ExtractionEngine {
    /// Create an engine from configuration.
    ///
    /// # Errors
    /// Returns an error if the proximity window is zero.
    pub fn new(config: ExtractionConfig) -> Result<Self, EngineError> {
        if config.proximity_window == 0 {
            return Err(EngineError::WindowTooSmall(config.proximity_window));
        }
        Ok(Self { config })
    }

    /// Create an engine with the default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            config: ExtractionConfig::default(),
        }
    }

    /// The engine's configuration.
    #[must_use]
    pub const fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Extract relation facts from one item's description and derived fee.
    ///
    /// Absent text is treated as empty and yields no facts. Output is
    /// deduplicated by exact tuple, first-seen order, and never contains a
    /// self-reference.
    #[must_use]
    pub fn extract_relations(
        &self,
        item_num: &str,
        description: Option<&str>,
        derived_fee: Option<&str>,
    ) -> Vec<Relation> {
        relations::extract_relations(
            item_num,
            description,
            derived_fee,
            self.config.proximity_window,
        )
    }

    /// Extract constraint facts from one item's description.
    ///
    /// Absent text is treated as empty and yields no facts. Output is
    /// deduplicated by exact tuple, first-seen order.
    #[must_use]
    pub fn extract_constraints(&self, item_num: &str, description: Option<&str>) -> Vec<Constraint> {
        constraints::extract_constraints(item_num, description)
    }

    /// Extract both fact kinds for one item, bundled with the item.
    #[must_use]
    pub fn extract_item(&self, item: &Item) -> ItemAggregate {
        ItemAggregate {
            item: item.clone(),
            relations: self.extract_relations(
                &item.item_num,
                item.description.as_deref(),
                item.derived_fee.as_deref(),
            ),
            constraints: self.extract_constraints(&item.item_num, item.description.as_deref()),
        }
    }
}

impl Default for ExtractionEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}
