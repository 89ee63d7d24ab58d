//! Batch orchestration: run both extractors over a full item set.
//!
//! Items are independent, so the per-item loop may fan out over a worker
//! pool; partial results are merged back in item order either way, which
//! keeps the output lists and the analysis identical between modes.

use std::collections::HashMap;

use mbsfacts_entities::{Constraint, ConstraintType, Item, Relation, RelationType};
use rayon::prelude::*;
use tracing::info;

use crate::engine::ExtractionEngine;
use crate::store::{FactStore, LoadMeta};

/// Everything one batch run produces.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// All relation facts, concatenated in item order.
    pub relations: Vec<Relation>,

    /// All constraint facts, concatenated in item order.
    pub constraints: Vec<Constraint>,

    /// Coverage and frequency diagnostics for the run.
    pub analysis: ExtractionAnalysis,
}

/// Description length statistics across a run.
#[derive(Debug, Clone, Copy, Default, serde::Serialize, serde::Deserialize)]
pub struct DescriptionStats {
    /// Mean description length in bytes; zero for an empty run.
    pub avg_length: f64,

    /// Shortest description seen (absent descriptions count as zero).
    pub min_length: usize,

    /// Longest description seen.
    pub max_length: usize,
}

/// Diagnostic coverage statistics for one batch run.
///
/// These numbers are operational visibility only; they never gate a load.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ExtractionAnalysis {
    /// Items scanned.
    pub total_items: usize,

    /// Items that produced at least one relation.
    pub items_with_relations: usize,

    /// Items that produced at least one constraint.
    pub items_with_constraints: usize,

    /// Items that produced both.
    pub items_with_both: usize,

    /// How often each relation type was emitted.
    pub relation_counts: HashMap<RelationType, usize>,

    /// How often each constraint type was emitted.
    pub constraint_counts: HashMap<ConstraintType, usize>,

    /// Description length statistics.
    pub description_stats: DescriptionStats,
}

impl ExtractionAnalysis {
    /// Percentage of items with at least one relation.
    #[must_use]
    pub fn relations_coverage(&self) -> f64 {
        percentage(self.items_with_relations, self.total_items)
    }

    /// Percentage of items with at least one constraint.
    #[must_use]
    pub fn constraints_coverage(&self) -> f64 {
        percentage(self.items_with_constraints, self.total_items)
    }

    /// Percentage of items with both fact kinds.
    #[must_use]
    pub fn both_coverage(&self) -> f64 {
        percentage(self.items_with_both, self.total_items)
    }

    /// Relation type frequencies, count descending, ties by type name.
    #[must_use]
    pub fn relation_frequency(&self) -> Vec<(RelationType, usize)> {
        let mut rows: Vec<_> = self
            .relation_counts
            .iter()
            .map(|(ty, count)| (*ty, *count))
            .collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.as_str().cmp(b.0.as_str())));
        rows
    }

    /// Constraint type frequencies, count descending, ties by type name.
    #[must_use]
    pub fn constraint_frequency(&self) -> Vec<(ConstraintType, usize)> {
        let mut rows: Vec<_> = self
            .constraint_counts
            .iter()
            .map(|(ty, count)| (*ty, *count))
            .collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.as_str().cmp(b.0.as_str())));
        rows
    }

    /// Log the metrics block for this run.
    pub fn log_summary(&self, top: usize) {
        info!("=== EXTRACTION METRICS ===");
        info!("Total items processed: {}", self.total_items);
        info!(
            "Items with relations: {} ({:.1}%)",
            self.items_with_relations,
            self.relations_coverage()
        );
        info!(
            "Items with constraints: {} ({:.1}%)",
            self.items_with_constraints,
            self.constraints_coverage()
        );
        info!(
            "Items with both: {} ({:.1}%)",
            self.items_with_both,
            self.both_coverage()
        );
        info!(
            "Description lengths: avg {:.1}, min {}, max {}",
            self.description_stats.avg_length,
            self.description_stats.min_length,
            self.description_stats.max_length
        );

        info!("Relation types (top {top}):");
        for (relation_type, count) in self.relation_frequency().into_iter().take(top) {
            info!("  {}: {count}", relation_type.as_str());
        }
        info!("Constraint types (top {top}):");
        for (constraint_type, count) in self.constraint_frequency().into_iter().take(top) {
            info!("  {}: {count}", constraint_type.as_str());
        }
    }
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64) * 100.0
    }
}

/// Drives extraction across an entire item set.
pub struct BatchExtractor {
    engine: ExtractionEngine,
}

impl BatchExtractor {
    /// Create a batch extractor around an engine.
    #[must_use]
    pub const fn new(engine: ExtractionEngine) -> Self {
        Self { engine }
    }

    /// Create a batch extractor with the default engine.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(ExtractionEngine::with_defaults())
    }

    /// The engine this extractor runs.
    #[must_use]
    pub const fn engine(&self) -> &ExtractionEngine {
        &self.engine
    }

    /// Extract facts for every item and aggregate run diagnostics.
    #[must_use]
    pub fn run(&self, items: &[Item]) -> BatchOutcome {
        let extracted: Vec<(Vec<Relation>, Vec<Constraint>)> = if self.engine.config().parallel {
            items.par_iter().map(|item| self.extract_one(item)).collect()
        } else {
            items.iter().map(|item| self.extract_one(item)).collect()
        };

        let mut relations = Vec::new();
        let mut constraints = Vec::new();
        let mut analysis = ExtractionAnalysis {
            total_items: items.len(),
            ..ExtractionAnalysis::default()
        };

        let mut length_sum = 0usize;
        let mut min_length = usize::MAX;
        let mut max_length = 0usize;

        for (item, (item_relations, item_constraints)) in items.iter().zip(extracted) {
            if !item_relations.is_empty() {
                analysis.items_with_relations += 1;
            }
            if !item_constraints.is_empty() {
                analysis.items_with_constraints += 1;
            }
            if !item_relations.is_empty() && !item_constraints.is_empty() {
                analysis.items_with_both += 1;
            }

            for relation in &item_relations {
                *analysis
                    .relation_counts
                    .entry(relation.relation_type)
                    .or_insert(0) += 1;
            }
            for constraint in &item_constraints {
                *analysis
                    .constraint_counts
                    .entry(constraint.constraint_type)
                    .or_insert(0) += 1;
            }

            let length = item.description_len();
            length_sum += length;
            min_length = min_length.min(length);
            max_length = max_length.max(length);

            relations.extend(item_relations);
            constraints.extend(item_constraints);
        }

        if !items.is_empty() {
            analysis.description_stats = DescriptionStats {
                avg_length: length_sum as f64 / items.len() as f64,
                min_length,
                max_length,
            };
        }

        info!(
            "Extracted {} relations and {} constraints from {} items",
            relations.len(),
            constraints.len(),
            items.len()
        );

        BatchOutcome {
            relations,
            constraints,
            analysis,
        }
    }

    /// Run extraction and hand both fact batches to the store.
    ///
    /// Facts go over as two flat bulk batches after the full scan, followed
    /// by the run's metadata. A store failure fails the run.
    ///
    /// # Errors
    /// Returns an error when any store insert fails.
    pub async fn run_and_store<S: FactStore + ?Sized>(
        &self,
        items: &[Item],
        store: &S,
        source: &str,
    ) -> anyhow::Result<BatchOutcome> {
        let outcome = self.run(items);

        store.insert_relations(&outcome.relations).await?;
        store.insert_constraints(&outcome.constraints).await?;

        let meta = LoadMeta::for_source(
            source,
            items.len(),
            outcome.relations.len(),
            outcome.constraints.len(),
        );
        store.insert_meta(&meta).await?;

        Ok(outcome)
    }

    fn extract_one(&self, item: &Item) -> (Vec<Relation>, Vec<Constraint>) {
        let relations = self.engine.extract_relations(
            &item.item_num,
            item.description.as_deref(),
            item.derived_fee.as_deref(),
        );
        let constraints = self
            .engine
            .extract_constraints(&item.item_num, item.description.as_deref());
        (relations, constraints)
    }
}

impl Default for BatchExtractor {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ExtractionConfig;

    fn sample_items() -> Vec<Item> {
        vec![
            Item::new("23")
                .with_description("not on the same day as item 36, lasting at least 20 minutes"),
            Item::new("104").with_description(
                "other than a service to which item 106, 109, 125 or 16401 applies",
            ),
            Item::new("300").with_description("once per lifetime"),
            Item::new("999"),
        ]
    }

    #[test]
    fn zero_items_do_not_break_coverage() {
        let outcome = BatchExtractor::with_defaults().run(&[]);
        assert_eq!(outcome.analysis.total_items, 0);
        assert!((outcome.analysis.relations_coverage() - 0.0).abs() < f64::EPSILON);
        assert!((outcome.analysis.both_coverage() - 0.0).abs() < f64::EPSILON);
        assert_eq!(outcome.analysis.description_stats.min_length, 0);
    }

    #[test]
    fn counts_and_coverage_track_items() {
        let outcome = BatchExtractor::with_defaults().run(&sample_items());
        let analysis = &outcome.analysis;

        assert_eq!(analysis.total_items, 4);
        assert_eq!(analysis.items_with_relations, 2);
        // Item 300 only has a lifetime flag; items 104 and 999 have none.
        assert_eq!(analysis.items_with_constraints, 2);
        assert_eq!(analysis.items_with_both, 1);
        assert!(analysis.relations_coverage() > 0.0);
        assert_eq!(analysis.description_stats.min_length, 0);
        assert!(analysis.description_stats.max_length > 0);
    }

    #[test]
    fn parallel_matches_sequential() {
        let items = sample_items();

        let sequential = BatchExtractor::with_defaults().run(&items);

        #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
        let parallel_engine = ExtractionEngine::new(ExtractionConfig {
            parallel: true,
            ..ExtractionConfig::default()
        })
        .expect("default window is valid");
        let parallel = BatchExtractor::new(parallel_engine).run(&items);

        assert_eq!(sequential.relations, parallel.relations);
        assert_eq!(sequential.constraints, parallel.constraints);
        assert_eq!(
            sequential.analysis.items_with_both,
            parallel.analysis.items_with_both
        );
    }

    #[test]
    fn frequency_tables_are_sorted() {
        let outcome = BatchExtractor::with_defaults().run(&sample_items());
        let rows = outcome.analysis.constraint_frequency();
        for pair in rows.windows(2) {
            let ordered = pair[0].1 > pair[1].1
                || (pair[0].1 == pair[1].1 && pair[0].0.as_str() <= pair[1].0.as_str());
            assert!(ordered, "rows out of order: {pair:?}");
        }
    }

    #[test]
    fn fact_lists_are_flat_batches_in_item_order() {
        let outcome = BatchExtractor::with_defaults().run(&sample_items());
        // First relation belongs to the first item that produced any.
        assert!(outcome.relations.iter().any(|r| r.item_num == "23"));
        let first_23 = outcome.relations.iter().position(|r| r.item_num == "23");
        let first_104 = outcome.relations.iter().position(|r| r.item_num == "104");
        assert!(first_23 < first_104);
    }
}
