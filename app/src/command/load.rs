use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use mbsfacts_config::Config;
use mbsfacts_entities::Item;
use mbsfacts_extraction::{BatchExtractor, ExtractionEngine};
use tracing::info;

use crate::json_store::JsonFileStore;

/// Input for the load command.
pub struct LoadInput {
    /// JSON Lines file of item records.
    pub items: PathBuf,

    /// Output directory for the fact batches; defaults to `./facts`.
    pub out: Option<PathBuf>,
}

/// Strategy for the full load pipeline: parse item records, extract facts,
/// hand the batches to the store and report coverage.
#[derive(Debug, Clone, Copy)]
pub struct LoadStrategy;

impl super::CommandStrategy for LoadStrategy {
    type Input = LoadInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load_or_default()?;

        info!("Starting MBS data loading process");
        info!("Source: {}", input.items.display());

        let t0 = Instant::now();
        let items = read_items(&input.items)?;
        info!(
            "Parsed {} items in {:.1} ms",
            items.len(),
            t0.elapsed().as_secs_f64() * 1000.0
        );

        let engine = ExtractionEngine::new(config.extraction.clone())?;
        let extractor = BatchExtractor::new(engine);

        let out_dir = input.out.unwrap_or_else(|| PathBuf::from("facts"));
        let store = JsonFileStore::new(out_dir.clone());

        let t0 = Instant::now();
        let source = input.items.display().to_string();
        let outcome = extractor.run_and_store(&items, &store, &source).await?;
        let elapsed_ms = t0.elapsed().as_secs_f64() * 1000.0;
        info!(
            "Extracted and stored {} relations and {} constraints in {:.1} ms",
            outcome.relations.len(),
            outcome.constraints.len(),
            elapsed_ms
        );

        outcome.analysis.log_summary(config.output.top_patterns);

        println!("\n=== MBS DATA LOADING SUMMARY ===");
        println!(
            "Loaded {} items, {} relations, {} constraints",
            items.len(),
            outcome.relations.len(),
            outcome.constraints.len()
        );
        println!("Output directory: {}", out_dir.display());
        println!(
            "Relations coverage: {:.1}%",
            outcome.analysis.relations_coverage()
        );
        println!(
            "Constraints coverage: {:.1}%",
            outcome.analysis.constraints_coverage()
        );
        println!("Both coverage: {:.1}%", outcome.analysis.both_coverage());

        Ok(())
    }
}

/// Read one JSON item record per line, skipping blank lines.
fn read_items(path: &Path) -> anyhow::Result<Vec<Item>> {
    let file =
        File::open(path).with_context(|| format!("cannot open item file {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut items = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let item: Item = serde_json::from_str(&line)
            .with_context(|| format!("invalid item record on line {}", index + 1))?;
        items.push(item);
    }
    Ok(items)
}
