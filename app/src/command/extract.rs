use mbsfacts_config::Config;
use mbsfacts_entities::Item;
use mbsfacts_extraction::ExtractionEngine;

/// Input for the one-shot extract command.
pub struct ExtractInput {
    /// The source item number.
    pub item_num: String,

    /// The description text to scan.
    pub description: String,

    /// Optional derived-fee text.
    pub derived_fee: Option<String>,
}

/// Strategy for extracting facts from a single description and printing the
/// aggregate as JSON. Debugging aid for tuning patterns against real text.
#[derive(Debug, Clone, Copy)]
pub struct ExtractStrategy;

impl super::CommandStrategy for ExtractStrategy {
    type Input = ExtractInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load_or_default()?;
        let engine = ExtractionEngine::new(config.extraction)?;

        let mut item = Item::new(input.item_num).with_description(input.description);
        if let Some(derived_fee) = input.derived_fee {
            item = item.with_derived_fee(derived_fee);
        }

        let aggregate = engine.extract_item(&item);
        println!("{}", serde_json::to_string_pretty(&aggregate)?);

        Ok(())
    }
}
