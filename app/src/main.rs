#![warn(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    clippy::module_name_repetitions
)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod command;
mod json_store;

use command::{
    CommandStrategy, ExtractInput, ExtractStrategy, InitStrategy, LoadInput, LoadStrategy,
    VersionStrategy,
};

#[derive(Parser)]
#[command(name = "mbsfacts")]
#[command(about = "MBS schedule fact extraction", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Load item records and extract relation/constraint facts
    Load {
        /// Path to a JSON Lines file of item records
        #[arg(short, long)]
        items: PathBuf,

        /// Directory the fact batches are written to
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Extract facts for a single description
    Extract {
        /// The source item number
        #[arg(short = 'n', long)]
        item_num: String,

        /// The description text to scan
        #[arg(short, long)]
        description: String,

        /// Optional derived-fee text to scan for references
        #[arg(short = 'f', long)]
        derived_fee: Option<String>,
    },
    /// Initialize configuration
    Init,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Load { items, out } => LoadStrategy.execute(LoadInput { items, out }).await,
        Commands::Extract {
            item_num,
            description,
            derived_fee,
        } => {
            ExtractStrategy
                .execute(ExtractInput {
                    item_num,
                    description,
                    derived_fee,
                })
                .await
        }
        Commands::Init => InitStrategy.execute(()).await,
        Commands::Version => VersionStrategy.execute(()).await,
    }
}
