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
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation
)]

//! Rule-based fact extraction for MBS schedule descriptions.
//!
//! The pattern registry compiles once per process; the [`ExtractionEngine`]
//! applies it to single items and the [`BatchExtractor`] drives a whole
//! dataset, aggregating coverage diagnostics and handing the resulting fact
//! batches to a [`FactStore`].

mod constraints;
mod patterns;
mod relations;
mod vocab;

pub mod batch;
pub mod engine;
pub mod store;

pub use batch::{BatchExtractor, BatchOutcome, DescriptionStats, ExtractionAnalysis};
pub use engine::{DEFAULT_PROXIMITY_WINDOW, EngineError, ExtractionConfig, ExtractionEngine};
pub use store::{FactStore, LoadMeta, file_hash};
